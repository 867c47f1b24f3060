// Error types for config loading and resolution

use std::path::PathBuf;
use thiserror::Error;

/// Errors that abort config resolution. Everything else in the pipeline
/// (unknown $extend parents, invalid provider blocks) degrades per-item.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The config file could not be read
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The config file is not valid JSON (or does not match the document schema)
    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}
