// Config loading and end-to-end resolution
//
// load_with_local returns both the merged and the base document because
// fallback `$base` refs resolve against the base, not the merge result.

use std::collections::BTreeMap;
use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};

use serde_json::{Map, Value};

use crate::document::{ConfigDocument, Provider, ResolvedConfig};
use crate::error::ConfigError;
use crate::merge::{deep_merge, resolve_base_refs, resolve_extends};
use crate::resolve::{resolve_credentials, resolve_models};

/// Load the base config file and deep-merge the optional co-located
/// `.local` override (`config.json` → `config.local.json`). A missing
/// override file is not an error.
pub fn load_with_local(config_path: &Path) -> Result<(Value, Value), ConfigError> {
    let base = load_json(config_path)?;
    let mut merged = base.clone();

    let local_path = local_override_path(config_path);
    if local_path.exists() {
        tracing::info!(path = %local_path.display(), "merging local config override");
        let local = load_json(&local_path)?;
        deep_merge(&mut merged, local);
    }

    Ok((merged, base))
}

/// Load, merge, and resolve a config file into the flat artifact consumed
/// by the reconciler.
pub fn generate(config_path: &Path) -> Result<ResolvedConfig, ConfigError> {
    let (merged, base) = load_with_local(config_path)?;

    let merged_doc = parse_document(merged, config_path)?;
    let base_doc = parse_document(base, config_path)?;

    let providers = typed_providers(&resolve_extends(&merged_doc.providers));

    Ok(ResolvedConfig {
        credentials: resolve_credentials(&providers),
        models: resolve_models(&providers),
        aliases: merged_doc.aliases,
        fallbacks: resolve_base_refs(&merged_doc.fallbacks, &base_doc.fallbacks),
    })
}

fn local_override_path(config_path: &Path) -> PathBuf {
    match config_path.extension().and_then(OsStr::to_str) {
        Some(ext) => config_path.with_extension(format!("local.{ext}")),
        None => config_path.with_extension("local"),
    }
}

fn load_json(path: &Path) -> Result<Value, ConfigError> {
    let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&raw).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

fn parse_document(value: Value, path: &Path) -> Result<ConfigDocument, ConfigError> {
    serde_json::from_value(value).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Deserialize each resolved provider block. An invalid block is skipped
/// with a logged error; the rest of the config proceeds.
fn typed_providers(raw: &Map<String, Value>) -> BTreeMap<String, Provider> {
    let mut providers = BTreeMap::new();
    for (name, config) in raw {
        match serde_json::from_value::<Provider>(config.clone()) {
            Ok(provider) => {
                providers.insert(name.clone(), provider);
            }
            Err(err) => {
                tracing::error!(provider = %name, error = %err, "invalid provider block; skipping");
            }
        }
    }
    providers
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn local_override_path_inserts_suffix_before_extension() {
        assert_eq!(
            local_override_path(Path::new("/etc/gateway/config.json")),
            PathBuf::from("/etc/gateway/config.local.json")
        );
        assert_eq!(
            local_override_path(Path::new("config")),
            PathBuf::from("config.local")
        );
    }

    #[test]
    fn missing_config_file_is_a_read_error() {
        let err = generate(Path::new("/nonexistent/config.json")).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }
}
