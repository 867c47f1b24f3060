// Transport error types

use thiserror::Error;

/// Errors surfaced by AdminApi implementations. The reconciler treats every
/// variant the same way: log, count the operation as failed, continue.
#[derive(Debug, Error)]
pub enum AdminError {
    /// Network/transport failure (connect, timeout, body decode)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The gateway answered with a non-success status
    #[error("API error ({status}): {body}")]
    Api { status: u16, body: String },
}
