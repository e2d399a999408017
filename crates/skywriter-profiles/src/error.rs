use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while loading, saving or editing a profile database.
#[derive(Debug, Error)]
pub enum ProfileError {
    #[error("cannot access profile database {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid profile json: {0}")]
    Json(#[from] serde_json::Error),

    /// A key is not `<8 hex>` or `<8 hex>:<8 hex>`.
    #[error("invalid profile key {0:?}: expected 8 hex digits, optionally followed by ':' and 8 more")]
    InvalidKey(String),
}

pub type Result<T> = std::result::Result<T, ProfileError>;
