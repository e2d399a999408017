use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur during Skywriter core operations.
#[derive(Debug, Error)]
pub enum SkywriterError {
    /// The dump blob does not have the fixed NTAG215 length.
    #[error("invalid dump size: {actual} bytes (expected {expected})")]
    SizeMismatch {
        /// Required blob length in bytes.
        expected: usize,
        /// Length of the blob that was supplied.
        actual: usize,
    },

    /// A dump or record file could not be read.
    #[error("cannot read {path:?}: {source}")]
    MalformedPath {
        /// The path that failed.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },

    /// A series table pattern failed to compile.
    #[error("invalid series pattern: {0}")]
    InvalidPattern(#[from] regex::Error),

    /// A persisted record or series table is not valid JSON for its schema.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// Writing a persisted record failed.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for Skywriter core operations.
pub type Result<T> = std::result::Result<T, SkywriterError>;
