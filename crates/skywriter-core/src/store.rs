//! Persistence of decoded records as pretty-printed JSON files.

use std::path::Path;

use crate::error::{Result, SkywriterError};
use crate::types::AmiiboRecord;

/// Extension of persisted record files.
pub const RECORD_EXTENSION: &str = "json";

/// Reads a persisted record.
///
/// # Errors
///
/// Returns `SkywriterError::MalformedPath` if the file cannot be read, or
/// `SkywriterError::Json` if it is not a valid record.
pub fn load_record(path: &Path) -> Result<AmiiboRecord> {
    let json = std::fs::read_to_string(path).map_err(|source| SkywriterError::MalformedPath {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(serde_json::from_str(&json)?)
}

/// Writes `record` to `path` with two-space indentation, replacing any
/// existing file.
///
/// # Errors
///
/// Returns `SkywriterError::Io` if the file cannot be written.
pub fn save_record(path: &Path, record: &AmiiboRecord) -> Result<()> {
    let mut json = serde_json::to_string_pretty(record)?;
    json.push('\n');
    std::fs::write(path, json)?;
    Ok(())
}

/// Returns `true` if `path` names a persisted record file.
#[must_use]
pub fn is_record_file(path: &Path) -> bool {
    path.extension()
        .is_some_and(|e| e.eq_ignore_ascii_case(RECORD_EXTENSION))
}
