use std::fmt;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

/// Per-file outcome counters for one batch pass.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct BatchReport {
    pub processed: usize,
    pub skipped: usize,
    pub errors: usize,
}

impl BatchReport {
    #[must_use]
    pub fn total(&self) -> usize {
        self.processed + self.skipped + self.errors
    }
}

impl fmt::Display for BatchReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "processed: {}, skipped: {}, errors: {}",
            self.processed, self.skipped, self.errors
        )
    }
}

/// Lists the regular files directly inside `dir` accepted by `keep`,
/// sorted by path.
pub fn list_files(dir: &Path, keep: impl Fn(&Path) -> bool) -> Result<Vec<PathBuf>> {
    let entries =
        std::fs::read_dir(dir).with_context(|| format!("cannot list {}", dir.display()))?;

    let mut files = Vec::new();
    for entry in entries {
        let entry = entry.with_context(|| format!("cannot list {}", dir.display()))?;
        let path = entry.path();
        if entry.file_type().is_ok_and(|t| t.is_file()) && keep(&path) {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// Returns the file stem of `path` as UTF-8 (lossy).
#[must_use]
pub fn stem(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}
