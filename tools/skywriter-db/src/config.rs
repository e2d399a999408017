use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use skywriter_core::{SeriesClassifier, SeriesTable};
use skywriter_profiles::ProfileDatabase;
use tracing::info;

use crate::fetch::DEFAULT_REPOS;

/// Asset directory of the Android app, relative to the repository root.
pub const DEFAULT_ASSETS_DIR: &str = "app/src/main/assets/Amiibo_NFC_Data";

pub const DEFAULT_CLONE_TIMEOUT_SECS: u64 = 300;

/// Settings shared by the pipeline commands.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Where converted records are written and organized.
    pub assets_dir: PathBuf,
    /// Existing dumps converted alongside the fetched ones; only ever read.
    pub dumps_dir: Option<PathBuf>,
    /// Curated profile database.
    pub profiles_path: PathBuf,
    /// Series table overriding the built-in one.
    pub series_table: Option<PathBuf>,
    pub repos: Vec<String>,
    /// Upper bound for a single `git clone`.
    pub clone_timeout: Duration,
    /// Prompt for profiles the database does not know.
    pub interactive: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            assets_dir: PathBuf::from(DEFAULT_ASSETS_DIR),
            dumps_dir: None,
            profiles_path: skywriter_profiles::default_path(),
            series_table: None,
            repos: DEFAULT_REPOS.iter().map(|r| (*r).to_string()).collect(),
            clone_timeout: Duration::from_secs(DEFAULT_CLONE_TIMEOUT_SECS),
            interactive: false,
        }
    }
}

impl PipelineConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_assets_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.assets_dir = dir.into();
        self
    }

    pub fn with_dumps_dir(mut self, dir: Option<PathBuf>) -> Self {
        self.dumps_dir = dir;
        self
    }

    pub fn with_profiles_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.profiles_path = path.into();
        self
    }

    pub fn with_series_table(mut self, path: Option<PathBuf>) -> Self {
        self.series_table = path;
        self
    }

    /// Replaces the repository list; an empty list keeps the defaults.
    pub fn with_repos(mut self, repos: Vec<String>) -> Self {
        if !repos.is_empty() {
            self.repos = repos;
        }
        self
    }

    pub fn with_clone_timeout(mut self, secs: u64) -> Self {
        self.clone_timeout = Duration::from_secs(secs.max(1));
        self
    }

    pub fn with_interactive(mut self, interactive: bool) -> Self {
        self.interactive = interactive;
        self
    }

    /// Compiles the configured series table, or the built-in one.
    pub fn classifier(&self) -> Result<SeriesClassifier> {
        let table = match &self.series_table {
            Some(path) => {
                let table = SeriesTable::load(path)
                    .with_context(|| format!("cannot load series table {}", path.display()))?;
                info!(
                    path = %path.display(),
                    categories = table.len(),
                    "using custom series table"
                );
                table
            }
            None => SeriesTable::reference(),
        };
        Ok(SeriesClassifier::new(&table)?)
    }

    pub fn load_profiles(&self) -> Result<ProfileDatabase> {
        load_profiles(&self.profiles_path)
    }
}

pub fn load_profiles(path: &Path) -> Result<ProfileDatabase> {
    ProfileDatabase::load(path)
        .with_context(|| format!("cannot load profile database {}", path.display()))
}
