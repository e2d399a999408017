use std::io::{BufRead, Write};
use std::path::Path;

use anyhow::{Context, Result};
use skywriter_core::is_dump_file;
use tracing::{error, info, warn};

use crate::batch::list_files;
use crate::config::PipelineConfig;
use crate::convert::convert_dir;
use crate::enrich::Enricher;
use crate::fetch::{fetch, stage_local};
use crate::organize::organize_dir;
use crate::prompt::Prompter;

/// Runs fetch, convert, enrich and organize into `config.assets_dir`.
///
/// Dumps are staged in a temporary directory owned by this run, together
/// with a copy of the dumps found under `config.dumps_dir`. A failed
/// download falls back to those local dumps; enrichment problems are logged
/// and tolerated. The staging directory is removed on return.
pub fn compile<R: BufRead, W: Write>(
    config: &PipelineConfig,
    prompter: Option<Prompter<R, W>>,
) -> Result<()> {
    compile_in(&std::env::temp_dir(), config, prompter)
}

fn compile_in<R: BufRead, W: Write>(
    staging_parent: &Path,
    config: &PipelineConfig,
    prompter: Option<Prompter<R, W>>,
) -> Result<()> {
    let staging = tempfile::Builder::new()
        .prefix("skywriter-dumps-")
        .tempdir_in(staging_parent)
        .context("cannot create staging directory")?;

    info!("[1/4] downloading amiibo dumps");
    if let Err(e) = fetch(staging.path(), &config.repos, config.clone_timeout) {
        warn!(error = %e, "download failed, continuing with local dumps if any");
    }
    if let Some(dir) = &config.dumps_dir {
        match stage_local(dir, staging.path()) {
            Ok(report) => info!(dir = %dir.display(), %report, "staged local dumps"),
            Err(e) => warn!(dir = %dir.display(), error = %e, "local dumps unavailable"),
        }
    }

    let dumps = list_files(staging.path(), is_dump_file)?;
    if dumps.is_empty() {
        warn!(
            "no amiibo dumps found; pass --dumps-dir or run `skywriter-db convert <dir> {}`",
            config.assets_dir.display()
        );
        return Ok(());
    }

    info!("[2/4] converting dumps to JSON");
    convert_dir(staging.path(), &config.assets_dir)?;

    info!("[3/4] enriching with profile metadata");
    if let Err(e) = enrich_assets(config, prompter) {
        warn!(error = %e, "enrichment completed with warnings");
    }

    info!("[4/4] organizing by game series");
    let classifier = config.classifier()?;
    organize_dir(&config.assets_dir, &classifier)?;

    info!(dir = %staging.path().display(), "cleaning up staged dumps");
    if let Err(e) = staging.close() {
        error!(error = %e, "could not remove staging directory");
    }

    info!(dir = %config.assets_dir.display(), "amiibo database compilation complete");
    Ok(())
}

/// Enriches the asset directory and persists any operator-added profiles.
pub fn enrich_assets<R: BufRead, W: Write>(
    config: &PipelineConfig,
    prompter: Option<Prompter<R, W>>,
) -> Result<()> {
    let db = config.load_profiles()?;
    let mut enricher = Enricher::new(db, prompter);
    enricher.enrich_dir(&config.assets_dir)?;

    if enricher.db_changed() {
        enricher
            .into_database()
            .save(&config.profiles_path)
            .with_context(|| format!("cannot save {}", config.profiles_path.display()))?;
        info!(path = %config.profiles_path.display(), "profile database updated");
    }
    Ok(())
}
