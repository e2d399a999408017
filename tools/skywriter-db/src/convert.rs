use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use skywriter_core::{decode_file, is_dump_file, save_record};
use tracing::{info, warn};

use crate::batch::{BatchReport, list_files, stem};

/// Converts every top-level `.bin`/`.nfc` dump in `input` into
/// `<stem>.json` under `output`.
///
/// A dump that fails to decode is counted as an error and the batch continues.
pub fn convert_dir(input: &Path, output: &Path) -> Result<BatchReport> {
    if !input.is_dir() {
        bail!("source directory does not exist: {}", input.display());
    }
    std::fs::create_dir_all(output)
        .with_context(|| format!("cannot create {}", output.display()))?;

    let dumps = list_files(input, is_dump_file)?;
    let mut report = BatchReport::default();

    if dumps.is_empty() {
        warn!(dir = %input.display(), "no .bin or .nfc files found");
        return Ok(report);
    }
    info!(count = dumps.len(), "found amiibo dumps to convert");

    for dump in &dumps {
        match convert_one(dump, output) {
            Ok(json) => {
                report.processed += 1;
                info!(from = %dump.display(), to = %json.display(), "converted");
            }
            Err(e) => {
                report.errors += 1;
                warn!(file = %dump.display(), error = %e, "conversion failed");
            }
        }
    }

    info!(%report, total = report.total(), output = %output.display(), "conversion complete");
    Ok(report)
}

fn convert_one(dump: &Path, output: &Path) -> skywriter_core::Result<PathBuf> {
    let record = decode_file(dump)?;
    let json = output.join(format!("{}.json", stem(dump)));
    save_record(&json, &record)?;
    Ok(json)
}
