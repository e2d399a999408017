use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use skywriter_core::{SeriesClassifier, UNKNOWN_SERIES, is_record_file, load_record, save_record};
use tracing::{debug, info, warn};

use crate::batch::{BatchReport, list_files, stem};

/// Where a record ended up after organizing.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Placement {
    Moved(PathBuf),
    /// A record with the same file name is already filed under the series.
    Occupied(PathBuf),
}

/// Files every top-level `.json` record of `dir` into `dir/<series>/`.
///
/// Records without a series are classified by file stem first and the
/// inferred series is written back. Must not run concurrently on the same
/// directory.
pub fn organize_dir(dir: &Path, classifier: &SeriesClassifier) -> Result<BatchReport> {
    if !dir.is_dir() {
        bail!("directory does not exist: {}", dir.display());
    }

    let files = list_files(dir, is_record_file)?;
    let mut report = BatchReport::default();
    if files.is_empty() {
        warn!(dir = %dir.display(), "no JSON files found");
        return Ok(report);
    }
    info!(count = files.len(), "organizing records by game series");

    for file in &files {
        match organize_one(file, dir, classifier) {
            Ok(Placement::Moved(dest)) => {
                report.processed += 1;
                debug!(to = %dest.display(), "filed");
            }
            Ok(Placement::Occupied(dest)) => {
                report.skipped += 1;
                warn!(
                    file = %file.display(),
                    existing = %dest.display(),
                    "destination already exists, left in place"
                );
            }
            Err(e) => {
                report.errors += 1;
                warn!(file = %file.display(), error = %e, "organizing failed");
            }
        }
    }

    info!(%report, "organizing complete");
    Ok(report)
}

fn organize_one(file: &Path, dir: &Path, classifier: &SeriesClassifier) -> Result<Placement> {
    let mut record = load_record(file)?;
    let label = stem(file);

    let (series, changed) = classifier.assign(&mut record, &label);
    let series_dir = dir.join(series_dir_name(series));
    if changed {
        save_record(file, &record)?;
    }

    std::fs::create_dir_all(&series_dir)
        .with_context(|| format!("cannot create {}", series_dir.display()))?;

    let dest = series_dir.join(file.file_name().unwrap_or_default());
    if dest.exists() {
        return Ok(Placement::Occupied(dest));
    }
    std::fs::rename(file, &dest)
        .with_context(|| format!("cannot move {} to {}", file.display(), dest.display()))?;
    Ok(Placement::Moved(dest))
}

/// Maps a series label to a single path component.
///
/// Path separators become `-`; labels that would escape or collapse the
/// directory map to [`UNKNOWN_SERIES`].
fn series_dir_name(series: &str) -> String {
    let name = series.trim().replace(['/', '\\'], "-");
    match name.as_str() {
        "" | "." | ".." => UNKNOWN_SERIES.to_string(),
        _ => name,
    }
}

#[cfg(test)]
mod tests {
    use skywriter_core::{AmiiboRecord, RecordMetadata};

    use super::*;

    fn write_record(dir: &Path, name: &str, series: Option<&str>) {
        let record = AmiiboRecord {
            uid: "04000000000000".into(),
            pages: vec!["00000000".into(); 135],
            metadata: RecordMetadata {
                original_filename: format!("{name}.bin"),
                character_name: name.into(),
                game_series: series.map(str::to_string),
                ..Default::default()
            },
        };
        save_record(&dir.join(format!("{name}.json")), &record).unwrap();
    }

    #[test]
    fn records_are_filed_by_series() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        write_record(root, "Mario (Super Smash Bros.)", None);
        write_record(root, "Qbby", None);
        write_record(root, "Totally Unknown Character", None);
        write_record(root, "Link", Some("Custom"));

        let classifier = SeriesClassifier::reference().unwrap();
        let report = organize_dir(root, &classifier).unwrap();
        assert_eq!(report.processed, 4);
        assert_eq!(report.errors, 0);

        let mario = load_record(
            &root
                .join("Super Smash Bros.")
                .join("Mario (Super Smash Bros.).json"),
        )
        .unwrap();
        assert_eq!(mario.metadata.series(), Some("Super Smash Bros."));

        let qbby = load_record(&root.join("BoxBoy!").join("Qbby.json")).unwrap();
        assert_eq!(qbby.metadata.series(), Some("BoxBoy!"));

        assert!(root.join(UNKNOWN_SERIES).join("Totally Unknown Character.json").exists());

        let link = load_record(&root.join("Custom").join("Link.json")).unwrap();
        assert_eq!(link.metadata.series(), Some("Custom"));

        assert!(list_files(root, is_record_file).unwrap().is_empty());
    }

    #[test]
    fn existing_destination_is_not_overwritten() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        std::fs::create_dir(root.join("BoxBoy!")).unwrap();
        std::fs::write(root.join("BoxBoy!").join("Qbby.json"), "original").unwrap();
        write_record(root, "Qbby", None);

        let classifier = SeriesClassifier::reference().unwrap();
        let report = organize_dir(root, &classifier).unwrap();
        assert_eq!(report.skipped, 1);

        assert_eq!(
            std::fs::read_to_string(root.join("BoxBoy!").join("Qbby.json")).unwrap(),
            "original"
        );
        let left = load_record(&root.join("Qbby.json")).unwrap();
        assert_eq!(left.metadata.series(), Some("BoxBoy!"));
    }

    #[test]
    fn unreadable_record_counts_as_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("bad.json"), "{").unwrap();
        write_record(dir.path(), "Qbby", None);

        let classifier = SeriesClassifier::reference().unwrap();
        let report = organize_dir(dir.path(), &classifier).unwrap();
        assert_eq!(report.errors, 1);
        assert_eq!(report.processed, 1);
        assert!(dir.path().join("bad.json").exists());
    }

    #[test]
    fn series_names_stay_single_component() {
        assert_eq!(series_dir_name("Super Smash Bros."), "Super Smash Bros.");
        assert_eq!(series_dir_name("Fire Emblem/Three Houses"), "Fire Emblem-Three Houses");
        assert_eq!(series_dir_name(".."), UNKNOWN_SERIES);
        assert_eq!(series_dir_name("  "), UNKNOWN_SERIES);
    }
}
