use std::io::{BufRead, Write};
use std::path::Path;

use anyhow::{Result, bail};
use skywriter_core::{
    ProfileSource, SkipReason, enrichment_status, is_record_file, load_record, save_record,
};
use skywriter_profiles::{ProfileDatabase, profile_key};
use tracing::{info, warn};

use crate::batch::{BatchReport, list_files, stem};
use crate::prompt::Prompter;

/// Applies curated profiles to persisted records, optionally asking an
/// operator for the ones the database does not know.
pub struct Enricher<R, W> {
    db: ProfileDatabase,
    prompter: Option<Prompter<R, W>>,
    db_changed: bool,
}

impl<R: BufRead, W: Write> Enricher<R, W> {
    pub fn new(db: ProfileDatabase, prompter: Option<Prompter<R, W>>) -> Self {
        Self {
            db,
            prompter,
            db_changed: false,
        }
    }

    /// Enriches every top-level `.json` record in `dir` in place.
    pub fn enrich_dir(&mut self, dir: &Path) -> Result<BatchReport> {
        if !dir.is_dir() {
            bail!("directory does not exist: {}", dir.display());
        }

        let files = list_files(dir, is_record_file)?;
        let mut report = BatchReport::default();
        if files.is_empty() {
            warn!(dir = %dir.display(), "no JSON files found");
            return Ok(report);
        }
        info!(count = files.len(), "found records to enrich");

        for file in &files {
            match self.enrich_file(file) {
                Ok(Ok(written)) => {
                    report.processed += 1;
                    info!(file = %file.display(), fields = written, "enriched");
                }
                Ok(Err(reason)) => {
                    report.skipped += 1;
                    info!(file = %file.display(), %reason, "skipped");
                }
                Err(e) => {
                    report.errors += 1;
                    warn!(file = %file.display(), error = %e, "enrichment failed");
                }
            }
        }

        info!(%report, "enrichment complete");
        Ok(report)
    }

    /// Enriches one record file; the inner result tells whether it was updated.
    fn enrich_file(&mut self, file: &Path) -> Result<std::result::Result<usize, SkipReason>> {
        let mut record = load_record(file)?;
        let stem = stem(file);

        if let Err(reason) = enrichment_status(&record.metadata, &stem) {
            return Ok(Err(reason));
        }

        let character_id = record.character_id().unwrap_or_default().to_string();
        let game_id = record.game_id().map(str::to_string);

        let mut profile = self.db.lookup(&character_id, game_id.as_deref());
        if profile.is_none() {
            if let Some(prompter) = self.prompter.as_mut() {
                let filename = file
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_default();
                profile = prompter.profile_entry(&character_id, game_id.as_deref(), &filename)?;

                if let Some(entry) = &profile {
                    if prompter.confirm("Save to database?")? {
                        self.db.insert(&profile_key(&character_id, None), entry.clone())?;
                        self.db_changed = true;
                        info!(%character_id, "added to profile database");
                    }
                }
            }
        }

        let Some(profile) = profile else {
            return Ok(Err(SkipReason::NoProfile));
        };

        let written = record.metadata.apply_profile(&profile);
        save_record(file, &record)?;
        Ok(Ok(written))
    }

    /// Returns `true` if operator entries were added to the database.
    pub fn db_changed(&self) -> bool {
        self.db_changed
    }

    pub fn into_database(self) -> ProfileDatabase {
        self.db
    }
}

#[cfg(test)]
mod tests {
    use std::io::{Cursor, Empty, Sink};

    use skywriter_core::{AmiiboRecord, Profile, RecordMetadata};

    use super::*;

    fn write_record(dir: &Path, name: &str, character_id: Option<&str>) {
        let record = AmiiboRecord {
            uid: "04000000000000".into(),
            pages: vec!["00000000".into(); 135],
            metadata: RecordMetadata {
                original_filename: format!("{name}.bin"),
                character_name: name.into(),
                character_id: character_id.map(str::to_string),
                game_id: Some("00340102".into()),
                ..Default::default()
            },
        };
        save_record(&dir.join(format!("{name}.json")), &record).unwrap();
    }

    #[test]
    fn database_profiles_are_applied() {
        let dir = tempfile::tempdir().unwrap();
        write_record(dir.path(), "mario_ssb", Some("00000000"));
        write_record(dir.path(), "unknown", Some("7F000000"));
        write_record(dir.path(), "no_code", None);
        std::fs::write(dir.path().join("broken.json"), "nope").unwrap();

        let mut enricher: Enricher<Empty, Sink> = Enricher::new(ProfileDatabase::builtin(), None);
        let report = enricher.enrich_dir(dir.path()).unwrap();
        assert_eq!(
            report,
            BatchReport {
                processed: 1,
                skipped: 2,
                errors: 1
            }
        );

        let mario = load_record(&dir.path().join("mario_ssb.json")).unwrap();
        assert_eq!(mario.metadata.character_name, "Mario");
        assert_eq!(mario.metadata.series(), Some("Super Smash Bros."));
        assert!(!enricher.db_changed());
    }

    #[test]
    fn second_pass_skips_enriched_records() {
        let dir = tempfile::tempdir().unwrap();
        write_record(dir.path(), "mario_ssb", Some("00000000"));

        let mut enricher: Enricher<Empty, Sink> = Enricher::new(ProfileDatabase::builtin(), None);
        enricher.enrich_dir(dir.path()).unwrap();
        let report = enricher.enrich_dir(dir.path()).unwrap();
        assert_eq!(report.skipped, 1);
        assert_eq!(report.processed, 0);
    }

    #[test]
    fn operator_entry_is_applied_and_saved() {
        let dir = tempfile::tempdir().unwrap();
        write_record(dir.path(), "qbby_dump", Some("3B000000"));

        let script = "Qbby\nBoxBoy!\n\n\nFigure\ny\n";
        let prompter = Prompter::new(Cursor::new(script.as_bytes().to_vec()), Vec::new());
        let mut enricher = Enricher::new(ProfileDatabase::new(), Some(prompter));

        let report = enricher.enrich_dir(dir.path()).unwrap();
        assert_eq!(report.processed, 1);
        assert!(enricher.db_changed());

        let record = load_record(&dir.path().join("qbby_dump.json")).unwrap();
        assert_eq!(record.metadata.character_name, "Qbby");
        assert_eq!(record.metadata.series(), Some("BoxBoy!"));

        let db = enricher.into_database();
        assert_eq!(
            db.get("3B000000"),
            Some(&Profile {
                character_name: Some("Qbby".into()),
                game_series: Some("BoxBoy!".into()),
                amiibo_type: Some("Figure".into()),
                ..Default::default()
            })
        );
    }

    #[test]
    fn declined_operator_entry_skips_record() {
        let dir = tempfile::tempdir().unwrap();
        write_record(dir.path(), "mystery", Some("3B000000"));

        let prompter = Prompter::new(Cursor::new(b"\n".to_vec()), Vec::new());
        let mut enricher = Enricher::new(ProfileDatabase::new(), Some(prompter));

        let report = enricher.enrich_dir(dir.path()).unwrap();
        assert_eq!(report.skipped, 1);
        assert!(!enricher.db_changed());
    }
}
