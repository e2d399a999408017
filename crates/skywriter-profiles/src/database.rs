use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use skywriter_core::{Profile, ProfileSource};
use tracing::{debug, info};

use crate::error::{ProfileError, Result};

/// Length of a character or game code in hex digits.
const CODE_LEN: usize = 8;

/// Default database location: `<data dir>/skywriter/profiles.json`.
#[must_use]
pub fn default_path() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("skywriter")
        .join("profiles.json")
}

/// Builds the lookup key for a code pair.
///
/// `character_id` alone matches every game; with a `game_id` the key is
/// `"<character>:<game>"`. Codes are upper-cased.
#[must_use]
pub fn profile_key(character_id: &str, game_id: Option<&str>) -> String {
    match game_id {
        Some(game) => format!("{}:{}", character_id.to_uppercase(), game.to_uppercase()),
        None => character_id.to_uppercase(),
    }
}

/// Curated map from code keys to profiles, persisted as a JSON object.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProfileDatabase {
    entries: BTreeMap<String, Profile>,
}

impl ProfileDatabase {
    /// Creates an empty database.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The entries shipped with the pipeline.
    #[must_use]
    pub fn builtin() -> Self {
        let mut db = Self::new();
        db.entries.insert(
            "00000000".into(),
            Profile {
                character_name: Some("Mario".into()),
                game_series: Some("Super Smash Bros.".into()),
                biography: Some(
                    "Mario is the main character and protagonist of the long-running Mario \
                     franchise. He is a plumber who lives in the Mushroom Kingdom."
                        .into(),
                ),
                release_date: Some("November 21, 2014".into()),
                amiibo_type: Some("Figure".into()),
            },
        );
        db
    }

    /// Loads the database at `path`, falling back to [`builtin`](Self::builtin)
    /// when the file does not exist yet.
    ///
    /// # Errors
    ///
    /// Returns `ProfileError::Io` if an existing file cannot be read,
    /// `ProfileError::Json` if it is malformed, or `ProfileError::InvalidKey`
    /// if it contains a bad key.
    pub fn load(path: &Path) -> Result<Self> {
        let json = match std::fs::read_to_string(path) {
            Ok(json) => json,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                info!(path = %path.display(), "no profile database yet, using built-in entries");
                return Ok(Self::builtin());
            }
            Err(source) => {
                return Err(ProfileError::Io {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };

        let db: Self = serde_json::from_str(&json)?;
        if let Some(bad) = db.entries.keys().find(|k| normalize_key(k).is_none()) {
            return Err(ProfileError::InvalidKey(bad.clone()));
        }
        info!(path = %path.display(), entries = db.len(), "loaded profile database");
        Ok(db)
    }

    /// Writes the database to `path` as pretty JSON, creating parent directories.
    ///
    /// # Errors
    ///
    /// Returns `ProfileError::Io` if the file or its directory cannot be written.
    pub fn save(&self, path: &Path) -> Result<()> {
        let io_err = |source| ProfileError::Io {
            path: path.to_path_buf(),
            source,
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(io_err)?;
        }
        let mut json = serde_json::to_string_pretty(self)?;
        json.push('\n');
        std::fs::write(path, json).map_err(io_err)?;
        debug!(path = %path.display(), entries = self.len(), "saved profile database");
        Ok(())
    }

    /// Inserts or replaces the profile under `key`.
    ///
    /// # Errors
    ///
    /// Returns `ProfileError::InvalidKey` if `key` is not a valid code key.
    pub fn insert(&mut self, key: &str, profile: Profile) -> Result<Option<Profile>> {
        let key = normalize_key(key).ok_or_else(|| ProfileError::InvalidKey(key.to_string()))?;
        Ok(self.entries.insert(key, profile))
    }

    /// Returns the profile stored under exactly `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Profile> {
        self.entries.get(&key.to_uppercase())
    }

    /// Copies every entry of `other` into `self`, replacing duplicates.
    ///
    /// Returns the number of entries copied.
    pub fn merge(&mut self, other: ProfileDatabase) -> usize {
        let count = other.entries.len();
        self.entries.extend(other.entries);
        count
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Profile)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl ProfileSource for ProfileDatabase {
    /// Tries the exact character/game pair first, then the character alone.
    fn lookup(&self, character_id: &str, game_id: Option<&str>) -> Option<Profile> {
        game_id
            .and_then(|game| self.entries.get(&profile_key(character_id, Some(game))))
            .or_else(|| self.entries.get(&profile_key(character_id, None)))
            .cloned()
    }
}

fn normalize_key(key: &str) -> Option<String> {
    let is_code = |s: &str| s.len() == CODE_LEN && s.bytes().all(|b| b.is_ascii_hexdigit());

    let valid = match key.split_once(':') {
        Some((character, game)) => is_code(character) && is_code(game),
        None => is_code(key),
    };
    valid.then(|| key.to_uppercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile(name: &str) -> Profile {
        Profile {
            character_name: Some(name.into()),
            ..Default::default()
        }
    }

    #[test]
    fn builtin_contains_mario() {
        let db = ProfileDatabase::builtin();
        let mario = db.lookup("00000000", Some("00340102")).unwrap();
        assert_eq!(mario.character_name.as_deref(), Some("Mario"));
        assert_eq!(mario.amiibo_type.as_deref(), Some("Figure"));
    }

    #[test]
    fn compound_key_wins_over_character_key() {
        let mut db = ProfileDatabase::new();
        db.insert("01000000", profile("Luigi")).unwrap();
        db.insert("01000000:00340102", profile("Luigi (Smash)")).unwrap();

        let hit = db.lookup("01000000", Some("00340102")).unwrap();
        assert_eq!(hit.character_name.as_deref(), Some("Luigi (Smash)"));

        let hit = db.lookup("01000000", Some("00010000")).unwrap();
        assert_eq!(hit.character_name.as_deref(), Some("Luigi"));

        let hit = db.lookup("01000000", None).unwrap();
        assert_eq!(hit.character_name.as_deref(), Some("Luigi"));

        assert!(db.lookup("02000000", None).is_none());
    }

    #[test]
    fn keys_are_case_insensitive() {
        let mut db = ProfileDatabase::new();
        db.insert("3b000000", profile("Qbby")).unwrap();
        assert!(db.get("3B000000").is_some());
        assert!(db.lookup("3b000000", None).is_some());
    }

    #[test]
    fn insert_rejects_bad_keys() {
        let mut db = ProfileDatabase::new();
        for key in ["", "1234", "0000000G", "00000000:", "00000000:123", "0000000000000000"] {
            assert!(
                matches!(db.insert(key, profile("x")), Err(ProfileError::InvalidKey(_))),
                "key {key:?} should be rejected"
            );
        }
        assert!(db.is_empty());
    }

    #[test]
    fn missing_file_loads_builtin() {
        let dir = tempfile::tempdir().unwrap();
        let db = ProfileDatabase::load(&dir.path().join("profiles.json")).unwrap();
        assert_eq!(db, ProfileDatabase::builtin());
    }

    #[test]
    fn save_then_load_is_identity() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("profiles.json");

        let mut db = ProfileDatabase::builtin();
        db.insert("3B000000:03860302", profile("Qbby")).unwrap();
        db.save(&path).unwrap();

        let loaded = ProfileDatabase::load(&path).unwrap();
        assert_eq!(db, loaded);
        assert_eq!(loaded.len(), 2);
    }

    #[test]
    fn load_rejects_bad_keys_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("profiles.json");
        std::fs::write(&path, r#"{"mario": {"character_name": "Mario"}}"#).unwrap();
        assert!(matches!(
            ProfileDatabase::load(&path),
            Err(ProfileError::InvalidKey(_))
        ));
    }

    #[test]
    fn merge_replaces_duplicates() {
        let mut db = ProfileDatabase::builtin();
        let mut other = ProfileDatabase::new();
        other.insert("00000000", profile("Dr. Mario")).unwrap();
        other.insert("01000000", profile("Luigi")).unwrap();

        assert_eq!(db.merge(other), 2);
        assert_eq!(db.len(), 2);
        assert_eq!(
            db.get("00000000").unwrap().character_name.as_deref(),
            Some("Dr. Mario")
        );
    }

    #[test]
    fn default_path_is_namespaced() {
        let path = default_path();
        assert!(path.ends_with("skywriter/profiles.json"));
    }
}
