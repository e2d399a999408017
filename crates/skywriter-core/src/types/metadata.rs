use serde::{Deserialize, Serialize};

/// Descriptive metadata carried alongside a decoded dump.
///
/// Only `original_filename`, `original_path`, `character_name` and the two
/// identifier codes are known at decode time. The remaining fields stay
/// `None` until an enrichment pass or the series organizer fills them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordMetadata {
    /// File name of the source dump (e.g. `"Mario.bin"`).
    #[serde(default)]
    pub original_filename: String,

    /// Path of the source dump as it was given to the decoder.
    #[serde(default)]
    pub original_path: String,

    /// Display name. Defaults to the file name without its dump extension.
    #[serde(default)]
    pub character_name: String,

    /// Game series label; also the directory the record is filed under.
    pub game_series: Option<String>,

    /// Character code, bytes 84..88 of the dump as uppercase hex.
    pub character_id: Option<String>,

    /// Game code, bytes 88..92 of the dump as uppercase hex.
    pub game_id: Option<String>,

    pub biography: Option<String>,

    pub release_date: Option<String>,

    /// Physical form of the amiibo (`"Figure"`, `"Card"`, `"Yarn"`, ...).
    pub amiibo_type: Option<String>,
}

impl RecordMetadata {
    /// Returns the series label if one is set and not blank.
    #[must_use]
    pub fn series(&self) -> Option<&str> {
        self.game_series.as_deref().filter(|s| !s.trim().is_empty())
    }

    /// Overwrites every field for which `profile` carries a non-empty value.
    ///
    /// Returns the number of fields written.
    pub fn apply_profile(&mut self, profile: &Profile) -> usize {
        let mut written = 0;

        if let Some(name) = non_empty(&profile.character_name) {
            self.character_name = name.to_string();
            written += 1;
        }

        for (target, value) in [
            (&mut self.game_series, &profile.game_series),
            (&mut self.biography, &profile.biography),
            (&mut self.release_date, &profile.release_date),
            (&mut self.amiibo_type, &profile.amiibo_type),
        ] {
            if let Some(v) = non_empty(value) {
                *target = Some(v.to_string());
                written += 1;
            }
        }

        written
    }
}

/// Partial metadata for one character/game code pair.
///
/// Produced by a profile lookup or an operator prompt and merged into a
/// record with [`RecordMetadata::apply_profile`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub character_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub game_series: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub biography: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub release_date: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amiibo_type: Option<String>,
}

impl Profile {
    /// Returns `true` if no field carries a non-empty value.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        [
            &self.character_name,
            &self.game_series,
            &self.biography,
            &self.release_date,
            &self.amiibo_type,
        ]
        .into_iter()
        .all(|f| non_empty(f).is_none())
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decoded_metadata() -> RecordMetadata {
        RecordMetadata {
            original_filename: "Mario.bin".into(),
            original_path: "dumps/Mario.bin".into(),
            character_name: "Mario".into(),
            character_id: Some("00000000".into()),
            game_id: Some("00340102".into()),
            ..Default::default()
        }
    }

    #[test]
    fn series_ignores_empty_label() {
        let mut meta = decoded_metadata();
        assert_eq!(meta.series(), None);
        meta.game_series = Some(String::new());
        assert_eq!(meta.series(), None);
        meta.game_series = Some("  \t".into());
        assert_eq!(meta.series(), None);
        meta.game_series = Some("Mario".into());
        assert_eq!(meta.series(), Some("Mario"));
    }

    #[test]
    fn apply_profile_overwrites_present_fields() {
        let mut meta = decoded_metadata();
        let profile = Profile {
            character_name: Some("Mario".into()),
            game_series: Some("Super Smash Bros.".into()),
            release_date: Some("November 21, 2014".into()),
            amiibo_type: Some("Figure".into()),
            ..Default::default()
        };

        assert_eq!(meta.apply_profile(&profile), 4);
        assert_eq!(meta.series(), Some("Super Smash Bros."));
        assert_eq!(meta.release_date.as_deref(), Some("November 21, 2014"));
        assert_eq!(meta.amiibo_type.as_deref(), Some("Figure"));
        assert_eq!(meta.biography, None);
    }

    #[test]
    fn apply_profile_skips_empty_strings() {
        let mut meta = decoded_metadata();
        meta.biography = Some("Keep me".into());
        let profile = Profile {
            character_name: Some("  ".into()),
            biography: Some(String::new()),
            ..Default::default()
        };

        assert!(profile.is_empty());
        assert_eq!(meta.apply_profile(&profile), 0);
        assert_eq!(meta.character_name, "Mario");
        assert_eq!(meta.biography.as_deref(), Some("Keep me"));
    }

    #[test]
    fn missing_fields_deserialize_as_none() {
        let meta: RecordMetadata =
            serde_json::from_str(r#"{"original_filename": "Link.nfc", "character_name": "Link"}"#)
                .unwrap();
        assert_eq!(meta.original_filename, "Link.nfc");
        assert_eq!(meta.original_path, "");
        assert_eq!(meta.game_series, None);
        assert_eq!(meta.character_id, None);
    }

    #[test]
    fn profile_omits_absent_fields() {
        let profile = Profile {
            character_name: Some("Qbby".into()),
            ..Default::default()
        };
        let json = serde_json::to_string(&profile).unwrap();
        assert_eq!(json, r#"{"character_name":"Qbby"}"#);
    }
}
