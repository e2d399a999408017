use serde::{Deserialize, Serialize};

use super::metadata::RecordMetadata;

/// The decoded form of one physical NTAG215 amiibo dump.
///
/// This is also the persisted JSON layout consumed by the Android app:
/// `uid`, `pages` and `metadata` in that order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AmiiboRecord {
    /// Tag serial, 7 bytes as 14 uppercase hex characters.
    ///
    /// Identifies one physical tag, not one character: two dumps of the
    /// same character have different UIDs.
    pub uid: String,

    /// All 135 pages in tag order, each 4 bytes as 8 uppercase hex characters.
    pub pages: Vec<String>,

    pub metadata: RecordMetadata,
}

impl AmiiboRecord {
    /// Returns the page at `index`, if present.
    #[must_use]
    pub fn page(&self, index: usize) -> Option<&str> {
        self.pages.get(index).map(String::as_str)
    }

    /// Returns the character code embedded in the dump.
    #[must_use]
    pub fn character_id(&self) -> Option<&str> {
        self.metadata.character_id.as_deref()
    }

    /// Returns the game code embedded in the dump.
    #[must_use]
    pub fn game_id(&self) -> Option<&str> {
        self.metadata.game_id.as_deref()
    }
}

impl std::fmt::Display for AmiiboRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "AmiiboRecord(uid={}", self.uid)?;
        write!(f, ", name={:?}", self.metadata.character_name)?;
        if let Some(id) = self.character_id() {
            write!(f, ", character={id}")?;
        }
        if let Some(series) = self.metadata.series() {
            write!(f, ", series={series:?}")?;
        }
        write!(f, ")")
    }
}
