//! # Profile enrichment
//!
//! Fills the descriptive fields of a decoded record from a curated profile
//! source keyed by the character and game codes embedded in the dump.

use tracing::debug;

use crate::types::{Profile, RecordMetadata};

/// Anything that can resolve a character/game code pair to a profile.
pub trait ProfileSource {
    /// Looks up the profile for `character_id`, optionally narrowed by `game_id`.
    fn lookup(&self, character_id: &str, game_id: Option<&str>) -> Option<Profile>;
}

impl<S: ProfileSource + ?Sized> ProfileSource for &S {
    fn lookup(&self, character_id: &str, game_id: Option<&str>) -> Option<Profile> {
        (**self).lookup(character_id, game_id)
    }
}

/// Why a record was left untouched by an enrichment pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The record carries no character code to look up.
    NoCharacterId,
    /// The record already has a curated name plus series or biography.
    AlreadyEnriched,
    /// Neither the profile source nor the operator supplied anything.
    NoProfile,
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoCharacterId => write!(f, "no character_id found"),
            Self::AlreadyEnriched => write!(f, "already enriched"),
            Self::NoProfile => write!(f, "no profile data found"),
        }
    }
}

/// Decides whether `metadata` still needs a profile lookup.
///
/// `stem` is the record's file stem; a `character_name` equal to it is the
/// decoder default and does not count as curated.
///
/// # Errors
///
/// Returns the [`SkipReason`] when the record should be skipped.
pub fn enrichment_status(metadata: &RecordMetadata, stem: &str) -> Result<(), SkipReason> {
    if metadata.character_id.as_deref().is_none_or(str::is_empty) {
        return Err(SkipReason::NoCharacterId);
    }

    let curated_name =
        !metadata.character_name.is_empty() && metadata.character_name != stem;
    let has_details = metadata.series().is_some()
        || metadata.biography.as_deref().is_some_and(|b| !b.is_empty());

    if curated_name && has_details {
        return Err(SkipReason::AlreadyEnriched);
    }

    Ok(())
}

/// Looks up and applies a profile from `source`.
///
/// Returns the number of metadata fields written.
///
/// # Errors
///
/// Returns the [`SkipReason`] if the record is not eligible or no profile
/// was found.
pub fn enrich<S: ProfileSource>(
    metadata: &mut RecordMetadata,
    stem: &str,
    source: &S,
) -> Result<usize, SkipReason> {
    enrichment_status(metadata, stem)?;

    let character_id = metadata.character_id.as_deref().unwrap_or_default();
    let profile = source
        .lookup(character_id, metadata.game_id.as_deref())
        .ok_or(SkipReason::NoProfile)?;

    let written = metadata.apply_profile(&profile);
    debug!(stem, written, "profile applied");
    Ok(written)
}
