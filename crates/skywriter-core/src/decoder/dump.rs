use std::fmt::Write;
use std::ops::{Range, RangeInclusive};
use std::path::Path;

use tracing::debug;

use crate::decoder::filename::display_name;
use crate::error::{Result, SkywriterError};
use crate::types::{AmiiboRecord, RecordMetadata};

/// Bytes per NTAG215 page.
pub const PAGE_SIZE: usize = 4;

/// Pages in a full NTAG215 dump.
pub const PAGE_COUNT: usize = 135;

/// Exact length of a dump file.
pub const DUMP_SIZE: usize = PAGE_SIZE * PAGE_COUNT;

/// Length of the tag serial at the start of the dump.
pub const UID_LEN: usize = 7;

/// Character code location. Fixed by the amiibo data layout.
const CHARACTER_ID: Range<usize> = 84..88;

/// Game code location, immediately after the character code.
const GAME_ID: Range<usize> = 88..92;

/// File sizes accepted when sniffing candidate dumps in foreign repositories.
const SNIFF_SIZE: RangeInclusive<usize> = 500..=600;

/// NXP manufacturer byte, the first UID byte of every genuine NTAG215.
const NXP_MANUFACTURER: u8 = 0x04;

/// Decodes a raw dump into an [`AmiiboRecord`].
///
/// `source` is only used to fill the provenance fields of the metadata; no
/// I/O happens here.
///
/// # Errors
///
/// Returns `SkywriterError::SizeMismatch` unless `blob` is exactly
/// [`DUMP_SIZE`] bytes long.
pub fn decode(blob: &[u8], source: &Path) -> Result<AmiiboRecord> {
    if blob.len() != DUMP_SIZE {
        return Err(SkywriterError::SizeMismatch {
            expected: DUMP_SIZE,
            actual: blob.len(),
        });
    }

    let uid = hex_upper(&blob[..UID_LEN]);
    let pages: Vec<String> = blob.chunks_exact(PAGE_SIZE).map(hex_upper).collect();

    // Always present for a full dump; kept optional for the persisted schema.
    let character_id = blob.get(CHARACTER_ID).map(hex_upper);
    let game_id = blob.get(GAME_ID).map(hex_upper);

    let filename = source
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    debug!(%uid, ?character_id, ?game_id, file = %filename, "decoded dump");

    Ok(AmiiboRecord {
        uid,
        pages,
        metadata: RecordMetadata {
            character_name: display_name(&filename).to_string(),
            original_path: source.to_string_lossy().into_owned(),
            original_filename: filename,
            character_id,
            game_id,
            ..Default::default()
        },
    })
}

/// Reads and decodes the dump at `path`.
///
/// # Errors
///
/// Returns `SkywriterError::MalformedPath` if the file cannot be read, or
/// `SkywriterError::SizeMismatch` if it is not a full dump.
pub fn decode_file(path: &Path) -> Result<AmiiboRecord> {
    let blob = std::fs::read(path).map_err(|source| SkywriterError::MalformedPath {
        path: path.to_path_buf(),
        source,
    })?;
    decode(&blob, path)
}

/// Cheap plausibility check for files of unknown origin.
///
/// Accepts anything near the dump size whose first byte is the NXP
/// manufacturer code. A `true` result does not guarantee [`decode`] succeeds.
#[must_use]
pub fn looks_like_dump(bytes: &[u8]) -> bool {
    SNIFF_SIZE.contains(&bytes.len()) && bytes.first() == Some(&NXP_MANUFACTURER)
}

fn hex_upper(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len() * 2);
    for b in bytes {
        let _ = write!(out, "{b:02X}");
    }
    out
}
