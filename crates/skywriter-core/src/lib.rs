//! # Skywriter Core
//!
//! Decoding of NTAG215 amiibo dumps into the JSON records bundled with the
//! Skywriter app, plus game series classification and profile enrichment.
//!
//! ## Quick Start
//!
//! ```rust
//! use std::path::Path;
//! use skywriter_core::{SeriesClassifier, decode};
//!
//! let mut blob = vec![0u8; 540];
//! blob[0] = 0x04;
//! let mut record = decode(&blob, Path::new("Qbby.bin")).unwrap();
//! assert_eq!(record.pages.len(), 135);
//!
//! let classifier = SeriesClassifier::reference().unwrap();
//! let (series, _) = classifier.assign(&mut record, "Qbby");
//! assert_eq!(series, "BoxBoy!");
//! ```
pub mod classifier;
pub mod decoder;
pub mod enrich;
pub mod error;
pub mod store;
pub mod types;

// Re-export primary API
pub use classifier::{SeriesClassifier, SeriesEntry, SeriesTable, UNKNOWN_SERIES, classify};
pub use decoder::{
    DUMP_SIZE, PAGE_COUNT, decode, decode_file, display_name, is_dump_file, looks_like_dump,
};
pub use enrich::{ProfileSource, SkipReason, enrich, enrichment_status};
pub use error::{Result, SkywriterError};
pub use store::{is_record_file, load_record, save_record};
pub use types::{AmiiboRecord, Profile, RecordMetadata};
