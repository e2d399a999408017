pub mod metadata;
pub mod record;

pub use metadata::{Profile, RecordMetadata};
pub use record::AmiiboRecord;
