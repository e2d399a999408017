pub mod series;
pub mod table;

pub use series::{SeriesClassifier, classify};
pub use table::{SeriesEntry, SeriesTable, UNKNOWN_SERIES};
