use regex::Regex;
use tracing::debug;

use crate::classifier::table::{SeriesTable, UNKNOWN_SERIES};
use crate::error::Result;
use crate::types::AmiiboRecord;

/// Compiled form of a [`SeriesTable`].
///
/// Patterns are compiled once so that a batch of thousands of labels does
/// not recompile the same regexes per file.
pub struct SeriesClassifier {
    categories: Vec<(String, Vec<Regex>)>,
}

impl SeriesClassifier {
    /// Compiles every pattern of `table`, preserving declaration order.
    ///
    /// # Errors
    ///
    /// Returns `SkywriterError::InvalidPattern` if any pattern is not a valid
    /// regular expression.
    pub fn new(table: &SeriesTable) -> Result<Self> {
        let categories = table
            .iter()
            .map(|entry| -> Result<(String, Vec<Regex>)> {
                let patterns = entry
                    .patterns
                    .iter()
                    .map(|p| Regex::new(&format!("(?i){p}")))
                    .collect::<std::result::Result<Vec<_>, _>>()?;
                Ok((entry.series.clone(), patterns))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { categories })
    }

    /// Classifier over the built-in reference table.
    ///
    /// # Errors
    ///
    /// Returns `SkywriterError::InvalidPattern` if a built-in pattern fails to
    /// compile (should never happen with the static table).
    pub fn reference() -> Result<Self> {
        Self::new(&SeriesTable::reference())
    }

    /// Returns the first category with a pattern found anywhere in `label`,
    /// or [`UNKNOWN_SERIES`].
    #[must_use]
    pub fn classify(&self, label: &str) -> &str {
        let normalized = label.to_lowercase();

        for (series, patterns) in &self.categories {
            if let Some(hit) = patterns.iter().find(|re| re.is_match(&normalized)) {
                debug!(label, series = %series, pattern = hit.as_str(), "series matched");
                return series;
            }
        }

        UNKNOWN_SERIES
    }

    /// Ensures `record` carries a series label and returns it.
    ///
    /// An existing non-empty `game_series` always wins; otherwise `label` is
    /// classified and the result written into the metadata. Returns `true`
    /// alongside the series when the record was modified.
    pub fn assign<'a>(&self, record: &'a mut AmiiboRecord, label: &str) -> (&'a str, bool) {
        let changed = record.metadata.series().is_none();
        if changed {
            record.metadata.game_series = Some(self.classify(label).to_string());
        }
        (record.metadata.game_series.as_deref().unwrap_or(UNKNOWN_SERIES), changed)
    }

    /// Number of categories in the compiled table.
    #[must_use]
    pub fn len(&self) -> usize {
        self.categories.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }
}

/// Classifies `label` against `table` without keeping the compiled form.
///
/// # Errors
///
/// Returns `SkywriterError::InvalidPattern` if `table` contains a bad pattern.
pub fn classify(label: &str, table: &SeriesTable) -> Result<String> {
    Ok(SeriesClassifier::new(table)?.classify(label).to_string())
}
