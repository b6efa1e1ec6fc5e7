use std::collections::BTreeSet;

use super::model::{Dataset, Record};

// ---------------------------------------------------------------------------
// Selection: what the widgets currently ask for
// ---------------------------------------------------------------------------

/// The user's filter choice: a set of categories and an inclusive year range.
///
/// An empty category set is legal and selects nothing. A range whose start is
/// after its end is legal too and also selects nothing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    pub categories: BTreeSet<String>,
    pub year_range: (i64, i64),
}

impl Selection {
    pub fn new<I, S>(categories: I, year_range: (i64, i64)) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            categories: categories.into_iter().map(Into::into).collect(),
            year_range,
        }
    }

    /// Initial widget state for a freshly loaded dataset.
    ///
    /// Default categories the dataset does not contain are dropped, and the
    /// default range is clamped into the dataset's year bounds.
    pub fn initial(dataset: &Dataset, default_categories: &[String], default_range: (i64, i64)) -> Self {
        let categories = default_categories
            .iter()
            .filter(|c| dataset.categories.contains(*c))
            .cloned()
            .collect();

        let year_range = match dataset.year_bounds {
            Some((lo, hi)) => (default_range.0.clamp(lo, hi), default_range.1.clamp(lo, hi)),
            None => default_range,
        };

        Self {
            categories,
            year_range,
        }
    }

    /// Whether a single record passes this selection.
    pub fn matches(&self, record: &Record) -> bool {
        let (min, max) = self.year_range;
        min <= record.year && record.year <= max && self.categories.contains(&record.category)
    }
}

/// Return the records that pass `selection`, in input order.
pub fn filter(records: &[Record], selection: &Selection) -> Vec<Record> {
    if selection.categories.is_empty() || selection.year_range.0 > selection.year_range.1 {
        return Vec::new();
    }
    records
        .iter()
        .filter(|r| selection.matches(r))
        .cloned()
        .collect()
}
