use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Record – one row of the source table
// ---------------------------------------------------------------------------

/// A single movie-summary row: which genre, which year, how much it grossed.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub category: String,
    pub year: i64,
    pub value: f64,
}

impl Record {
    pub fn new(category: impl Into<String>, year: i64, value: f64) -> Self {
        Self {
            category: category.into(),
            year,
            value,
        }
    }
}

// ---------------------------------------------------------------------------
// ColumnMapping – which source columns feed a Record
// ---------------------------------------------------------------------------

/// Source column names for the three record fields.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnMapping {
    pub category: String,
    pub year: String,
    pub value: String,
}

impl Default for ColumnMapping {
    fn default() -> Self {
        Self {
            category: "genre".to_string(),
            year: "year".to_string(),
            value: "gross".to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// Dataset – the complete loaded table
// ---------------------------------------------------------------------------

/// The full parsed dataset with pre-computed widget options.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    /// All rows, in file order.
    pub records: Vec<Record>,
    /// Sorted set of distinct categories (multiselect options).
    pub categories: BTreeSet<String>,
    /// Smallest and largest year present (slider bounds).
    pub year_bounds: Option<(i64, i64)>,
}

impl Dataset {
    /// Build the option indices from the loaded records.
    pub fn from_records(records: Vec<Record>) -> Self {
        let categories: BTreeSet<String> =
            records.iter().map(|r| r.category.clone()).collect();

        let year_bounds = records.iter().fold(None, |acc, r| match acc {
            None => Some((r.year, r.year)),
            Some((lo, hi)) => Some((r.year.min(lo), r.year.max(hi))),
        });

        Dataset {
            records,
            categories,
            year_bounds,
        }
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the dataset is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
