use std::collections::{BTreeMap, BTreeSet};

use super::filter::{filter, Selection};
use super::model::Record;

// ---------------------------------------------------------------------------
// PivotTable – wide form: one row per year, one column per category
// ---------------------------------------------------------------------------

/// Dense year × category table of summed values.
///
/// Invariants:
/// * `years` is strictly descending.
/// * `categories` is strictly ascending and holds every category present in
///   the input the table was built from.
/// * `cells.len() == years.len()` and every row has `categories.len()` cells;
///   combinations absent from the input hold `0.0`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PivotTable {
    pub years: Vec<i64>,
    pub categories: Vec<String>,
    pub cells: Vec<Vec<f64>>,
}

impl PivotTable {
    pub fn row_count(&self) -> usize {
        self.years.len()
    }

    pub fn column_count(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.years.is_empty()
    }

    /// Cell lookup by key. `None` when the year or category is not in the table.
    pub fn value(&self, year: i64, category: &str) -> Option<f64> {
        let row = self.years.iter().position(|&y| y == year)?;
        let col = self.categories.iter().position(|c| c == category)?;
        Some(self.cells[row][col])
    }

    /// Sum of every cell.
    pub fn total(&self) -> f64 {
        self.cells.iter().flatten().sum()
    }
}

/// Aggregate records into a dense [`PivotTable`].
///
/// Groups by `(year, category)` summing `value`, then fills every category
/// seen anywhere in `records` for every year with `0.0` where no record
/// contributed. Empty input gives a table with no rows and no columns.
pub fn pivot(records: &[Record]) -> PivotTable {
    let mut sums: BTreeMap<(i64, &str), f64> = BTreeMap::new();
    let mut years: BTreeSet<i64> = BTreeSet::new();
    let mut categories: BTreeSet<&str> = BTreeSet::new();

    for r in records {
        *sums.entry((r.year, r.category.as_str())).or_insert(0.0) += r.value;
        years.insert(r.year);
        categories.insert(r.category.as_str());
    }

    let years: Vec<i64> = years.into_iter().rev().collect();
    let cells: Vec<Vec<f64>> = years
        .iter()
        .map(|&year| {
            categories
                .iter()
                .map(|&cat| sums.get(&(year, cat)).copied().unwrap_or(0.0))
                .collect()
        })
        .collect();

    PivotTable {
        years,
        categories: categories.into_iter().map(str::to_string).collect(),
        cells,
    }
}

// ---------------------------------------------------------------------------
// ChartSeries – long form: one point per table cell
// ---------------------------------------------------------------------------

/// One `(year, category, value)` triple of the long-form chart data.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartPoint {
    pub year: i64,
    pub category: String,
    pub value: f64,
}

pub type ChartSeries = Vec<ChartPoint>;

/// Melt a [`PivotTable`] back to long form.
///
/// Emits exactly `row_count * column_count` points, row-major, copying cell
/// values unchanged.
pub fn unpivot(table: &PivotTable) -> ChartSeries {
    let mut out = Vec::with_capacity(table.row_count() * table.column_count());
    for (year, row) in table.years.iter().zip(&table.cells) {
        for (category, value) in table.categories.iter().zip(row) {
            out.push(ChartPoint {
                year: *year,
                category: category.clone(),
                value: *value,
            });
        }
    }
    out
}

/// Filter, pivot and unpivot in one go.
pub fn run_pipeline(records: &[Record], selection: &Selection) -> (PivotTable, ChartSeries) {
    let filtered = filter(records, selection);
    let table = pivot(&filtered);
    let series = unpivot(&table);
    log::debug!(
        "pipeline: {} records -> {} filtered -> {}x{} table -> {} points",
        records.len(),
        filtered.len(),
        table.row_count(),
        table.column_count(),
        series.len()
    );
    (table, series)
}
