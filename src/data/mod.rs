/// Data layer: core types, loading, caching, filtering and reshaping.
///
/// Architecture:
/// ```text
///  .csv / .json / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → Dataset        (memoized by cache)
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  categories + year range → Vec<Record>
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  pivot    │  wide PivotTable ⇄ long ChartSeries
///   └──────────┘
/// ```

pub mod cache;
pub mod filter;
pub mod loader;
pub mod model;
pub mod pivot;
