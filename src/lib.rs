//! Genre gross explorer: load a movie summary table, filter it by genre and
//! year range, pivot it into a year × genre table and melt it back into line
//! chart series.
//!
//! The UI lives in [`app`] and [`ui`]; everything under [`data`] and
//! [`chart`] is plain data transformation and is usable without a window.

pub mod app;
pub mod chart;
pub mod cli;
pub mod color;
pub mod config;
pub mod data;
pub mod export;
pub mod state;
pub mod ui;

pub use data::filter::{filter, Selection};
pub use data::model::{ColumnMapping, Dataset, Record};
pub use data::pivot::{pivot, run_pipeline, unpivot, ChartPoint, ChartSeries, PivotTable};
