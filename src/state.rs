use std::path::Path;
use std::sync::Arc;

use anyhow::Result;

use crate::color::ColorMap;
use crate::config::AppConfig;
use crate::data::cache::{DataSource, DatasetCache};
use crate::data::filter::Selection;
use crate::data::model::Dataset;
use crate::data::pivot::{run_pipeline, ChartSeries, PivotTable};

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    pub config: AppConfig,

    cache: DatasetCache,

    /// Where the current dataset comes from.
    pub source: DataSource,

    /// Dataset used by the last successful run (None until a load succeeds).
    pub dataset: Option<Arc<Dataset>>,

    /// Current widget selection.
    pub selection: Selection,

    /// Output of the last pipeline run.
    pub table: PivotTable,
    pub series: ChartSeries,

    /// Category colours, built from the full category set.
    pub color_map: ColorMap,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl AppState {
    pub fn new(config: AppConfig) -> Self {
        let source = DataSource::new(config.data_path.clone(), config.columns.clone());
        let selection = Selection::new(config.default_categories.clone(), config.default_year_range);
        Self {
            cache: DatasetCache::new(config.cache_dataset),
            source,
            dataset: None,
            selection,
            table: PivotTable::default(),
            series: ChartSeries::new(),
            color_map: ColorMap::default(),
            status_message: None,
            config,
        }
    }

    /// Load the configured source and run the pipeline with the initial
    /// selection for that dataset.
    pub fn open_initial(&mut self) {
        let source = self.source.clone();
        self.open_source(source);
    }

    /// Switch to a different file, keeping the configured column mapping.
    pub fn open_path(&mut self, path: &Path) {
        let source = DataSource::new(path.to_path_buf(), self.config.columns.clone());
        self.open_source(source);
    }

    /// Only a successful load switches the source; on failure the previous
    /// source, selection and output stay active.
    fn open_source(&mut self, source: DataSource) {
        match self.cache.get_or_load(&source) {
            Ok(dataset) => {
                self.source = source;
                self.selection = Selection::initial(
                    &dataset,
                    &self.config.default_categories,
                    self.config.default_year_range,
                );
                self.color_map = ColorMap::new(&dataset.categories);
                self.apply(dataset);
            }
            Err(e) => self.fail(e),
        }
    }

    /// Execute load → filter → pivot → unpivot for the current selection.
    ///
    /// A load failure leaves the previous table and chart in place and
    /// reports the error.
    pub fn rerun(&mut self) {
        match self.load() {
            Ok(dataset) => {
                if self.color_map_is_stale(&dataset) {
                    self.color_map = ColorMap::new(&dataset.categories);
                }
                self.apply(dataset);
            }
            Err(e) => self.fail(e),
        }
    }

    /// Drop the cached dataset and rerun from disk.
    pub fn reload(&mut self) {
        self.cache.invalidate();
        self.rerun();
    }

    fn load(&mut self) -> Result<Arc<Dataset>> {
        self.cache.get_or_load(&self.source)
    }

    fn apply(&mut self, dataset: Arc<Dataset>) {
        let (table, series) = run_pipeline(&dataset.records, &self.selection);
        self.table = table;
        self.series = series;
        self.dataset = Some(dataset);
        self.status_message = None;
    }

    fn fail(&mut self, e: anyhow::Error) {
        log::error!("Failed to load dataset: {e:#}");
        self.status_message = Some(format!("Error: {e:#}"));
    }

    fn color_map_is_stale(&self, dataset: &Dataset) -> bool {
        match &self.dataset {
            Some(prev) => prev.categories != dataset.categories,
            None => true,
        }
    }

    // -- selection changes --

    /// Toggle a single category in the multiselect.
    pub fn toggle_category(&mut self, category: &str) {
        if !self.selection.categories.remove(category) {
            self.selection.categories.insert(category.to_string());
        }
        self.rerun();
    }

    /// Select every category of the dataset.
    pub fn select_all(&mut self) {
        if let Some(ds) = &self.dataset {
            self.selection.categories = ds.categories.clone();
            self.rerun();
        }
    }

    /// Deselect every category.
    pub fn select_none(&mut self) {
        self.selection.categories.clear();
        self.rerun();
    }

    /// Set the inclusive year range. `min > max` is accepted and selects nothing.
    pub fn set_year_range(&mut self, min: i64, max: i64) {
        if self.selection.year_range != (min, max) {
            self.selection.year_range = (min, max);
            self.rerun();
        }
    }
}
