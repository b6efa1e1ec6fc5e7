use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;

use super::loader::load_file;
use super::model::{ColumnMapping, Dataset};

/// Where a dataset comes from. Two sources are the same cache key when both
/// the path and the column mapping match.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DataSource {
    pub path: PathBuf,
    pub columns: ColumnMapping,
}

impl DataSource {
    pub fn new(path: impl Into<PathBuf>, columns: ColumnMapping) -> Self {
        Self {
            path: path.into(),
            columns,
        }
    }
}

/// Memoizes the loaded dataset for the lifetime of the process.
///
/// Holds at most one entry. The entry lives until [`DatasetCache::invalidate`]
/// is called or a different source is requested. When disabled every call
/// goes to disk.
#[derive(Debug, Default)]
pub struct DatasetCache {
    enabled: bool,
    entry: Option<(DataSource, Arc<Dataset>)>,
}

impl DatasetCache {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            entry: None,
        }
    }

    /// Return the cached dataset for `source`, loading it on a miss.
    pub fn get_or_load(&mut self, source: &DataSource) -> Result<Arc<Dataset>> {
        self.get_or_load_with(source, |s| load_file(&s.path, &s.columns))
    }

    /// Same as [`get_or_load`](Self::get_or_load) with a custom loader.
    pub fn get_or_load_with<F>(&mut self, source: &DataSource, load: F) -> Result<Arc<Dataset>>
    where
        F: FnOnce(&DataSource) -> Result<Dataset>,
    {
        if self.enabled {
            if let Some((cached_source, dataset)) = &self.entry {
                if cached_source == source {
                    log::debug!("dataset cache hit for {}", source.path.display());
                    return Ok(Arc::clone(dataset));
                }
            }
        }

        let dataset = Arc::new(load(source)?);
        log::info!(
            "Loaded {} records ({} categories) from {}",
            dataset.len(),
            dataset.categories.len(),
            source.path.display()
        );

        if self.enabled {
            self.entry = Some((source.clone(), Arc::clone(&dataset)));
        }
        Ok(dataset)
    }

    /// Drop the cached entry so the next call reloads from disk.
    pub fn invalidate(&mut self) {
        if self.entry.take().is_some() {
            log::info!("dataset cache invalidated");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::Record;
    use std::cell::Cell;

    fn source(path: &str) -> DataSource {
        DataSource::new(path, ColumnMapping::default())
    }

    fn counting_loader(calls: &Cell<usize>) -> impl Fn(&DataSource) -> Result<Dataset> + '_ {
        move |_| {
            calls.set(calls.get() + 1);
            Ok(Dataset::from_records(vec![Record::new("Action", 2000, 1.0)]))
        }
    }

    #[test]
    fn test_cache_hit_returns_same_dataset() {
        let calls = Cell::new(0);
        let mut cache = DatasetCache::new(true);
        let src = source("movies.csv");

        let a = cache.get_or_load_with(&src, counting_loader(&calls)).unwrap();
        let b = cache.get_or_load_with(&src, counting_loader(&calls)).unwrap();

        assert_eq!(calls.get(), 1);
        assert!(Arc::ptr_eq(&a, &b));
    }

    #[test]
    fn test_invalidate_forces_reload() {
        let calls = Cell::new(0);
        let mut cache = DatasetCache::new(true);
        let src = source("movies.csv");

        cache.get_or_load_with(&src, counting_loader(&calls)).unwrap();
        cache.invalidate();
        cache.get_or_load_with(&src, counting_loader(&calls)).unwrap();

        assert_eq!(calls.get(), 2);
    }

    #[test]
    fn test_new_source_replaces_entry() {
        let calls = Cell::new(0);
        let mut cache = DatasetCache::new(true);

        cache.get_or_load_with(&source("a.csv"), counting_loader(&calls)).unwrap();
        cache.get_or_load_with(&source("b.csv"), counting_loader(&calls)).unwrap();
        cache.get_or_load_with(&source("b.csv"), counting_loader(&calls)).unwrap();

        assert_eq!(calls.get(), 2);
    }

    #[test]
    fn test_disabled_cache_always_loads() {
        let calls = Cell::new(0);
        let mut cache = DatasetCache::new(false);
        let src = source("movies.csv");

        cache.get_or_load_with(&src, counting_loader(&calls)).unwrap();
        cache.get_or_load_with(&src, counting_loader(&calls)).unwrap();

        assert_eq!(calls.get(), 2);
    }

    #[test]
    fn test_load_error_is_not_cached() {
        let mut cache = DatasetCache::new(true);
        let src = source("missing.csv");

        assert!(cache
            .get_or_load_with(&src, |_| Err(anyhow::anyhow!("boom")))
            .is_err());
        let calls = Cell::new(0);
        cache.get_or_load_with(&src, counting_loader(&calls)).unwrap();
        assert_eq!(calls.get(), 1);
    }
}
