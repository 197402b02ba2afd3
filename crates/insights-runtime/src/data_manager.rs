//! Process-wide cache of the normalized catalog.
//!
//! The first [`DataManager::get_data`] call reads and normalizes the source;
//! later calls hand out the same [`Arc`] until the cache is reloaded or
//! invalidated. A failed reload leaves the previous snapshot in place.

use std::sync::Arc;
use std::time::{Duration, Instant};

use insights_core::error::Result;
use insights_data::analysis::{load_catalog, CatalogSnapshot};
use insights_data::reader::RecordSource;

// ── DataManager ───────────────────────────────────────────────────────────────

/// Owner of the one cached [`CatalogSnapshot`].
///
/// # Example
/// ```no_run
/// use insights_data::reader::CsvSource;
/// use insights_runtime::data_manager::DataManager;
///
/// let mut mgr = DataManager::new(CsvSource::new("netflix_titles.csv"));
/// let snapshot = mgr.get_data()?;
/// println!("{} titles", snapshot.records.len());
/// # Ok::<(), insights_core::InsightsError>(())
/// ```
pub struct DataManager {
    source: Box<dyn RecordSource>,
    cache: Option<Arc<CatalogSnapshot>>,
    /// When the cache was last populated.
    cache_timestamp: Option<Instant>,
    /// Completed loads since construction.
    load_count: usize,
}

impl DataManager {
    pub fn new(source: impl RecordSource + 'static) -> Self {
        Self {
            source: Box::new(source),
            cache: None,
            cache_timestamp: None,
            load_count: 0,
        }
    }

    // ── Public API ────────────────────────────────────────────────────────

    /// Return the cached snapshot, loading it on first use.
    pub fn get_data(&mut self) -> Result<Arc<CatalogSnapshot>> {
        if let Some(snapshot) = &self.cache {
            tracing::debug!("returning cached catalog snapshot");
            return Ok(Arc::clone(snapshot));
        }
        self.reload()
    }

    /// Build a fresh snapshot from the source and swap it in.
    ///
    /// The new snapshot is fully built before the swap; on failure the
    /// current cache is kept and the error is returned.
    pub fn reload(&mut self) -> Result<Arc<CatalogSnapshot>> {
        match load_catalog(self.source.as_ref()) {
            Ok(snapshot) => {
                let snapshot = Arc::new(snapshot);
                tracing::debug!(
                    rows = snapshot.metadata.clean_rows,
                    dropped = snapshot.metadata.dropped_rows,
                    "catalog cache updated"
                );
                self.cache = Some(Arc::clone(&snapshot));
                self.cache_timestamp = Some(Instant::now());
                self.load_count += 1;
                Ok(snapshot)
            }
            Err(e) => {
                tracing::warn!(error = %e, "catalog load failed; keeping previous snapshot");
                Err(e)
            }
        }
    }

    /// Discard the current snapshot, forcing the next [`get_data`] call to
    /// load again.
    ///
    /// [`get_data`]: DataManager::get_data
    pub fn invalidate_cache(&mut self) {
        self.cache = None;
        self.cache_timestamp = None;
        tracing::debug!("cache invalidated");
    }

    /// Age of the current snapshot, or `None` if nothing is cached.
    pub fn cache_age(&self) -> Option<Duration> {
        self.cache_timestamp.map(|ts| ts.elapsed())
    }

    pub fn load_count(&self) -> usize {
        self.load_count
    }

    pub fn source_description(&self) -> String {
        self.source.describe()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
