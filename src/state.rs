use std::path::{Path, PathBuf};
use std::sync::Arc;

use airport_dashboard::config::Config;
use airport_dashboard::dashboard::{recompute, DashboardView, DatasetCache};
use airport_dashboard::data::filter::FilterCriteria;
use airport_dashboard::data::model::DerivedDataset;

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    pub config: Config,

    /// Memoized datasets, keyed by source path.
    pub cache: DatasetCache,

    /// Path of the dataset on screen.
    pub source: Option<PathBuf>,

    /// Loaded dataset (None until user loads a file).
    pub dataset: Option<Arc<DerivedDataset>>,

    /// Current user selection.
    pub criteria: FilterCriteria,

    /// Output of the last recomputation.
    pub view: Option<DashboardView>,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        Self {
            cache: DatasetCache::new(config.data.allowed_regions.clone()),
            config,
            source: None,
            dataset: None,
            criteria: FilterCriteria::default(),
            view: None,
            status_message: None,
        }
    }

    /// Open `path` through the cache.
    pub fn open(&mut self, path: &Path) {
        let result = self.cache.get_or_load(path);
        self.accept(path, result);
    }

    /// Re-read the current source, bypassing the cache.
    pub fn reload(&mut self) {
        let Some(path) = self.source.clone() else {
            return;
        };
        let result = self.cache.reload(&path);
        self.accept(&path, result);
    }

    fn accept(
        &mut self,
        path: &Path,
        result: Result<Arc<DerivedDataset>, airport_dashboard::error::DataSourceError>,
    ) {
        match result {
            Ok(dataset) => {
                log::info!(
                    "Showing {} airports in states {:?}",
                    dataset.len(),
                    dataset.states
                );
                self.set_dataset(path, dataset);
            }
            Err(e) => {
                log::error!("Failed to load {}: {e}", path.display());
                self.status_message = Some(format!("Error: {e}"));
            }
        }
    }

    /// Ingest a newly loaded dataset, select everything and recompute.
    pub fn set_dataset(&mut self, path: &Path, dataset: Arc<DerivedDataset>) {
        self.criteria = FilterCriteria::select_all(&dataset);
        self.dataset = Some(dataset);
        self.source = Some(path.to_path_buf());
        self.status_message = None;
        self.recompute();
    }

    /// Rebuild every view from the dataset and current criteria.
    pub fn recompute(&mut self) {
        self.view = self
            .dataset
            .as_ref()
            .map(|ds| recompute(ds, &self.criteria, &self.config.view));
    }

    /// Select all states.
    pub fn select_all_states(&mut self) {
        if let Some(ds) = &self.dataset {
            self.criteria.states = ds.states.clone();
        }
    }

    /// Select all facility types.
    pub fn select_all_types(&mut self) {
        if let Some(ds) = &self.dataset {
            self.criteria.facility_types = ds.facility_types.clone();
        }
    }
}
