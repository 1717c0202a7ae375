//! Recomputation entry points.
//!
//! Architecture:
//! ```text
//!   path ──► DatasetCache ──► Arc<DerivedDataset>      (once per source)
//!                                   │
//!   FilterCriteria ─────────────────┤
//!                                   ▼
//!                              recompute()             (every criteria change)
//!                     filter → aggregate → view
//!                                   │
//!                                   ▼
//!                             DashboardView
//! ```

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::Serialize;

use crate::color::{chart_palette, Rgb};
use crate::config::ViewConfig;
use crate::data::aggregate::{self, ElevationSummary, SelectionSummary};
use crate::data::derive::derive;
use crate::data::filter::{self, FilterCriteria};
use crate::data::loader::load_file;
use crate::data::model::DerivedDataset;
use crate::error::{DataSourceError, SummaryError};
use crate::view::{self, ChartDatum, MapLayer, SeriesPoint};

// ---------------------------------------------------------------------------
// DatasetCache – memoized load + derive, keyed by source
// ---------------------------------------------------------------------------

/// Loaded datasets keyed by canonical source path. A source is read once
/// until [`reload`](DatasetCache::reload) or
/// [`invalidate`](DatasetCache::invalidate) is called for it.
#[derive(Debug, Default)]
pub struct DatasetCache {
    allowed_regions: Vec<String>,
    entries: HashMap<PathBuf, Arc<DerivedDataset>>,
}

impl DatasetCache {
    pub fn new(allowed_regions: Vec<String>) -> Self {
        Self {
            allowed_regions,
            entries: HashMap::new(),
        }
    }

    fn key(path: &Path) -> PathBuf {
        path.canonicalize().unwrap_or_else(|_| path.to_path_buf())
    }

    /// Cached dataset for `path`, loading it on first use.
    pub fn get_or_load(&mut self, path: &Path) -> Result<Arc<DerivedDataset>, DataSourceError> {
        if let Some(ds) = self.entries.get(&Self::key(path)) {
            log::debug!("cache hit for {}", path.display());
            return Ok(Arc::clone(ds));
        }
        self.reload(path)
    }

    /// Re-read `path` regardless of the cache and replace its entry.
    pub fn reload(&mut self, path: &Path) -> Result<Arc<DerivedDataset>, DataSourceError> {
        let key = Self::key(path);
        let loaded = load_file(path, &self.allowed_regions);
        let dataset = match loaded {
            Ok(ds) => Arc::new(derive(ds)),
            Err(e) => {
                self.entries.remove(&key);
                return Err(e);
            }
        };
        self.entries.insert(key, Arc::clone(&dataset));
        Ok(dataset)
    }

    /// Drop the entry for `path`; returns whether one existed.
    pub fn invalidate(&mut self, path: &Path) -> bool {
        self.entries.remove(&Self::key(path)).is_some()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn contains(&self, path: &Path) -> bool {
        self.entries.contains_key(&Self::key(path))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// ---------------------------------------------------------------------------
// DashboardView – everything a front end renders for one criteria value
// ---------------------------------------------------------------------------

/// Non-fatal message shown next to the views.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Notice {
    /// The filtered view is empty.
    NoMatches,
    /// A summary failed and its view is left blank.
    SummaryUnavailable(String),
}

impl std::fmt::Display for Notice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Notice::NoMatches => write!(f, "No data matches your selected filters."),
            Notice::SummaryUnavailable(reason) => {
                write!(f, "Error computing average elevation: {reason}")
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardView {
    /// Number of records passing the criteria.
    pub matched: usize,
    /// Scatter layer over the filtered records; `None` when nothing matched.
    pub map: Option<MapLayer>,
    /// Highest filtered airports, `{label: name, value: elevation}`.
    pub top_elevation: Vec<ChartDatum>,
    /// Airports per state over the whole dataset.
    pub state_share: Vec<ChartDatum>,
    /// One colour per `state_share` slice.
    pub state_colors: Vec<Rgb>,
    /// Mean elevation per state over the whole dataset; empty when the
    /// means could not be computed.
    pub state_mean_elevation: Vec<SeriesPoint>,
    /// Whole-dataset count and mean at the criteria's minimum elevation.
    pub elevation_summary: Option<ElevationSummary>,
    /// Mean elevation of the filtered records, labelled with the selected
    /// states.
    pub selection: Option<SelectionSummary>,
    pub notices: Vec<Notice>,
}

/// Run filter → aggregate → view for one criteria value. Pure; call it on
/// every criteria change.
pub fn recompute(
    dataset: &DerivedDataset,
    criteria: &FilterCriteria,
    config: &ViewConfig,
) -> DashboardView {
    let filtered = filter::apply(dataset, criteria);
    log::debug!(
        "recompute: {} of {} airports match",
        filtered.len(),
        dataset.len()
    );

    let mut notices = Vec::new();
    if filtered.is_empty() {
        notices.push(Notice::NoMatches);
    }

    let top = aggregate::top_by_elevation(&filtered, config.top_n);
    let counts = aggregate::count_by_state(&dataset.records);
    let means = caught(
        aggregate::grouped_mean_elevation(&dataset.records),
        "state mean elevation",
        &mut notices,
    )
    .unwrap_or_default();
    let elevation_summary = caught(
        aggregate::elevation_summary(&dataset.records, criteria.min_elevation_ft),
        "elevation summary",
        &mut notices,
    );
    let selection = caught(
        aggregate::selection_summary(&filtered),
        "selection summary",
        &mut notices,
    )
    .flatten()
    .map(|summary| SelectionSummary {
        states: criteria.states.iter().cloned().collect(),
        ..summary
    });

    let state_share = view::count_slices(&counts);
    DashboardView {
        matched: filtered.len(),
        map: view::map_layer(&filtered, config.map_zoom, config.point_radius),
        top_elevation: view::ranking_bars(&top),
        state_colors: chart_palette(state_share.len()),
        state_share,
        state_mean_elevation: view::line_series(&means),
        elevation_summary,
        selection,
        notices,
    }
}

/// Turn a failed summary into a notice; its view is left blank.
fn caught<T>(result: Result<T, SummaryError>, what: &str, notices: &mut Vec<Notice>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(e) => {
            log::warn!("{what} unavailable: {e}");
            notices.push(Notice::SummaryUnavailable(e.to_string()));
            None
        }
    }
}
