use std::collections::BTreeSet;

use serde::Serialize;

use super::model::{DerivedAirportRecord, DerivedDataset, FacilityType};

// ---------------------------------------------------------------------------
// Filter criteria: the user's current selection
// ---------------------------------------------------------------------------

/// Scheduled-service selection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
pub enum ServiceMode {
    #[default]
    All,
    Scheduled,
    NonScheduled,
}

impl ServiceMode {
    pub const ALL: [ServiceMode; 3] = [ServiceMode::All, ServiceMode::Scheduled, ServiceMode::NonScheduled];

    pub fn label(self) -> &'static str {
        match self {
            ServiceMode::All => "All",
            ServiceMode::Scheduled => "Scheduled",
            ServiceMode::NonScheduled => "Non-Scheduled",
        }
    }

    /// The `scheduled_service` value a record must carry, if any.
    fn required_flag(self) -> Option<&'static str> {
        match self {
            ServiceMode::All => None,
            ServiceMode::Scheduled => Some("yes"),
            ServiceMode::NonScheduled => Some("no"),
        }
    }
}

/// Every predicate the user can set. An empty state or type selection
/// matches nothing; it never means "select all".
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FilterCriteria {
    pub states: BTreeSet<String>,
    pub facility_types: BTreeSet<FacilityType>,
    pub service: ServiceMode,
    /// Inclusive lower bound, in feet.
    pub min_elevation_ft: f64,
}

impl FilterCriteria {
    /// Criteria that keep every record of `dataset` (the initial selection).
    pub fn select_all(dataset: &DerivedDataset) -> Self {
        FilterCriteria {
            states: dataset.states.clone(),
            facility_types: dataset.facility_types.clone(),
            service: ServiceMode::All,
            min_elevation_ft: dataset.elevation_range.map_or(0.0, |(lo, _)| lo),
        }
    }

    /// AND of all predicates. The service predicate only applies when the
    /// source had a `scheduled_service` column.
    pub fn matches(&self, rec: &DerivedAirportRecord, has_scheduled_service: bool) -> bool {
        if !self.states.contains(&rec.state) {
            return false;
        }
        if !self.facility_types.contains(&rec.record.facility_type) {
            return false;
        }
        if has_scheduled_service {
            if let Some(flag) = self.service.required_flag() {
                if rec.record.scheduled_service.as_deref() != Some(flag) {
                    return false;
                }
            }
        }
        rec.record.elevation_ft >= self.min_elevation_ft
    }

    /// Toggle a single state code.
    pub fn toggle_state(&mut self, state: &str) {
        if !self.states.remove(state) {
            self.states.insert(state.to_string());
        }
    }

    /// Toggle a single facility type.
    pub fn toggle_type(&mut self, facility_type: &FacilityType) {
        if !self.facility_types.remove(facility_type) {
            self.facility_types.insert(facility_type.clone());
        }
    }
}

// ---------------------------------------------------------------------------
// FilteredView – records passing the criteria, in dataset order
// ---------------------------------------------------------------------------

/// Borrowed subset of a [`DerivedDataset`]. Recomputed on every criteria
/// change; the dataset itself is never touched.
#[derive(Debug, Clone, Default)]
pub struct FilteredView<'a> {
    records: Vec<&'a DerivedAirportRecord>,
}

impl<'a> FilteredView<'a> {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[&'a DerivedAirportRecord] {
        &self.records
    }

    pub fn iter(&self) -> std::iter::Copied<std::slice::Iter<'_, &'a DerivedAirportRecord>> {
        self.records.iter().copied()
    }
}

impl<'v, 'a> IntoIterator for &'v FilteredView<'a> {
    type Item = &'a DerivedAirportRecord;
    type IntoIter = std::iter::Copied<std::slice::Iter<'v, &'a DerivedAirportRecord>>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Return the records of `dataset` that pass every predicate of `criteria`.
pub fn apply<'a>(dataset: &'a DerivedDataset, criteria: &FilterCriteria) -> FilteredView<'a> {
    let records = dataset
        .records
        .iter()
        .filter(|rec| criteria.matches(rec, dataset.has_scheduled_service))
        .collect();
    FilteredView { records }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::derive::derive;
    use crate::data::model::{AirportRecord, Dataset};

    fn airport(name: &str, region: &str, kind: &str, elev: f64, service: Option<&str>) -> AirportRecord {
        AirportRecord {
            name: name.into(),
            latitude: 42.0,
            longitude: -71.0,
            iso_region: region.into(),
            facility_type: FacilityType::parse(kind),
            elevation_ft: elev,
            municipality: None,
            scheduled_service: service.map(str::to_string),
        }
    }

    fn sample(has_scheduled_service: bool) -> DerivedDataset {
        derive(Dataset {
            records: vec![
                airport("A", "US-MA", "small_airport", 120.0, Some("no")),
                airport("B", "US-CT", "large_airport", 173.0, Some("yes")),
                airport("C", "US-MA", "heliport", -5.0, Some("no")),
                airport("D", "US-CT", "small_airport", 400.0, None),
                airport("E", "US-MA", "large_airport", 20.0, Some("yes")),
            ],
            has_scheduled_service,
        })
    }

    fn names(view: &FilteredView<'_>) -> Vec<String> {
        view.iter().map(|r| r.record.name.clone()).collect()
    }

    #[test]
    fn identity_criteria_keep_everything_in_order() {
        let ds = sample(true);
        let view = apply(&ds, &FilterCriteria::select_all(&ds));
        assert_eq!(names(&view), ["A", "B", "C", "D", "E"]);
    }

    #[test]
    fn empty_selection_yields_empty_view() {
        let ds = sample(true);
        let mut criteria = FilterCriteria::select_all(&ds);
        criteria.states.clear();
        assert!(apply(&ds, &criteria).is_empty());

        let mut criteria = FilterCriteria::select_all(&ds);
        criteria.facility_types.clear();
        assert!(apply(&ds, &criteria).is_empty());
    }

    #[test]
    fn service_mode_filters_on_flag() {
        let ds = sample(true);
        let mut criteria = FilterCriteria::select_all(&ds);

        criteria.service = ServiceMode::Scheduled;
        assert_eq!(names(&apply(&ds, &criteria)), ["B", "E"]);

        criteria.service = ServiceMode::NonScheduled;
        assert_eq!(names(&apply(&ds, &criteria)), ["A", "C"]);
    }

    #[test]
    fn service_mode_ignored_without_column() {
        let ds = sample(false);
        let mut criteria = FilterCriteria::select_all(&ds);
        criteria.service = ServiceMode::Scheduled;
        assert_eq!(apply(&ds, &criteria).len(), 5);
    }

    #[test]
    fn min_elevation_is_inclusive() {
        let ds = sample(true);
        let mut criteria = FilterCriteria::select_all(&ds);

        criteria.min_elevation_ft = 120.0;
        assert_eq!(names(&apply(&ds, &criteria)), ["A", "B", "D"]);

        criteria.min_elevation_ft = -1000.0;
        assert_eq!(apply(&ds, &criteria).len(), 5);

        criteria.min_elevation_ft = 401.0;
        assert!(apply(&ds, &criteria).is_empty());
    }

    #[test]
    fn combined_predicates() {
        let ds = sample(true);
        let mut criteria = FilterCriteria::select_all(&ds);
        criteria.toggle_state("CT");
        criteria.toggle_type(&FacilityType::Heliport);
        criteria.min_elevation_ft = 0.0;

        let view = apply(&ds, &criteria);
        assert_eq!(names(&view), ["A", "E"]);
        assert!(view
            .iter()
            .all(|r| criteria.matches(r, ds.has_scheduled_service)));
    }
}
