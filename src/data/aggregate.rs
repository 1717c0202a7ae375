//! Summary statistics over record collections.
//!
//! Every function accepts either the full derived record slice or a
//! [`FilteredView`](super::filter::FilteredView). None of them fail on
//! empty input; the means fail only when they overflow.

use std::collections::BTreeMap;

use serde::Serialize;

use super::model::DerivedAirportRecord;
use crate::error::SummaryError;

/// One entry of an elevation ranking.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedAirport {
    pub name: String,
    pub elevation_ft: f64,
}

/// Result of [`elevation_summary`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ElevationSummary {
    pub min_elevation_ft: f64,
    pub count: usize,
    /// `0.0` when `count` is zero.
    pub mean_elevation_ft: f64,
}

/// Mean elevation of the current selection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SelectionSummary {
    pub states: Vec<String>,
    pub count: usize,
    pub mean_elevation_ft: f64,
}

/// The `n` highest airports, descending. Ties keep input order.
pub fn top_by_elevation<'a, I>(records: I, n: usize) -> Vec<RankedAirport>
where
    I: IntoIterator<Item = &'a DerivedAirportRecord>,
{
    let mut ranked: Vec<&DerivedAirportRecord> = records.into_iter().collect();
    // sort_by is stable
    ranked.sort_by(|a, b| b.record.elevation_ft.total_cmp(&a.record.elevation_ft));
    ranked
        .into_iter()
        .take(n)
        .map(|rec| RankedAirport {
            name: rec.record.name.clone(),
            elevation_ft: rec.record.elevation_ft,
        })
        .collect()
}

/// Mean elevation per state code, keys ascending. States without records
/// have no entry. Fails if any state's mean is not finite.
pub fn grouped_mean_elevation<'a, I>(records: I) -> Result<BTreeMap<String, f64>, SummaryError>
where
    I: IntoIterator<Item = &'a DerivedAirportRecord>,
{
    let mut sums: BTreeMap<String, (f64, usize)> = BTreeMap::new();
    for rec in records {
        let entry = sums.entry(rec.state.clone()).or_insert((0.0, 0));
        entry.0 += rec.record.elevation_ft;
        entry.1 += 1;
    }
    sums.into_iter()
        .map(|(state, (sum, count))| {
            let mean = sum / count as f64;
            if mean.is_finite() {
                Ok((state, mean))
            } else {
                Err(SummaryError::NonFiniteStateMean { state, count })
            }
        })
        .collect()
}

/// Record count per state code, keys ascending.
pub fn count_by_state<'a, I>(records: I) -> BTreeMap<String, usize>
where
    I: IntoIterator<Item = &'a DerivedAirportRecord>,
{
    let mut counts: BTreeMap<String, usize> = BTreeMap::new();
    for rec in records {
        *counts.entry(rec.state.clone()).or_default() += 1;
    }
    counts
}

/// Count and mean elevation of the records at or above `min_elevation_ft`.
/// An empty match gives `(0, 0.0)`; a non-empty match whose mean is not
/// finite is an error.
pub fn elevation_summary<'a, I>(
    records: I,
    min_elevation_ft: f64,
) -> Result<ElevationSummary, SummaryError>
where
    I: IntoIterator<Item = &'a DerivedAirportRecord>,
{
    let (sum, count) = records
        .into_iter()
        .map(|rec| rec.record.elevation_ft)
        .filter(|elev| *elev >= min_elevation_ft)
        .fold((0.0, 0usize), |(sum, count), elev| (sum + elev, count + 1));

    let mean_elevation_ft = if count > 0 { sum / count as f64 } else { 0.0 };
    if !mean_elevation_ft.is_finite() {
        return Err(SummaryError::NonFiniteMean { count });
    }
    Ok(ElevationSummary {
        min_elevation_ft,
        count,
        mean_elevation_ft,
    })
}

/// Mean elevation over a selection, labelled with its distinct states.
///
/// `Ok(None)` for an empty selection; an error only when the mean cannot be
/// represented.
pub fn selection_summary<'a, I>(records: I) -> Result<Option<SelectionSummary>, SummaryError>
where
    I: IntoIterator<Item = &'a DerivedAirportRecord>,
{
    let mut states: Vec<String> = Vec::new();
    let mut sum = 0.0;
    let mut count = 0usize;
    for rec in records {
        if !states.contains(&rec.state) {
            states.push(rec.state.clone());
        }
        sum += rec.record.elevation_ft;
        count += 1;
    }

    if count == 0 {
        return Ok(None);
    }
    let mean = sum / count as f64;
    if !mean.is_finite() {
        return Err(SummaryError::NonFiniteMean { count });
    }
    states.sort();
    Ok(Some(SelectionSummary {
        states,
        count,
        mean_elevation_ft: mean,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::derive::derive_record;
    use crate::data::model::{AirportRecord, FacilityType};

    fn airport(name: &str, region: &str, elev: f64) -> DerivedAirportRecord {
        derive_record(AirportRecord {
            name: name.into(),
            latitude: 42.0,
            longitude: -71.0,
            iso_region: region.into(),
            facility_type: FacilityType::SmallAirport,
            elevation_ft: elev,
            municipality: None,
            scheduled_service: None,
        })
    }

    fn three() -> Vec<DerivedAirportRecord> {
        vec![
            airport("MA high", "US-MA", 500.0),
            airport("MA low", "US-MA", 100.0),
            airport("CT", "US-CT", 300.0),
        ]
    }

    #[test]
    fn top_by_elevation_ranks_descending() {
        let top = top_by_elevation(&three(), 2);
        assert_eq!(
            top,
            vec![
                RankedAirport { name: "MA high".into(), elevation_ft: 500.0 },
                RankedAirport { name: "CT".into(), elevation_ft: 300.0 },
            ]
        );
        assert_eq!(top_by_elevation(&three(), 10).len(), 3);
        assert!(top_by_elevation(&Vec::<DerivedAirportRecord>::new(), 10).is_empty());
    }

    #[test]
    fn top_by_elevation_ties_keep_input_order() {
        let records = vec![
            airport("first", "US-ME", 50.0),
            airport("peak", "US-NH", 900.0),
            airport("second", "US-ME", 50.0),
            airport("third", "US-VT", 50.0),
        ];
        let names: Vec<String> = top_by_elevation(&records, 10).into_iter().map(|r| r.name).collect();
        assert_eq!(names, ["peak", "first", "second", "third"]);
    }

    #[test]
    fn grouped_statistics_share_keys() {
        let records = three();
        let means = grouped_mean_elevation(&records).unwrap();
        let counts = count_by_state(&records);

        assert_eq!(means, BTreeMap::from([("CT".to_string(), 300.0), ("MA".to_string(), 300.0)]));
        assert_eq!(counts, BTreeMap::from([("CT".to_string(), 1), ("MA".to_string(), 2)]));
        assert!(means.keys().eq(counts.keys()));
        assert_eq!(grouped_mean_elevation(&Vec::<DerivedAirportRecord>::new()), Ok(BTreeMap::new()));
    }

    #[test]
    fn elevation_summary_thresholds() {
        let records = three();
        let s = elevation_summary(&records, 200.0).unwrap();
        assert_eq!(s.count, 2);
        assert_eq!(s.mean_elevation_ft, 400.0);

        let none = elevation_summary(&records, 10_000.0).unwrap();
        assert_eq!((none.count, none.mean_elevation_ft), (0, 0.0));

        for threshold in [f64::NEG_INFINITY, -50.0, 0.0, 1e9] {
            let empty = elevation_summary(&Vec::<DerivedAirportRecord>::new(), threshold).unwrap();
            assert_eq!((empty.count, empty.mean_elevation_ft), (0, 0.0));
        }
    }

    #[test]
    fn selection_summary_lists_states() {
        let summary = selection_summary(&three()).unwrap().unwrap();
        assert_eq!(summary.states, ["CT", "MA"]);
        assert_eq!(summary.count, 3);
        assert_eq!(summary.mean_elevation_ft, 300.0);

        assert_eq!(selection_summary(&Vec::<DerivedAirportRecord>::new()), Ok(None));
    }

    #[test]
    fn selection_summary_reports_overflow() {
        let records = vec![airport("a", "US-MA", f64::MAX), airport("b", "US-MA", f64::MAX)];
        assert_eq!(
            selection_summary(&records),
            Err(SummaryError::NonFiniteMean { count: 2 })
        );
    }

    #[test]
    fn every_mean_reports_overflow() {
        let records = vec![
            airport("a", "US-MA", f64::MAX),
            airport("b", "US-MA", f64::MAX),
            airport("c", "US-CT", 10.0),
        ];
        assert_eq!(
            elevation_summary(&records, 100.0),
            Err(SummaryError::NonFiniteMean { count: 2 })
        );
        assert_eq!(
            grouped_mean_elevation(&records),
            Err(SummaryError::NonFiniteStateMean { state: "MA".into(), count: 2 })
        );

        // records below the threshold are not part of the mean
        let low = elevation_summary(&records, f64::INFINITY).unwrap();
        assert_eq!((low.count, low.mean_elevation_ft), (0, 0.0));
    }
}
