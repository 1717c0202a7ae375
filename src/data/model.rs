use std::collections::BTreeSet;
use std::fmt;

use serde::Serialize;

use crate::color::Rgb;

// ---------------------------------------------------------------------------
// FacilityType – categorical airport classification
// ---------------------------------------------------------------------------

/// Facility classification as found in the `type` column.
///
/// Unknown classifications are kept verbatim in [`FacilityType::Other`] so
/// parsing never fails.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FacilityType {
    SmallAirport,
    MediumAirport,
    LargeAirport,
    Heliport,
    SeaplaneBase,
    Closed,
    Other(String),
}

impl FacilityType {
    /// The six classifications with a dedicated map colour.
    pub const KNOWN: [FacilityType; 6] = [
        FacilityType::SmallAirport,
        FacilityType::MediumAirport,
        FacilityType::LargeAirport,
        FacilityType::Heliport,
        FacilityType::SeaplaneBase,
        FacilityType::Closed,
    ];

    pub fn parse(raw: &str) -> Self {
        match raw {
            "small_airport" => FacilityType::SmallAirport,
            "medium_airport" => FacilityType::MediumAirport,
            "large_airport" => FacilityType::LargeAirport,
            "heliport" => FacilityType::Heliport,
            "seaplane_base" => FacilityType::SeaplaneBase,
            "closed" => FacilityType::Closed,
            other => FacilityType::Other(other.to_string()),
        }
    }

    /// The raw string as it appears in the data source.
    pub fn as_str(&self) -> &str {
        match self {
            FacilityType::SmallAirport => "small_airport",
            FacilityType::MediumAirport => "medium_airport",
            FacilityType::LargeAirport => "large_airport",
            FacilityType::Heliport => "heliport",
            FacilityType::SeaplaneBase => "seaplane_base",
            FacilityType::Closed => "closed",
            FacilityType::Other(raw) => raw,
        }
    }
}

// Ordered by raw string so sorted sets list types alphabetically.

impl PartialOrd for FacilityType {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for FacilityType {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.as_str().cmp(other.as_str())
    }
}

impl fmt::Display for FacilityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for FacilityType {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// AirportRecord – one cleaned row of the source table
// ---------------------------------------------------------------------------

/// A single airport that survived cleaning.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AirportRecord {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    /// `COUNTRY-SUBDIVISION`, e.g. `US-MA`.
    pub iso_region: String,
    pub facility_type: FacilityType,
    pub elevation_ft: f64,
    pub municipality: Option<String>,
    /// Raw `scheduled_service` value (`yes` / `no`), if present.
    pub scheduled_service: Option<String>,
}

/// Output of the loader: cleaned records in source order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    pub records: Vec<AirportRecord>,
    /// Whether the source carried a `scheduled_service` column at all.
    pub has_scheduled_service: bool,
}

impl Dataset {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

// ---------------------------------------------------------------------------
// DerivedAirportRecord / DerivedDataset
// ---------------------------------------------------------------------------

/// An [`AirportRecord`] plus the display attributes computed once at load.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DerivedAirportRecord {
    #[serde(flatten)]
    pub record: AirportRecord,
    /// Two-letter state code, e.g. `MA`.
    pub state: String,
    /// Human-readable type, e.g. `Small Airport`.
    pub type_label: String,
    pub color: Rgb,
}

/// The derived dataset with pre-computed selection domains.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DerivedDataset {
    pub records: Vec<DerivedAirportRecord>,
    pub has_scheduled_service: bool,
    /// Distinct state codes, sorted.
    pub states: BTreeSet<String>,
    /// Distinct facility types, sorted by raw string.
    pub facility_types: BTreeSet<FacilityType>,
    /// `(min, max)` elevation in feet; `None` for an empty dataset.
    pub elevation_range: Option<(f64, f64)>,
}

impl DerivedDataset {
    /// Build selection domains from already derived records.
    pub fn from_records(records: Vec<DerivedAirportRecord>, has_scheduled_service: bool) -> Self {
        let mut states = BTreeSet::new();
        let mut facility_types = BTreeSet::new();
        let mut elevation_range: Option<(f64, f64)> = None;

        for rec in &records {
            states.insert(rec.state.clone());
            facility_types.insert(rec.record.facility_type.clone());
            let elev = rec.record.elevation_ft;
            elevation_range = Some(match elevation_range {
                Some((lo, hi)) => (lo.min(elev), hi.max(elev)),
                None => (elev, elev),
            });
        }

        DerivedDataset {
            records,
            has_scheduled_service,
            states,
            facility_types,
            elevation_range,
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_keeps_unknown_types() {
        assert_eq!(FacilityType::parse("heliport"), FacilityType::Heliport);
        let balloon = FacilityType::parse("balloonport");
        assert_eq!(balloon, FacilityType::Other("balloonport".into()));
        assert_eq!(balloon.as_str(), "balloonport");
    }

    #[test]
    fn types_sort_by_raw_string() {
        let set: BTreeSet<FacilityType> = [
            FacilityType::SmallAirport,
            FacilityType::Closed,
            FacilityType::Other("balloonport".into()),
            FacilityType::Heliport,
        ]
        .into_iter()
        .collect();
        let order: Vec<&str> = set.iter().map(FacilityType::as_str).collect();
        assert_eq!(order, ["balloonport", "closed", "heliport", "small_airport"]);
    }
}
