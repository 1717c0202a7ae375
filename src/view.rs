//! Renderer-facing shapes.
//!
//! Pure reshaping of filter and aggregator output into what a map layer and
//! chart layer consume. Nothing here computes new statistics.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::color::{facility_color, facility_color_name, Rgb};
use crate::data::aggregate::RankedAirport;
use crate::data::model::{DerivedAirportRecord, FacilityType};

// ---------------------------------------------------------------------------
// Map layer
// ---------------------------------------------------------------------------

/// Hover text fields of a map point.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Tooltip {
    pub name: String,
    pub type_label: String,
    pub elevation_ft: f64,
    pub municipality: Option<String>,
}

impl Tooltip {
    pub fn text(&self) -> String {
        format!(
            "{}\nType: {}\nElevation: {} ft\nLocation: {}",
            self.name,
            self.type_label,
            self.elevation_ft,
            self.municipality.as_deref().unwrap_or("")
        )
    }
}

/// One scatter point of the map layer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapPoint {
    /// `[longitude, latitude]`
    pub position: [f64; 2],
    pub color: Rgb,
    /// Metres.
    pub radius: f64,
    pub tooltip: Tooltip,
}

/// Initial camera of the map.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MapViewState {
    pub latitude: f64,
    pub longitude: f64,
    pub zoom: f32,
    pub pitch: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapLayer {
    pub points: Vec<MapPoint>,
    pub view_state: MapViewState,
}

pub fn map_point(rec: &DerivedAirportRecord, radius: f64) -> MapPoint {
    MapPoint {
        position: [rec.record.longitude, rec.record.latitude],
        color: rec.color,
        radius,
        tooltip: Tooltip {
            name: rec.record.name.clone(),
            type_label: rec.type_label.clone(),
            elevation_ft: rec.record.elevation_ft,
            municipality: rec.record.municipality.clone(),
        },
    }
}

/// Scatter layer centred on the mean position; `None` for no records.
pub fn map_layer<'a, I>(records: I, zoom: f32, radius: f64) -> Option<MapLayer>
where
    I: IntoIterator<Item = &'a DerivedAirportRecord>,
{
    let points: Vec<MapPoint> = records.into_iter().map(|rec| map_point(rec, radius)).collect();
    if points.is_empty() {
        return None;
    }
    let n = points.len() as f64;
    let longitude = points.iter().map(|p| p.position[0]).sum::<f64>() / n;
    let latitude = points.iter().map(|p| p.position[1]).sum::<f64>() / n;

    Some(MapLayer {
        points,
        view_state: MapViewState {
            latitude,
            longitude,
            zoom,
            pitch: 0.0,
        },
    })
}

// ---------------------------------------------------------------------------
// Chart layer
// ---------------------------------------------------------------------------

/// A bar or pie entry.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartDatum {
    pub label: String,
    pub value: f64,
}

/// A point of a categorical line series.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeriesPoint {
    pub x: String,
    pub y: f64,
}

pub fn ranking_bars(ranking: &[RankedAirport]) -> Vec<ChartDatum> {
    ranking
        .iter()
        .map(|r| ChartDatum {
            label: r.name.clone(),
            value: r.elevation_ft,
        })
        .collect()
}

pub fn count_slices(counts: &BTreeMap<String, usize>) -> Vec<ChartDatum> {
    counts
        .iter()
        .map(|(label, count)| ChartDatum {
            label: label.clone(),
            value: *count as f64,
        })
        .collect()
}

pub fn line_series(values: &BTreeMap<String, f64>) -> Vec<SeriesPoint> {
    values
        .iter()
        .map(|(x, y)| SeriesPoint { x: x.clone(), y: *y })
        .collect()
}

// ---------------------------------------------------------------------------
// Legend
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LegendEntry {
    pub color_name: &'static str,
    pub label: String,
    pub color: Rgb,
}

/// Legend rows for the six facility types with a dedicated colour.
pub fn legend() -> Vec<LegendEntry> {
    FacilityType::KNOWN
        .iter()
        .map(|t| LegendEntry {
            color_name: facility_color_name(t),
            label: crate::data::derive::type_label(t),
            color: facility_color(t),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::derive::derive_record;
    use crate::data::model::AirportRecord;

    fn logan() -> DerivedAirportRecord {
        derive_record(AirportRecord {
            name: "General Edward Lawrence Logan International Airport".into(),
            latitude: 42.36,
            longitude: -71.0,
            iso_region: "US-MA".into(),
            facility_type: FacilityType::LargeAirport,
            elevation_ft: 20.0,
            municipality: Some("Boston".into()),
            scheduled_service: Some("yes".into()),
        })
    }

    #[test]
    fn map_point_uses_lon_lat_order() {
        let point = map_point(&logan(), 800.0);
        assert_eq!(point.position, [-71.0, 42.36]);
        assert_eq!(point.color, Rgb::GREEN);
        assert_eq!(
            point.tooltip.text(),
            "General Edward Lawrence Logan International Airport\n\
             Type: Large Airport\nElevation: 20 ft\nLocation: Boston"
        );
    }

    #[test]
    fn map_layer_centres_on_mean_position() {
        let mut other = logan();
        other.record.latitude = 44.36;
        other.record.longitude = -73.0;
        let records = vec![logan(), other];

        let layer = map_layer(&records, 6.0, 800.0).unwrap();
        assert_eq!(layer.points.len(), 2);
        assert!((layer.view_state.latitude - 43.36).abs() < 1e-9);
        assert!((layer.view_state.longitude + 72.0).abs() < 1e-9);

        assert!(map_layer(&Vec::<DerivedAirportRecord>::new(), 6.0, 800.0).is_none());
    }

    #[test]
    fn renderer_field_names() {
        let json = serde_json::to_value(map_point(&logan(), 800.0)).unwrap();
        assert_eq!(json["position"], serde_json::json!([-71.0, 42.36]));
        assert_eq!(json["color"], serde_json::json!([0, 255, 0]));
        assert_eq!(json["tooltip"]["type_label"], "Large Airport");

        let counts = BTreeMap::from([("CT".to_string(), 1), ("MA".to_string(), 2)]);
        let json = serde_json::to_value(count_slices(&counts)).unwrap();
        assert_eq!(json, serde_json::json!([{"label": "CT", "value": 1.0}, {"label": "MA", "value": 2.0}]));

        let means = BTreeMap::from([("CT".to_string(), 300.0)]);
        let json = serde_json::to_value(line_series(&means)).unwrap();
        assert_eq!(json, serde_json::json!([{"x": "CT", "y": 300.0}]));
    }

    #[test]
    fn legend_covers_known_types() {
        let legend = legend();
        assert_eq!(legend.len(), 6);
        assert_eq!(legend[0].color_name, "Red");
        assert_eq!(legend[0].label, "Small Airport");
        assert_eq!(legend[5].label, "Closed");
    }
}
