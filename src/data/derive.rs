use std::collections::BTreeMap;

use super::model::{AirportRecord, Dataset, DerivedAirportRecord, DerivedDataset, FacilityType};
use crate::color::facility_color;

/// Attach state code, type label and map colour to every cleaned record.
/// Order-preserving; never fails.
pub fn derive(dataset: Dataset) -> DerivedDataset {
    let records: Vec<DerivedAirportRecord> = dataset.records.into_iter().map(derive_record).collect();
    DerivedDataset::from_records(records, dataset.has_scheduled_service)
}

pub fn derive_record(record: AirportRecord) -> DerivedAirportRecord {
    DerivedAirportRecord {
        state: state_code(&record.iso_region).to_string(),
        type_label: type_label(&record.facility_type),
        color: facility_color(&record.facility_type),
        record,
    }
}

/// Last two characters of a `COUNTRY-SUBDIVISION` region code: `US-MA` → `MA`.
pub fn state_code(iso_region: &str) -> &str {
    let start = iso_region
        .char_indices()
        .rev()
        .nth(1)
        .map_or(0, |(i, _)| i);
    &iso_region[start..]
}

/// `small_airport` → `Small Airport`.
pub fn type_label(facility_type: &FacilityType) -> String {
    title_case(&facility_type.as_str().replace('_', " "))
}

/// Upper-case every letter that follows a non-letter, lower-case the rest.
pub fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_is_letter = false;
    for c in s.chars() {
        if c.is_alphabetic() {
            if prev_is_letter {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            prev_is_letter = true;
        } else {
            out.push(c);
            prev_is_letter = false;
        }
    }
    out
}

/// Map display labels back to facility types, for front ends that list
/// labels but filter on raw types.
pub fn label_to_type(dataset: &DerivedDataset) -> BTreeMap<String, FacilityType> {
    dataset
        .facility_types
        .iter()
        .map(|t| (type_label(t), t.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Rgb;

    fn record(region: &str, kind: &str) -> AirportRecord {
        AirportRecord {
            name: "Test Field".into(),
            latitude: 42.0,
            longitude: -71.0,
            iso_region: region.into(),
            facility_type: FacilityType::parse(kind),
            elevation_ft: 100.0,
            municipality: None,
            scheduled_service: None,
        }
    }

    #[test]
    fn state_code_is_text_after_dash() {
        for region in ["US-MA", "US-CT", "US-RI", "US-NH", "US-VT", "US-ME"] {
            let code = state_code(region);
            assert_eq!(code.len(), 2);
            assert_eq!(Some(code), region.rsplit('-').next());
        }
        assert_eq!(state_code("X"), "X");
    }

    #[test]
    fn labels_are_title_cased() {
        assert_eq!(type_label(&FacilityType::SmallAirport), "Small Airport");
        assert_eq!(type_label(&FacilityType::SeaplaneBase), "Seaplane Base");
        assert_eq!(type_label(&FacilityType::Other("BALLOON_port".into())), "Balloon Port");
        assert_eq!(title_case("o'hare field"), "O'Hare Field");
    }

    #[test]
    fn derive_preserves_order_and_colors() {
        let ds = Dataset {
            records: vec![record("US-VT", "heliport"), record("US-MA", "balloonport")],
            has_scheduled_service: false,
        };
        let derived = derive(ds);

        assert_eq!(derived.records[0].state, "VT");
        assert_eq!(derived.records[0].color, Rgb::PURPLE);
        assert_eq!(derived.records[1].state, "MA");
        assert_eq!(derived.records[1].color, Rgb::FALLBACK);
        assert_eq!(derived.states.iter().collect::<Vec<_>>(), ["MA", "VT"]);
        assert_eq!(derived.elevation_range, Some((100.0, 100.0)));
    }

    #[test]
    fn labels_map_back_to_types() {
        let ds = derive(Dataset {
            records: vec![record("US-MA", "small_airport"), record("US-MA", "closed")],
            has_scheduled_service: true,
        });
        let lookup = label_to_type(&ds);
        assert_eq!(lookup.get("Small Airport"), Some(&FacilityType::SmallAirport));
        assert_eq!(lookup.get("Closed"), Some(&FacilityType::Closed));
    }
}
