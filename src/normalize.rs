use serde_json::Value;

use crate::domain::{NormalizedSighting, RawObservation};

const CHECKLIST_BASE: &str = "https://ebird.org/checklist/";
const SPECIES_BASE: &str = "https://ebird.org/species/";

pub fn normalize(raw: &RawObservation) -> NormalizedSighting {
    let species_code = string_field(raw, "speciesCode", "");
    let sub_id = string_field(raw, "subId", "");

    NormalizedSighting {
        checklist_link: checklist_link(&sub_id),
        species_link: species_link(&species_code),
        com_name: string_field(raw, "comName", "Unknown"),
        sci_name: string_field(raw, "sciName", ""),
        loc_name: string_field(raw, "locName", "Unknown Location"),
        lat: number_field(raw, "lat", 0.0),
        lng: number_field(raw, "lng", 0.0),
        obs_dt: string_field(raw, "obsDt", ""),
        how_many: integer_field(raw, "howMany", 1),
        obs_valid: bool_field(raw, "obsValid", true),
        obs_reviewed: bool_field(raw, "obsReviewed", false),
        location_private: bool_field(raw, "locationPrivate", false),
        loc_id: string_field(raw, "locId", ""),
        species_code,
        sub_id,
    }
}

pub fn normalize_all(raw: &[RawObservation]) -> Vec<NormalizedSighting> {
    raw.iter().map(normalize).collect()
}

pub fn checklist_link(sub_id: &str) -> String {
    if sub_id.is_empty() {
        String::new()
    } else {
        format!("{CHECKLIST_BASE}{sub_id}")
    }
}

pub fn species_link(species_code: &str) -> String {
    if species_code.is_empty() {
        String::new()
    } else {
        format!("{SPECIES_BASE}{species_code}")
    }
}

fn string_field(raw: &RawObservation, key: &str, default: &str) -> String {
    raw.get(key)
        .and_then(|v| v.as_str())
        .unwrap_or(default)
        .to_string()
}

fn number_field(raw: &RawObservation, key: &str, default: f64) -> f64 {
    raw.get(key).and_then(|v| v.as_f64()).unwrap_or(default)
}

// Integral floats such as `2.0` are accepted; fractional counts are not.
fn integer_field(raw: &RawObservation, key: &str, default: i64) -> i64 {
    match raw.get(key) {
        Some(Value::Number(number)) => number
            .as_i64()
            .or_else(|| {
                number
                    .as_f64()
                    .filter(|f| f.fract() == 0.0 && f.abs() < i64::MAX as f64)
                    .map(|f| f as i64)
            })
            .unwrap_or(default),
        _ => default,
    }
}

fn bool_field(raw: &RawObservation, key: &str, default: bool) -> bool {
    raw.get(key).and_then(|v| v.as_bool()).unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn raw(value: Value) -> RawObservation {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn null_fields_take_defaults() {
        let sighting = normalize(&raw(json!({ "comName": null, "howMany": null, "lat": null })));
        assert_eq!(sighting.com_name, "Unknown");
        assert_eq!(sighting.how_many, 1);
        assert_eq!(sighting.lat, 0.0);
    }

    #[test]
    fn fractional_count_is_rejected() {
        assert_eq!(normalize(&raw(json!({ "howMany": 2.0 }))).how_many, 2);
        assert_eq!(normalize(&raw(json!({ "howMany": 2.5 }))).how_many, 1);
    }
}
