use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::RarebirdError;

/// One observation object exactly as the upstream API returned it.
pub type RawObservation = Map<String, Value>;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RegionCode(String);

impl RegionCode {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RegionCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for RegionCode {
    type Err = RarebirdError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_string();
        let is_valid = !normalized.is_empty()
            && !normalized.starts_with('-')
            && !normalized.ends_with('-')
            && normalized
                .chars()
                .all(|ch| ch.is_ascii_alphanumeric() || ch == '-');
        if !is_valid {
            return Err(RarebirdError::InvalidRegion(value.to_string()));
        }
        Ok(Self(normalized))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedSighting {
    pub species_code: String,
    pub com_name: String,
    pub sci_name: String,
    pub loc_name: String,
    pub lat: f64,
    pub lng: f64,
    pub obs_dt: String,
    pub how_many: i64,
    pub obs_valid: bool,
    pub obs_reviewed: bool,
    pub location_private: bool,
    pub sub_id: String,
    pub loc_id: String,
    pub checklist_link: String,
    pub species_link: String,
}

/// Species, location and observation day; two sightings sharing it are the same report.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DedupKey {
    pub species_code: String,
    pub loc_id: String,
    pub obs_day: String,
}
