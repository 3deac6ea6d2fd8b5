use std::collections::HashSet;

use crate::domain::{DedupKey, NormalizedSighting};

const OBS_DAY_LEN: usize = 10;

pub fn dedup_key(sighting: &NormalizedSighting) -> DedupKey {
    DedupKey {
        species_code: sighting.species_code.clone(),
        loc_id: sighting.loc_id.clone(),
        obs_day: sighting.obs_dt.chars().take(OBS_DAY_LEN).collect(),
    }
}

/// Keeps the first sighting for every key, in input order.
pub fn deduplicate(sightings: Vec<NormalizedSighting>) -> Vec<NormalizedSighting> {
    let mut seen = HashSet::with_capacity(sightings.len());
    sightings
        .into_iter()
        .filter(|sighting| seen.insert(dedup_key(sighting)))
        .collect()
}
