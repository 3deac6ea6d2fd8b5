use std::fs;
use std::io::Write;

use camino::{Utf8Path, Utf8PathBuf};
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use tempfile::Builder;

use crate::domain::{NormalizedSighting, RegionCode};
use crate::error::RarebirdError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub last_updated: String,
    pub region: String,
    pub total_sightings: usize,
    pub days_back: u32,
    pub sightings: Vec<NormalizedSighting>,
}

impl Snapshot {
    pub fn new(
        sightings: Vec<NormalizedSighting>,
        region: &RegionCode,
        days_back: u32,
        generated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            last_updated: format_timestamp(generated_at),
            region: region.as_str().to_string(),
            total_sightings: sightings.len(),
            days_back,
            sightings,
        }
    }
}

/// ISO-8601 in UTC with microseconds and a trailing `Z`.
pub fn format_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Micros, true)
}

#[derive(Debug, Clone)]
pub struct SnapshotStore {
    path: Utf8PathBuf,
}

impl SnapshotStore {
    pub fn new(path: Utf8PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Utf8Path {
        &self.path
    }

    /// Replaces whatever is at the store path with `snapshot`.
    pub fn write(&self, snapshot: &Snapshot) -> Result<(), RarebirdError> {
        let parent = match self.path.parent() {
            Some(parent) if !parent.as_str().is_empty() => parent.to_path_buf(),
            _ => Utf8PathBuf::from("."),
        };
        fs::create_dir_all(parent.as_std_path())
            .map_err(|err| RarebirdError::Filesystem(format!("create {parent}: {err}")))?;

        let content = serde_json::to_vec_pretty(snapshot)
            .map_err(|err| RarebirdError::Filesystem(err.to_string()))?;
        let mut temp = Builder::new()
            .prefix("rarebird-snapshot")
            .tempfile_in(parent.as_std_path())
            .map_err(|err| RarebirdError::Filesystem(err.to_string()))?;
        temp.write_all(&content)
            .map_err(|err| RarebirdError::Filesystem(err.to_string()))?;
        temp.persist(self.path.as_std_path())
            .map_err(|err| RarebirdError::Filesystem(format!("write {}: {err}", self.path)))?;

        tracing::info!(path = %self.path, count = snapshot.total_sightings, "snapshot written");
        Ok(())
    }

    pub fn load(&self) -> Result<Snapshot, RarebirdError> {
        let content = fs::read_to_string(self.path.as_std_path())
            .map_err(|err| RarebirdError::Filesystem(format!("read {}: {err}", self.path)))?;
        serde_json::from_str(&content).map_err(|err| RarebirdError::Filesystem(err.to_string()))
    }
}
