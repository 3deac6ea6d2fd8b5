use std::collections::BTreeSet;
use std::time::{Duration, Instant};

use chrono::Utc;
use serde::Serialize;

use crate::config::Settings;
use crate::dedup::deduplicate;
use crate::domain::NormalizedSighting;
use crate::ebird::{ObservationSource, fetch_or_empty};
use crate::error::RarebirdError;
use crate::normalize::normalize_all;
use crate::snapshot::{Snapshot, SnapshotStore};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunReport {
    pub region: String,
    pub days_back: u32,
    pub raw_count: usize,
    pub unique_count: usize,
    pub output_path: String,
    pub last_updated: String,
    pub species: Vec<String>,
    pub fetch_error: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ProgressEvent {
    pub message: String,
    pub elapsed: Option<Duration>,
    pub is_failure: bool,
}

impl ProgressEvent {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            elapsed: None,
            is_failure: false,
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            elapsed: None,
            is_failure: true,
        }
    }

    pub fn timed(message: impl Into<String>, elapsed: Duration) -> Self {
        Self {
            message: message.into(),
            elapsed: Some(elapsed),
            is_failure: false,
        }
    }
}

pub trait ProgressSink {
    fn event(&self, event: ProgressEvent);
}

pub struct App<S: ObservationSource> {
    source: S,
    store: SnapshotStore,
    settings: Settings,
}

impl<S: ObservationSource> App<S> {
    pub fn new(source: S, settings: Settings) -> Self {
        let store = SnapshotStore::new(settings.output_path.clone());
        Self {
            source,
            store,
            settings,
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Fetches, normalizes, deduplicates and persists one snapshot.
    ///
    /// A failed or empty fetch still writes an empty snapshot; only storage errors are returned.
    pub fn run(&self, sink: &dyn ProgressSink) -> Result<RunReport, RarebirdError> {
        let region = &self.settings.region;
        let days_back = self.settings.days_back;

        sink.event(ProgressEvent::new("=".repeat(50)));
        sink.event(ProgressEvent::new("eBird Rare Bird Scraper"));
        sink.event(ProgressEvent::new("=".repeat(50)));
        sink.event(ProgressEvent::new(format!(
            "Fetching notable sightings for {region} (last {days_back} days)..."
        )));

        let started = Instant::now();
        let fetched = fetch_or_empty(&self.source, region, days_back, sink);
        let raw = fetched.observations;
        let raw_count = raw.len();

        let sightings = if raw.is_empty() {
            sink.event(ProgressEvent::new("No sightings found or error occurred."));
            Vec::new()
        } else {
            sink.event(ProgressEvent::timed(
                format!("Found {raw_count} raw observations"),
                started.elapsed(),
            ));
            let unique = deduplicate(normalize_all(&raw));
            sink.event(ProgressEvent::new(format!(
                "After deduplication: {} unique sightings",
                unique.len()
            )));
            unique
        };
        tracing::info!(%region, raw_count, unique_count = sightings.len(), "pipeline finished");

        let species = species_summary(&sightings);
        let snapshot = Snapshot::new(sightings, region, days_back, Utc::now());
        self.store.write(&snapshot)?;
        sink.event(ProgressEvent::new(format!(
            "Saved {} sightings to {}",
            snapshot.total_sightings,
            self.store.path()
        )));

        if raw_count > 0 {
            sink.event(ProgressEvent::new(format!(
                "Unique species: {}",
                species.len()
            )));
            sink.event(ProgressEvent::new("Species found:"));
            for name in &species {
                sink.event(ProgressEvent::new(format!("  - {name}")));
            }
        }

        Ok(RunReport {
            region: snapshot.region,
            days_back,
            raw_count,
            unique_count: snapshot.total_sightings,
            output_path: self.store.path().to_string(),
            last_updated: snapshot.last_updated,
            species,
            fetch_error: fetched.error,
        })
    }
}

/// Distinct common names in lexicographic order.
pub fn species_summary(sightings: &[NormalizedSighting]) -> Vec<String> {
    sightings
        .iter()
        .map(|s| s.com_name.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}
