use camino::Utf8PathBuf;
use chrono::{TimeZone, Utc};
use serde_json::Value;

use rarebird_snapshot::domain::{RawObservation, RegionCode};
use rarebird_snapshot::normalize::normalize;
use rarebird_snapshot::snapshot::{Snapshot, SnapshotStore};

fn temp_store(temp: &tempfile::TempDir) -> SnapshotStore {
    let path = Utf8PathBuf::from_path_buf(temp.path().join("data").join("sightings.json")).unwrap();
    SnapshotStore::new(path)
}

#[test]
fn write_creates_directory_and_document() {
    let temp = tempfile::tempdir().unwrap();
    let store = temp_store(&temp);
    let region: RegionCode = "US-NY".parse().unwrap();
    let at = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
    let snapshot = Snapshot::new(vec![normalize(&RawObservation::new())], &region, 14, at);

    store.write(&snapshot).unwrap();

    let raw = std::fs::read_to_string(store.path().as_std_path()).unwrap();
    let value: Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(value["lastUpdated"], "2024-05-01T12:00:00.000000Z");
    assert_eq!(value["region"], "US-NY");
    assert_eq!(value["totalSightings"], 1);
    assert_eq!(value["daysBack"], 14);
    assert_eq!(value["sightings"].as_array().unwrap().len(), 1);
    assert!(raw.contains("\n  \"region\""));
}

#[test]
fn write_overwrites_previous_snapshot() {
    let temp = tempfile::tempdir().unwrap();
    let store = temp_store(&temp);
    let region: RegionCode = "US-NY".parse().unwrap();

    let three = vec![normalize(&RawObservation::new()); 3];
    store
        .write(&Snapshot::new(three, &region, 14, Utc::now()))
        .unwrap();
    store
        .write(&Snapshot::new(Vec::new(), &region, 7, Utc::now()))
        .unwrap();

    let loaded = store.load().unwrap();
    assert_eq!(loaded.total_sightings, 0);
    assert!(loaded.sightings.is_empty());
    assert_eq!(loaded.days_back, 7);
}

#[test]
fn write_fails_when_parent_is_a_file() {
    let temp = tempfile::tempdir().unwrap();
    std::fs::write(temp.path().join("data"), b"not a directory").unwrap();
    let store = temp_store(&temp);
    let region: RegionCode = "US-NY".parse().unwrap();

    let result = store.write(&Snapshot::new(Vec::new(), &region, 14, Utc::now()));
    assert!(result.is_err());
}
