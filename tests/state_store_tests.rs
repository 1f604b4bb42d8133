// StateStore tests: save/load, missing and corrupt files, interface mismatch, locking

mod common;

use chrono::{TimeZone, Utc};
use common::scenario_state;
use tempfile::TempDir;
use traffic_probe::error::StateReadError;
use traffic_probe::state_store::StateStore;

#[test]
fn save_then_load_returns_same_state() {
    let dir = TempDir::new().unwrap();
    let store = StateStore::new(dir.path().join("traffic-eth0.state"), "eth0");
    let captured_at = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();

    store.save(&scenario_state(), captured_at).unwrap();
    let record = store.load().unwrap();
    assert_eq!(record.state, scenario_state());
    assert_eq!(record.interface, "eth0");
    assert_eq!(record.captured_at_ms, captured_at.timestamp_millis());
}

#[test]
fn save_overwrites_previous_state() {
    let dir = TempDir::new().unwrap();
    let store = StateStore::new(dir.path().join("traffic-eth0.state"), "eth0");
    store.save(&scenario_state(), Utc::now()).unwrap();

    let mut newer = scenario_state();
    newer.accumulated_rx = 99;
    store.save(&newer, Utc::now()).unwrap();
    assert_eq!(store.load_state().unwrap().accumulated_rx, 99);
}

#[test]
fn save_creates_missing_parent_dirs() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nested").join("deeper").join("traffic-eth0.state");
    let store = StateStore::new(&path, "eth0");
    store.save(&scenario_state(), Utc::now()).unwrap();
    assert!(path.exists());
}

#[test]
fn save_leaves_no_temp_files_behind() {
    let dir = TempDir::new().unwrap();
    let store = StateStore::new(dir.path().join("traffic-eth0.state"), "eth0");
    store.save(&scenario_state(), Utc::now()).unwrap();
    store.save(&scenario_state(), Utc::now()).unwrap();
    let entries: Vec<_> = std::fs::read_dir(dir.path()).unwrap().collect();
    assert_eq!(entries.len(), 1);
}

#[test]
fn missing_file_is_reported_as_missing() {
    let dir = TempDir::new().unwrap();
    let store = StateStore::new(dir.path().join("absent.state"), "eth0");
    assert!(matches!(store.load(), Err(StateReadError::Missing { .. })));
}

#[test]
fn garbage_file_is_corrupt() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("traffic-eth0.state");
    std::fs::write(&path, b"\x01not a record").unwrap();
    let store = StateStore::new(&path, "eth0");
    assert!(matches!(store.load(), Err(StateReadError::Corrupt { .. })));
}

#[test]
fn empty_file_is_corrupt() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("traffic-eth0.state");
    std::fs::write(&path, b"").unwrap();
    let store = StateStore::new(&path, "eth0");
    let err = store.load().unwrap_err();
    assert!(err.to_string().contains("empty"));
}

#[test]
fn unknown_version_is_corrupt() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("traffic-eth0.state");
    let store = StateStore::new(&path, "eth0");
    store.save(&scenario_state(), Utc::now()).unwrap();

    let mut bytes = std::fs::read(&path).unwrap();
    bytes[0] = 0xfe;
    std::fs::write(&path, bytes).unwrap();
    let err = store.load().unwrap_err();
    assert!(matches!(err, StateReadError::Corrupt { .. }));
    assert!(err.to_string().contains("version 254"));
}

#[test]
fn truncated_record_is_corrupt() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("traffic-eth0.state");
    let store = StateStore::new(&path, "eth0");
    store.save(&scenario_state(), Utc::now()).unwrap();

    let bytes = std::fs::read(&path).unwrap();
    std::fs::write(&path, &bytes[..bytes.len() / 2]).unwrap();
    assert!(matches!(store.load(), Err(StateReadError::Corrupt { .. })));
}

#[test]
fn state_of_another_interface_is_rejected() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("shared.state");
    StateStore::new(&path, "eth0")
        .save(&scenario_state(), Utc::now())
        .unwrap();

    match StateStore::new(&path, "wlan0").load() {
        Err(StateReadError::InterfaceMismatch {
            expected, found, ..
        }) => {
            assert_eq!(expected, "wlan0");
            assert_eq!(found, "eth0");
        }
        other => panic!("expected interface mismatch, got {:?}", other),
    }
}

#[test]
fn directory_in_place_of_file_fails_to_write() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("traffic-eth0.state");
    std::fs::create_dir(&path).unwrap();
    let store = StateStore::new(&path, "eth0");
    let err = store.save(&scenario_state(), Utc::now()).unwrap_err();
    assert!(matches!(err, traffic_probe::error::ProbeError::StateWrite { .. }));
}

#[test]
fn lock_is_released_on_drop() {
    let dir = TempDir::new().unwrap();
    let store = StateStore::new(dir.path().join("traffic-eth0.state"), "eth0");
    {
        let lock = store.lock().unwrap();
        assert!(lock.path().ends_with("traffic-eth0.state.lock"));
    }
    // Would block forever if the first guard still held the lock.
    let _again = store.lock().unwrap();
}

#[test]
fn lock_gives_up_after_timeout() {
    let dir = TempDir::new().unwrap();
    let store = StateStore::new(dir.path().join("traffic-eth0.state"), "eth0");
    let _held = store.lock().unwrap();

    let err = store
        .lock_with_timeout(std::time::Duration::from_millis(120))
        .unwrap_err();
    match err {
        traffic_probe::error::ProbeError::StateLock { source, .. } => {
            assert_eq!(source.kind(), std::io::ErrorKind::TimedOut);
        }
        other => panic!("expected lock error, got {:?}", other),
    }
}
