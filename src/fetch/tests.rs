use super::*;
use serde_json::json;
use std::cell::Cell;
use tempfile::tempdir;

struct FakeSource {
    result: Result<Vec<Value>, String>,
    calls: Cell<usize>,
}

impl FakeSource {
    fn ok(documents: Vec<Value>) -> Self {
        Self {
            result: Ok(documents),
            calls: Cell::new(0),
        }
    }

    fn unreachable() -> Self {
        Self {
            result: Err("connection refused".to_string()),
            calls: Cell::new(0),
        }
    }
}

impl RecordSource for FakeSource {
    fn name(&self) -> &str {
        "fake"
    }

    fn fetch_documents(&self) -> Result<Vec<Value>, SourceError> {
        self.calls.set(self.calls.get() + 1);
        self.result.clone().map_err(SourceError::Connection)
    }
}

fn live_docs() -> Vec<Value> {
    vec![
        json!({"groundTime": "2024-01-02T00:00:00Z", "params": [{"name": "volt", "value": 5}]}),
        json!({"groundTime": "2024-01-01T00:00:00Z", "params": [{"name": "volt", "value": 4}]}),
    ]
}

fn write_snapshot(path: &std::path::Path, docs: &Value) {
    std::fs::write(path, serde_json::to_vec(docs).unwrap()).unwrap();
}

#[test]
fn test_live_source_preferred() {
    let dir = tempdir().unwrap();
    let snapshot = Snapshot::new(dir.path().join("missing.json"));
    let source = FakeSource::ok(live_docs());

    let fetched = fetch_records(Some(&source as &dyn RecordSource), &snapshot).unwrap();
    assert_eq!(fetched.origin, RecordOrigin::Live);
    assert_eq!(fetched.records.len(), 2);
    assert_eq!(source.calls.get(), 1);
    // read-only snapshot is never created
    assert!(!snapshot.path().exists());
}

#[test]
fn test_fallback_to_snapshot() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("tevel.json");
    write_snapshot(
        &path,
        &json!([{"groundTime": "2024-01-01", "params": [{"name": "temp", "value": 21.5}]}]),
    );

    let source = FakeSource::unreachable();
    let fetched = fetch_records(Some(&source as &dyn RecordSource), &Snapshot::new(&path)).unwrap();
    assert_eq!(fetched.origin, RecordOrigin::Snapshot);
    assert_eq!(fetched.records.len(), 1);
}

#[test]
fn test_no_live_source_reads_snapshot() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("tevel.json");
    write_snapshot(&path, &json!([]));

    let fetched = fetch_records(None, &Snapshot::new(&path)).unwrap();
    assert_eq!(fetched.origin, RecordOrigin::Snapshot);
    assert!(fetched.records.is_empty());
}

#[test]
fn test_both_sources_failing_is_an_error() {
    let dir = tempdir().unwrap();
    let snapshot = Snapshot::new(dir.path().join("missing.json"));
    let source = FakeSource::unreachable();

    let err = fetch_records(Some(&source as &dyn RecordSource), &snapshot).unwrap_err();
    assert!(matches!(err, FetchError::Snapshot(SnapshotError::Io { .. })));
}

#[test]
fn test_corrupt_snapshot_is_an_error() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("tevel.json");
    std::fs::write(&path, b"{not json").unwrap();

    let err = fetch_records(None, &Snapshot::new(&path)).unwrap_err();
    assert!(matches!(err, FetchError::Snapshot(SnapshotError::Json { .. })));
}

#[test]
fn test_decode_error_reports_index() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("tevel.json");
    write_snapshot(
        &path,
        &json!([{"groundTime": "2024-01-01"}, {"groundTime": "never"}]),
    );

    match fetch_records(None, &Snapshot::new(&path)) {
        Err(FetchError::Decode { index, .. }) => assert_eq!(index, 1),
        other => panic!("expected decode error, got {:?}", other),
    }
}

#[test]
fn test_refresh_writes_live_documents() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("tevel.json");
    let snapshot = Snapshot::new(&path).with_refresh(true);
    let source = FakeSource::ok(live_docs());

    fetch_records(Some(&source as &dyn RecordSource), &snapshot).unwrap();

    let written = snapshot.read().unwrap();
    assert_eq!(written, live_docs());
}

#[cfg(unix)]
#[test]
fn test_refresh_keeps_snapshot_mode() {
    use std::os::unix::fs::PermissionsExt;

    let dir = tempdir().unwrap();
    let path = dir.path().join("tevel.json");
    write_snapshot(&path, &json!([]));
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o644)).unwrap();

    Snapshot::new(&path).write(&live_docs()).unwrap();

    let mode = std::fs::metadata(&path).unwrap().permissions().mode() & 0o777;
    assert_eq!(mode, 0o644);
}
