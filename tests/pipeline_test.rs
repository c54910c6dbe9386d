//! End-to-end refresh tests against the bundled snapshot.

use std::path::{Path, PathBuf};

use satdash::fetch::{RecordOrigin, RecordSource, Snapshot, SourceError};
use satdash::pipeline::{IterationOutcome, Pipeline, PipelineConfig};
use serde_json::Value;
use tempfile::tempdir;

fn fixture() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/data/telemetry_snapshot.json")
}

fn fixture_documents() -> Vec<Value> {
    Snapshot::new(fixture()).read().unwrap()
}

struct StaticSource(Vec<Value>);

impl RecordSource for StaticSource {
    fn name(&self) -> &str {
        "static"
    }

    fn fetch_documents(&self) -> Result<Vec<Value>, SourceError> {
        Ok(self.0.clone())
    }
}

#[test]
fn test_render_snapshot_end_to_end() {
    let dir = tempdir().unwrap();
    let output = dir.path().join("index.html");
    let pipeline = Pipeline::new(PipelineConfig::new(Snapshot::new(fixture()), &output));

    let outcome = pipeline.run_once();
    let report = match &outcome {
        IterationOutcome::Success(report) => report,
        other => panic!("refresh failed: {:?}", other),
    };

    assert_eq!(report.origin, RecordOrigin::Snapshot);
    assert_eq!(report.rows, 5);
    assert_eq!(report.columns, 8);
    // Battery Voltage, Uptime, temperatures, ADC channels
    assert_eq!(report.charts, 4);
    assert!(report.memorial_shown);

    let html = std::fs::read_to_string(&output).unwrap();
    assert!(html.starts_with("<!DOCTYPE html>"));
    assert!(html.contains("<div class=\"name\">Yuri Gagarin</div>"));
    assert!(html.contains("Ground time: 2024-05-01 10:10:00"));
    assert!(html.contains("id=\"chart-3\""));
    assert!(!html.contains("id=\"chart-4\""));

    let temperatures = html.find("Solar Panel Temperatures").unwrap();
    let adc = html.find("ADC Channels").unwrap();
    assert!(temperatures < adc);

    // constant and text columns stay out of the charts
    assert!(!html.contains("\"name\":\"Flat\""));
    assert!(!html.contains("\"name\":\"Mode\""));
}

#[test]
fn test_second_refresh_overwrites_page() {
    let dir = tempdir().unwrap();
    let output = dir.path().join("index.html");
    let pipeline = Pipeline::new(PipelineConfig::new(Snapshot::new(fixture()), &output));

    assert!(pipeline.run_once().is_success());
    let first = std::fs::read_to_string(&output).unwrap();
    assert!(pipeline.run_once().is_success());
    let second = std::fs::read_to_string(&output).unwrap();

    assert_eq!(first, second);
}

#[test]
fn test_live_refresh_updates_snapshot() {
    let dir = tempdir().unwrap();
    let snapshot_path = dir.path().join("snapshot.json");
    let output = dir.path().join("index.html");

    let snapshot = Snapshot::new(&snapshot_path).with_refresh(true);
    let pipeline = Pipeline::new(PipelineConfig::new(snapshot, &output))
        .with_live_source(Box::new(StaticSource(fixture_documents())));

    let outcome = pipeline.run_once();
    assert_eq!(outcome.report().unwrap().origin, RecordOrigin::Live);
    let live_page = std::fs::read_to_string(&output).unwrap();

    // the refreshed snapshot alone reproduces the page
    let offline = Pipeline::new(PipelineConfig::new(Snapshot::new(&snapshot_path), &output));
    let outcome = offline.run_once();
    assert_eq!(outcome.report().unwrap().origin, RecordOrigin::Snapshot);
    assert_eq!(std::fs::read_to_string(&output).unwrap(), live_page);
}

#[test]
fn test_malformed_snapshot_fails_fetch() {
    let dir = tempdir().unwrap();
    let snapshot_path = dir.path().join("snapshot.json");
    std::fs::write(&snapshot_path, r#"[{"params": []}]"#).unwrap();

    let pipeline = Pipeline::new(PipelineConfig::new(
        Snapshot::new(&snapshot_path),
        dir.path().join("index.html"),
    ));

    let outcome = pipeline.run_once();
    assert!(matches!(outcome, IterationOutcome::FetchFailed(_)));
    assert!(!dir.path().join("index.html").exists());
}
