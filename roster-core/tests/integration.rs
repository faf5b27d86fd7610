//! Integration tests for the roster store, ingestion pipeline and analytics
//!
//! These tests use the fixture in `tests/fixtures/users.json`, a trimmed copy
//! of the directory payload, to exercise the end-to-end flow against
//! file-backed stores.

use roster_core::analytics::{
    compute_average, render_histogram, Average, ChartOutcome, ChartSlot, TextChartBackend,
    DEFAULT_BINS,
};
use roster_core::ingest::{entries_from_payload, DirectorySource, SkipReason};
use roster_core::{Error, IngestOutcome, IngestPipeline, NumericColumn, Result, Store};
use serde_json::Value;
use std::path::PathBuf;
use tempfile::TempDir;

/// Serves the bundled fixture as if it came from the network
struct FixtureSource {
    payload: Value,
}

impl FixtureSource {
    fn load() -> Self {
        let path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/users.json");
        let text = std::fs::read_to_string(path).expect("fixture should exist");
        Self {
            payload: serde_json::from_str(&text).expect("fixture should be JSON"),
        }
    }
}

impl DirectorySource for FixtureSource {
    fn fetch(&self) -> Result<Vec<Value>> {
        entries_from_payload(self.payload.clone())
    }

    fn location(&self) -> &str {
        "tests/fixtures/users.json"
    }
}

fn temp_store() -> (TempDir, Store) {
    let dir = TempDir::new().unwrap();
    let store = Store::open(&dir.path().join("data.db")).unwrap();
    (dir, store)
}

fn ingest(store: &Store) -> roster_core::IngestReport {
    let pipeline = IngestPipeline::new(store, FixtureSource::load());
    match pipeline.run(|_| true).expect("ingestion should succeed") {
        IngestOutcome::Completed(report) => report,
        IngestOutcome::Declined { .. } => panic!("confirmation was granted"),
    }
}

// ============================================
// Ingestion
// ============================================

#[test]
fn test_fixture_ingestion_counts() {
    let (_dir, store) = temp_store();
    let report = ingest(&store);

    assert_eq!(report.fetched, 5);
    assert_eq!(report.accepted, 3);
    assert_eq!(report.skipped.len(), 2);
    assert_eq!(report.skipped[0].reason, SkipReason::MissingContact);
    assert_eq!(report.skipped[1].reason, SkipReason::MissingRegion);
    assert_eq!(store.count().unwrap(), 3);
}

#[test]
fn test_derived_lengths_match_source_strings() {
    let (_dir, store) = temp_store();
    ingest(&store);

    let records = store.records().unwrap();
    let leanne = records.iter().find(|r| r.name == "Leanne Graham").unwrap();
    assert_eq!(leanne.region, "Gwenborough");
    assert_eq!(leanne.name_length, 13);
    assert_eq!(leanne.contact_length, 17.0);
}

#[test]
fn test_second_run_replaces_instead_of_appending() {
    let (_dir, store) = temp_store();
    ingest(&store);
    let report = ingest(&store);

    assert_eq!(report.cleared, 3);
    assert_eq!(store.count().unwrap(), 3);
}

#[test]
fn test_ingested_rows_survive_reopen() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("data.db");

    {
        let store = Store::open(&path).unwrap();
        ingest(&store);
    }

    let store = Store::open(&path).unwrap();
    assert_eq!(store.count().unwrap(), 3);
}

#[test]
fn test_malformed_payload_is_fetch_failure() {
    struct ObjectSource;

    impl DirectorySource for ObjectSource {
        fn fetch(&self) -> Result<Vec<Value>> {
            entries_from_payload(serde_json::json!({"error": "rate limited"}))
        }

        fn location(&self) -> &str {
            "object"
        }
    }

    let (_dir, store) = temp_store();
    let err = IngestPipeline::new(&store, ObjectSource)
        .run(|_| true)
        .unwrap_err();
    assert!(matches!(err, Error::FetchFailed(_)));
    assert_eq!(store.count().unwrap(), 0);
}

#[test]
fn test_locked_store_fails_run_as_storage_error() {
    let (dir, store) = temp_store();
    ingest(&store);

    let locker = rusqlite::Connection::open(dir.path().join("data.db")).unwrap();
    locker.execute_batch("BEGIN EXCLUSIVE;").unwrap();

    let err = IngestPipeline::new(&store, FixtureSource::load())
        .run(|_| true)
        .unwrap_err();
    assert!(err.is_storage(), "expected storage error, got {err:?}");

    locker.execute_batch("ROLLBACK;").unwrap();
    assert_eq!(store.count().unwrap(), 3);
}

// ============================================
// Analytics
// ============================================

#[test]
fn test_average_after_ingestion() {
    let (_dir, store) = temp_store();
    assert_eq!(compute_average(&store).unwrap(), Average::NoData);

    ingest(&store);

    // Sincere@april.biz (17), Shanna@melissa.tv (17), Lucio_Hettinger@annie.ca (24)
    let avg = compute_average(&store).unwrap();
    assert_eq!(avg, Average::Mean(19.33));

    let raw = store.average(NumericColumn::ContactLength).unwrap().unwrap();
    assert!((raw - 58.0 / 3.0).abs() < 1e-9);
}

#[test]
fn test_histogram_after_ingestion() {
    let (_dir, store) = temp_store();
    let mut slot = ChartSlot::new(TextChartBackend::new(20));

    assert_eq!(
        render_histogram(&store, &mut slot, DEFAULT_BINS).unwrap(),
        ChartOutcome::NoData
    );

    ingest(&store);
    let outcome = render_histogram(&store, &mut slot, DEFAULT_BINS).unwrap();
    assert_eq!(outcome, ChartOutcome::Rendered { values: 3 });

    // Rendering again keeps exactly one live chart
    render_histogram(&store, &mut slot, DEFAULT_BINS).unwrap();
    assert_eq!(slot.backend().live(), 1);
}
