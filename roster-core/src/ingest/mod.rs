//! Ingestion pipeline for directory entries
//!
//! ```text
//! ┌─────────────────┐     ┌──────────────────┐     ┌─────────────────┐
//! │ DirectorySource │ ──► │  IngestPipeline  │ ──► │      Store      │
//! │  (HTTP / JSON)  │     │ classify_entry() │     │  (data table)   │
//! └─────────────────┘     └──────────────────┘     └─────────────────┘
//! ```
//!
//! A run replaces the store contents: existing rows are cleared (after the
//! caller confirms), the directory is fetched, and every entry carrying a
//! name, a city and an email becomes one record. Entries missing any of the
//! three are skipped and reported, never treated as failures.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use roster_core::{Config, Store};
//! use roster_core::ingest::{HttpDirectorySource, IngestPipeline};
//!
//! let config = Config::load()?;
//! let store = Store::open(&config.store_path())?;
//! let source = HttpDirectorySource::new(&config.source)?;
//! let pipeline = IngestPipeline::new(&store, source);
//!
//! let outcome = pipeline.run(|existing| ask_user(existing))?;
//! ```

mod source;

pub use source::{entries_from_payload, DirectorySource, HttpDirectorySource};

use serde_json::Value;

use crate::error::Result;
use crate::store::Store;
use crate::types::NewRecord;

/// Why an entry was left out of the store
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Entry is not a JSON object
    NotAnObject,
    /// `name` absent, empty or not a string
    MissingName,
    /// `address.city` absent, empty or not a string
    MissingRegion,
    /// `email` absent, empty or not a string
    MissingContact,
}

impl SkipReason {
    pub fn describe(&self) -> &'static str {
        match self {
            SkipReason::NotAnObject => "not an object",
            SkipReason::MissingName => "missing name",
            SkipReason::MissingRegion => "missing city",
            SkipReason::MissingContact => "missing email",
        }
    }
}

/// Classification of one fetched entry
#[derive(Debug, Clone, PartialEq)]
pub enum EntryOutcome {
    Accepted(NewRecord),
    Skipped(SkipReason),
}

/// A skipped entry and its position in the fetched collection
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedEntry {
    pub index: usize,
    pub reason: SkipReason,
}

/// Result of a completed ingestion run
#[derive(Debug, Default)]
pub struct IngestReport {
    /// Rows removed before fetching
    pub cleared: usize,
    /// Entries returned by the source
    pub fetched: usize,
    /// Records written to the store
    pub accepted: usize,
    /// Entries left out, in fetch order
    pub skipped: Vec<SkippedEntry>,
}

impl IngestReport {
    /// One-line "N accepted, M skipped" summary
    pub fn summary(&self) -> String {
        format!(
            "{} accepted, {} skipped",
            self.accepted,
            self.skipped.len()
        )
    }
}

/// Outcome of [`IngestPipeline::run`]
#[derive(Debug)]
pub enum IngestOutcome {
    /// The store held rows and the caller declined to replace them
    Declined { existing: i64 },
    /// The store was replaced with freshly fetched records
    Completed(IngestReport),
}

/// Classify one raw directory entry.
///
/// Empty strings count as missing, as do nulls and non-string values.
pub fn classify_entry(entry: &Value) -> EntryOutcome {
    let Some(object) = entry.as_object() else {
        return EntryOutcome::Skipped(SkipReason::NotAnObject);
    };

    let Some(name) = non_empty_str(object.get("name")) else {
        return EntryOutcome::Skipped(SkipReason::MissingName);
    };
    let Some(city) = non_empty_str(object.get("address").and_then(|a| a.get("city"))) else {
        return EntryOutcome::Skipped(SkipReason::MissingRegion);
    };
    let Some(email) = non_empty_str(object.get("email")) else {
        return EntryOutcome::Skipped(SkipReason::MissingContact);
    };

    EntryOutcome::Accepted(NewRecord::derive(name, city, email))
}

fn non_empty_str(value: Option<&Value>) -> Option<&str> {
    value.and_then(Value::as_str).filter(|s| !s.is_empty())
}

/// Fetches the directory and loads it into a store
pub struct IngestPipeline<'a, S> {
    store: &'a Store,
    source: S,
}

impl<'a, S: DirectorySource> IngestPipeline<'a, S> {
    pub fn new(store: &'a Store, source: S) -> Self {
        Self { store, source }
    }

    /// Whether a run would discard existing rows and so needs confirmation
    pub fn needs_confirmation(&self) -> Result<bool> {
        Ok(self.store.count()? > 0)
    }

    /// Replace the store contents with the fetched directory.
    ///
    /// `confirm` is asked only when the store already holds rows and receives
    /// their count. Declining leaves the store untouched. Once confirmed, the
    /// clear is committed before fetching, so a fetch failure leaves the
    /// store empty.
    pub fn run<F>(&self, confirm: F) -> Result<IngestOutcome>
    where
        F: FnOnce(i64) -> bool,
    {
        let existing = self.store.count()?;
        if existing > 0 && !confirm(existing) {
            tracing::info!(existing, "Ingestion declined, store left untouched");
            return Ok(IngestOutcome::Declined { existing });
        }

        let cleared = self.store.clear_all()?;

        tracing::info!(source = self.source.location(), "Fetching directory");
        let entries = self.source.fetch()?;

        let mut report = self.load(&entries)?;
        report.cleared = cleared;

        tracing::info!(
            fetched = report.fetched,
            accepted = report.accepted,
            skipped = report.skipped.len(),
            "Ingestion complete"
        );

        Ok(IngestOutcome::Completed(report))
    }

    /// Classify entries and commit the accepted ones in one transaction
    fn load(&self, entries: &[Value]) -> Result<IngestReport> {
        let mut accepted = Vec::with_capacity(entries.len());
        let mut skipped = Vec::new();

        for (index, entry) in entries.iter().enumerate() {
            match classify_entry(entry) {
                EntryOutcome::Accepted(record) => accepted.push(record),
                EntryOutcome::Skipped(reason) => {
                    tracing::debug!(index, reason = reason.describe(), "Skipping entry");
                    skipped.push(SkippedEntry { index, reason });
                }
            }
        }

        let written = self.store.insert_batch(&accepted)?;

        Ok(IngestReport {
            cleared: 0,
            fetched: entries.len(),
            accepted: written,
            skipped,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use serde_json::json;
    use std::cell::Cell;

    struct FixedSource(Vec<Value>);

    impl DirectorySource for FixedSource {
        fn fetch(&self) -> Result<Vec<Value>> {
            Ok(self.0.clone())
        }

        fn location(&self) -> &str {
            "memory"
        }
    }

    struct FailingSource;

    impl DirectorySource for FailingSource {
        fn fetch(&self) -> Result<Vec<Value>> {
            Err(Error::FetchFailed("connection refused".to_string()))
        }

        fn location(&self) -> &str {
            "nowhere"
        }
    }

    fn user(name: &str, city: &str, email: &str) -> Value {
        json!({"name": name, "address": {"city": city}, "email": email})
    }

    #[test]
    fn test_classify_accepts_complete_entry() {
        let outcome = classify_entry(&user("Leanne Graham", "Gwenborough", "Sincere@april.biz"));
        match outcome {
            EntryOutcome::Accepted(record) => {
                assert_eq!(record.name, "Leanne Graham");
                assert_eq!(record.region, "Gwenborough");
                assert_eq!(record.name_length, 13);
                assert_eq!(record.contact_length, 17.0);
            }
            other => panic!("expected Accepted, got {other:?}"),
        }
    }

    #[test]
    fn test_classify_skip_reasons() {
        assert_eq!(
            classify_entry(&json!("just a string")),
            EntryOutcome::Skipped(SkipReason::NotAnObject)
        );
        assert_eq!(
            classify_entry(&json!({"address": {"city": "Lyon"}, "email": "x@y.z"})),
            EntryOutcome::Skipped(SkipReason::MissingName)
        );
        assert_eq!(
            classify_entry(&json!({"name": "Bob", "email": "x@y.z"})),
            EntryOutcome::Skipped(SkipReason::MissingRegion)
        );
        assert_eq!(
            classify_entry(&user("Bob", "Lyon", "")),
            EntryOutcome::Skipped(SkipReason::MissingContact)
        );
        assert_eq!(
            classify_entry(&json!({"name": 42, "address": {"city": "Lyon"}, "email": "x@y.z"})),
            EntryOutcome::Skipped(SkipReason::MissingName)
        );
        assert_eq!(
            classify_entry(&json!({"name": "Bob", "address": {"city": null}, "email": "x@y.z"})),
            EntryOutcome::Skipped(SkipReason::MissingRegion)
        );
    }

    #[test]
    fn test_run_skips_entry_without_email() {
        let store = Store::open_in_memory().unwrap();
        let source = FixedSource(vec![
            user("Alice", "Paris", "alice@example.com"),
            json!({"name": "Bob", "address": {"city": "Lyon"}}),
            user("Charlie", "Marseille", "charlie@example.com"),
        ]);
        let pipeline = IngestPipeline::new(&store, source);

        let outcome = pipeline.run(|_| panic!("empty store needs no confirmation")).unwrap();
        let IngestOutcome::Completed(report) = outcome else {
            panic!("expected Completed");
        };

        assert_eq!(report.fetched, 3);
        assert_eq!(report.accepted, 2);
        assert_eq!(
            report.skipped,
            vec![SkippedEntry {
                index: 1,
                reason: SkipReason::MissingContact
            }]
        );
        assert_eq!(report.summary(), "2 accepted, 1 skipped");
        assert_eq!(store.count().unwrap(), 2);
    }

    #[test]
    fn test_declined_run_has_no_side_effects() {
        let store = Store::open_in_memory().unwrap();
        store
            .insert(&NewRecord::with_lengths("Alice", "Paris", 5, 15.0))
            .unwrap();
        let source = FixedSource(vec![user("Bob", "Lyon", "b@l.fr")]);
        let pipeline = IngestPipeline::new(&store, source);

        assert!(pipeline.needs_confirmation().unwrap());

        let asked = Cell::new(None);
        let outcome = pipeline
            .run(|existing| {
                asked.set(Some(existing));
                false
            })
            .unwrap();

        assert!(matches!(outcome, IngestOutcome::Declined { existing: 1 }));
        assert_eq!(asked.get(), Some(1));
        assert_eq!(store.count_named("Alice").unwrap(), 1);
        assert_eq!(store.count().unwrap(), 1);
    }

    #[test]
    fn test_confirmed_run_replaces_rows() {
        let store = Store::open_in_memory().unwrap();
        store
            .insert(&NewRecord::with_lengths("Alice", "Paris", 5, 15.0))
            .unwrap();
        let source = FixedSource(vec![user("Bob", "Lyon", "b@l.fr")]);
        let pipeline = IngestPipeline::new(&store, source);

        let IngestOutcome::Completed(report) = pipeline.run(|_| true).unwrap() else {
            panic!("expected Completed");
        };

        assert_eq!(report.cleared, 1);
        assert_eq!(store.count().unwrap(), 1);
        assert_eq!(store.count_named("Alice").unwrap(), 0);
        assert!(pipeline.needs_confirmation().unwrap());
    }

    #[test]
    fn test_fetch_failure_leaves_store_cleared() {
        let store = Store::open_in_memory().unwrap();
        store
            .insert(&NewRecord::with_lengths("Alice", "Paris", 5, 15.0))
            .unwrap();
        let pipeline = IngestPipeline::new(&store, FailingSource);

        let err = pipeline.run(|_| true).unwrap_err();
        assert!(matches!(err, Error::FetchFailed(_)));
        assert_eq!(store.count().unwrap(), 0);
    }
}
