//! # roster-core
//!
//! Core library for roster - a small directory ingestion and reporting tool.
//!
//! This library provides:
//! - A SQLite record store with aggregate queries
//! - An ingestion pipeline loading a remote JSON directory into the store
//! - Mean and histogram analytics over stored records
//! - A reading report generator for plain-text books
//! - Configuration management
//! - Logging infrastructure
//!
//! ## Example
//!
//! ```rust,no_run
//! use roster_core::analytics::compute_average;
//! use roster_core::{Config, Store};
//!
//! // Load configuration
//! let config = Config::load().expect("failed to load config");
//!
//! // Open the record store
//! let store = Store::open(&config.store_path()).expect("failed to open store");
//! println!("{}", compute_average(&store).expect("query failed"));
//! ```

// Re-export commonly used items at the crate root
pub use config::Config;
pub use error::{Error, Result};
pub use ingest::{IngestOutcome, IngestPipeline, IngestReport};
pub use store::Store;
pub use types::*;

// Public modules
pub mod analytics;
pub mod config;
pub mod error;
pub mod format;
pub mod http;
pub mod ingest;
pub mod logging;
pub mod report;
pub mod store;
pub mod types;
