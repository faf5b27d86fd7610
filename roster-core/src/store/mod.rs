//! Record store for roster
//!
//! A single SQLite table of records derived from ingested directory entries:
//! - Table creation on open
//! - Insert, clear and count
//! - Aggregate and value queries over numeric columns

pub mod repo;
pub mod schema;

pub use repo::{ColumnValues, Store};
