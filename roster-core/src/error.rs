//! Error types for roster-core

use thiserror::Error;

/// Main error type for the roster-core library
#[derive(Error, Debug)]
pub enum Error {
    /// Backing database could not be opened, read or written
    #[error("storage unavailable: {0}")]
    StorageUnavailable(#[from] rusqlite::Error),

    /// The database file or its directory could not be prepared
    #[error("storage unavailable: {path}: {source}")]
    StorageMedium {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Network or payload failure while fetching a remote resource
    #[error("fetch failed: {0}")]
    FetchFailed(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// Report generation error
    #[error("report error: {0}")]
    Report(String),
}

impl Error {
    /// Whether this error came from the storage layer
    pub fn is_storage(&self) -> bool {
        matches!(
            self,
            Error::StorageUnavailable(_) | Error::StorageMedium { .. }
        )
    }
}

/// Result type alias for roster-core
pub type Result<T> = std::result::Result<T, Error>;
