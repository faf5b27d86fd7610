//! Directory sources
//!
//! A source yields the raw JSON entries of the remote directory. The HTTP
//! source is used in production; tests provide in-memory sources.

use serde_json::Value;

use crate::config::SourceConfig;
use crate::error::{Error, Result};
use crate::http::HttpFetcher;

/// Produces the raw directory entries to ingest
pub trait DirectorySource {
    /// Fetch every entry. A transport or payload failure is `FetchFailed`.
    fn fetch(&self) -> Result<Vec<Value>>;

    /// Where entries come from, for status output and logs
    fn location(&self) -> &str;
}

/// Fetches the directory as a JSON array over HTTP
pub struct HttpDirectorySource {
    fetcher: HttpFetcher,
    url: String,
}

impl HttpDirectorySource {
    /// Create a source from configuration
    pub fn new(config: &SourceConfig) -> Result<Self> {
        Ok(Self {
            fetcher: HttpFetcher::new(config.timeout_secs)?,
            url: config.url.clone(),
        })
    }
}

impl DirectorySource for HttpDirectorySource {
    fn fetch(&self) -> Result<Vec<Value>> {
        let payload = self.fetcher.get_json(&self.url)?;
        entries_from_payload(payload)
    }

    fn location(&self) -> &str {
        &self.url
    }
}

/// Unwrap the top-level array of a directory payload
pub fn entries_from_payload(payload: Value) -> Result<Vec<Value>> {
    match payload {
        Value::Array(entries) => Ok(entries),
        other => Err(Error::FetchFailed(format!(
            "expected a JSON array of entries, got {}",
            json_kind(&other)
        ))),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
