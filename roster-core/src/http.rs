//! Blocking HTTP fetcher
//!
//! Wraps the async `reqwest` client in a current-thread tokio runtime so the
//! rest of the crate can stay synchronous. A fetch blocks its caller until it
//! completes or fails.

use std::time::Duration;

use crate::error::{Error, Result};

/// Blocking GET client shared by the directory and book sources
pub struct HttpFetcher {
    runtime: tokio::runtime::Runtime,
    http: reqwest::Client,
}

impl HttpFetcher {
    /// Create a fetcher; `timeout_secs` of `None` leaves requests unbounded
    pub fn new(timeout_secs: Option<u64>) -> Result<Self> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| Error::FetchFailed(format!("failed to build tokio runtime: {e}")))?;

        let mut builder = reqwest::Client::builder()
            .user_agent(concat!("roster/", env!("CARGO_PKG_VERSION")));
        if let Some(secs) = timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs.max(1)));
        }
        let http = builder
            .build()
            .map_err(|e| Error::FetchFailed(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { runtime, http })
    }

    /// GET a URL and return the body as text; non-2xx statuses are failures
    pub fn get_text(&self, url: &str) -> Result<String> {
        self.runtime.block_on(async {
            tracing::debug!(url, "GET");
            let resp = self
                .http
                .get(url)
                .send()
                .await
                .map_err(|e| Error::FetchFailed(format!("request to {url} failed: {e}")))?;

            let status = resp.status();
            if !status.is_success() {
                return Err(Error::FetchFailed(format!(
                    "{url} returned {}",
                    status.as_u16()
                )));
            }

            resp.text()
                .await
                .map_err(|e| Error::FetchFailed(format!("failed to read body from {url}: {e}")))
        })
    }

    /// GET a URL and decode the body as JSON
    pub fn get_json(&self, url: &str) -> Result<serde_json::Value> {
        let body = self.get_text(url)?;
        serde_json::from_str(&body)
            .map_err(|e| Error::FetchFailed(format!("malformed JSON from {url}: {e}")))
    }
}
