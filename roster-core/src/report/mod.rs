//! Reading report generator
//!
//! Independent of the record store: downloads a plain-text book, measures the
//! paragraphs of its first chapter and writes a Markdown report. Opening the
//! finished document is best effort; failure is reported as a warning.

mod analysis;
mod document;

pub use analysis::{
    analyze, round_to_tens, BookAnalysis, ParagraphStats, TextHints, MIN_PARAGRAPH_WORDS,
};
pub use document::{open_document, render_markdown, write_report};

use std::path::PathBuf;

use chrono::Utc;

use crate::config::ReportConfig;
use crate::error::Result;
use crate::http::HttpFetcher;

/// Produces the full text of a book
pub trait TextSource {
    fn fetch_text(&self) -> Result<String>;
}

/// Downloads the book text over HTTP
pub struct HttpTextSource {
    fetcher: HttpFetcher,
    url: String,
}

impl HttpTextSource {
    pub fn new(url: &str, timeout_secs: Option<u64>) -> Result<Self> {
        Ok(Self {
            fetcher: HttpFetcher::new(timeout_secs)?,
            url: url.to_string(),
        })
    }
}

impl TextSource for HttpTextSource {
    fn fetch_text(&self) -> Result<String> {
        self.fetcher.get_text(&self.url)
    }
}

/// A written report
#[derive(Debug)]
pub struct GeneratedReport {
    pub path: PathBuf,
    pub analysis: BookAnalysis,
    /// Set when the document was written but could not be opened
    pub open_warning: Option<String>,
}

/// Fetch, analyze, write and optionally open the reading report.
pub fn generate<S: TextSource>(source: &S, config: &ReportConfig) -> Result<GeneratedReport> {
    let text = source.fetch_text()?;
    let analysis = analyze(&text, &TextHints::from(config));

    tracing::info!(
        title = %analysis.title,
        paragraphs = analysis.word_counts.len(),
        "Book analyzed"
    );

    let document = render_markdown(&analysis, &config.report_author, Utc::now());
    write_report(&config.output, &document)?;

    let open_warning = if config.open_after {
        match open_document(&config.output) {
            Ok(()) => None,
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    path = %config.output.display(),
                    "Could not open report"
                );
                Some(format!(
                    "report written to {} but could not be opened automatically: {}",
                    config.output.display(),
                    e
                ))
            }
        }
    } else {
        None
    };

    Ok(GeneratedReport {
        path: config.output.clone(),
        analysis,
        open_warning,
    })
}
