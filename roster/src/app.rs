//! Application state shared by one-shot commands and the interactive shell.
//!
//! Each method is one user action. It runs to completion against the store
//! and returns the message to show.

use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

use roster_core::analytics::{
    compute_average, render_histogram, ChartOutcome, ChartSlot, TextChartBackend,
};
use roster_core::ingest::HttpDirectorySource;
use roster_core::report::{self, HttpTextSource};
use roster_core::{Config, IngestOutcome, IngestPipeline, Store};

pub struct App {
    config: Config,
    store: Store,
    chart: ChartSlot<TextChartBackend>,
}

impl App {
    pub fn new(config: Config, store: Store) -> Self {
        let chart = ChartSlot::new(TextChartBackend::new(config.chart.width));
        Self {
            config,
            store,
            chart,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut Config {
        &mut self.config
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    /// Download the directory and replace the stored records.
    ///
    /// `confirm` is asked before discarding existing rows.
    pub fn fetch<F>(&mut self, confirm: F) -> Result<String>
    where
        F: FnOnce(i64) -> bool,
    {
        let source = HttpDirectorySource::new(&self.config.source)
            .context("failed to prepare directory source")?;
        let pipeline = IngestPipeline::new(&self.store, source);

        // Ask before the spinner starts so the prompt stays readable
        let confirmed = if pipeline.needs_confirmation()? {
            confirm(self.store.count()?)
        } else {
            true
        };

        let spinner = confirmed.then(|| {
            // The displayed chart describes rows about to be replaced
            self.chart.release();
            fetch_spinner(&self.config.source.url)
        });
        let outcome = pipeline.run(|_| confirmed);
        if let Some(spinner) = spinner {
            spinner.finish_and_clear();
        }

        match outcome.context("failed to download directory")? {
            IngestOutcome::Declined { existing } => {
                Ok(format!("Cancelled, kept {} existing record(s)", existing))
            }
            IngestOutcome::Completed(report) => {
                for skipped in &report.skipped {
                    tracing::debug!(
                        index = skipped.index,
                        reason = skipped.reason.describe(),
                        "Entry skipped"
                    );
                }
                Ok(format!(
                    "Data downloaded and stored ({})",
                    report.summary()
                ))
            }
        }
    }

    /// Delete every record and drop the displayed chart.
    pub fn clear(&mut self) -> Result<String> {
        self.chart.release();
        let removed = self.store.clear_all().context("failed to clear database")?;
        Ok(format!("Database cleared ({} record(s) removed)", removed))
    }

    /// Mean email length over the stored records.
    pub fn average(&self) -> Result<String> {
        let average = compute_average(&self.store).context("failed to compute average")?;
        Ok(average.to_string())
    }

    /// Draw the name-length histogram, replacing the previous one.
    pub fn histogram(&mut self, bins: usize) -> Result<String> {
        let outcome = render_histogram(&self.store, &mut self.chart, bins)
            .context("failed to render histogram")?;
        Ok(match (outcome, self.chart.current()) {
            (ChartOutcome::Rendered { .. }, Some(chart)) => chart.to_text(),
            _ => "No data".to_string(),
        })
    }

    /// Stored records, one per line.
    pub fn list(&self) -> Result<String> {
        let records = self.store.records().context("failed to read records")?;
        if records.is_empty() {
            return Ok("No data".to_string());
        }

        let name_width = records
            .iter()
            .map(|r| r.name.chars().count())
            .max()
            .unwrap_or(0);
        let lines: Vec<String> = records
            .iter()
            .map(|r| {
                format!(
                    "{:>4}  {:<name_width$}  {:<16}  {:>3}  {:>5}",
                    r.id, r.name, r.region, r.name_length, r.contact_length
                )
            })
            .collect();
        Ok(lines.join("\n"))
    }

    /// Build the reading report. Failing to open it is only a warning.
    pub fn report(&self) -> Result<String> {
        let source = HttpTextSource::new(
            &self.config.report.text_url,
            self.config.source.timeout_secs,
        )
        .context("failed to prepare book source")?;

        let spinner = fetch_spinner(&self.config.report.text_url);
        let generated = report::generate(&source, &self.config.report);
        spinner.finish_and_clear();
        let generated = generated.context("failed to generate reading report")?;

        let mut message = format!(
            "Report generated: {} ({}, {} paragraph(s) analyzed)",
            generated.path.display(),
            generated.analysis.title,
            generated.analysis.word_counts.len()
        );
        if let Some(warning) = generated.open_warning {
            message.push_str(&format!("\nWarning: {}", warning));
        }
        Ok(message)
    }

    /// End an interactive session: apply `clear_on_exit`, then close.
    pub fn shutdown(mut self) -> Result<()> {
        if self.config.store.clear_on_exit {
            self.chart.release();
            let removed = self
                .store
                .clear_all()
                .context("failed to clear database on exit")?;
            tracing::info!(removed, "Cleared records on exit");
        }
        self.close()
    }

    /// Release the chart and close the store, keeping all records.
    pub fn close(self) -> Result<()> {
        let App {
            store, mut chart, ..
        } = self;

        chart.release();
        store.close().context("failed to close database")?;
        Ok(())
    }
}

fn fetch_spinner(url: &str) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.set_message(format!("Downloading {}", url));
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner
}
