//! Chart rendering with explicit release of the previous chart.
//!
//! A [`ChartSlot`] holds at most one rendered chart. Rendering into an
//! occupied slot releases the old handle through its backend before drawing
//! the new one, and dropping the slot releases whatever it still holds.

use crate::error::Result;
use crate::format::{bar, format_edge};

use super::histogram::Histogram;

/// Something that can draw a histogram and later release what it drew
pub trait ChartBackend {
    /// Resource owned by one rendered chart
    type Handle;

    fn draw(&mut self, histogram: &Histogram) -> Result<Self::Handle>;

    fn release(&mut self, handle: Self::Handle);
}

/// Holds the currently displayed chart, if any
pub struct ChartSlot<B: ChartBackend> {
    backend: B,
    current: Option<B::Handle>,
}

impl<B: ChartBackend> ChartSlot<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            current: None,
        }
    }

    /// Release the previous chart, then draw `histogram`
    pub fn render(&mut self, histogram: &Histogram) -> Result<&B::Handle> {
        self.release();
        let handle = self.backend.draw(histogram)?;
        let handle: &B::Handle = self.current.insert(handle);
        Ok(handle)
    }

    /// Release the current chart. Returns whether one was held.
    pub fn release(&mut self) -> bool {
        match self.current.take() {
            Some(handle) => {
                self.backend.release(handle);
                true
            }
            None => false,
        }
    }

    pub fn current(&self) -> Option<&B::Handle> {
        self.current.as_ref()
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }
}

impl<B: ChartBackend> Drop for ChartSlot<B> {
    fn drop(&mut self) {
        self.release();
    }
}

/// A chart drawn as text lines
#[derive(Debug, Clone, PartialEq)]
pub struct TextChart {
    lines: Vec<String>,
}

impl TextChart {
    pub fn to_text(&self) -> String {
        self.lines.join("\n")
    }
}

/// Draws histograms as horizontal bar charts
#[derive(Debug)]
pub struct TextChartBackend {
    width: usize,
    drawn: usize,
    released: usize,
}

impl TextChartBackend {
    /// `width` is the number of cells used by the tallest bar
    pub fn new(width: usize) -> Self {
        Self {
            width: width.max(1),
            drawn: 0,
            released: 0,
        }
    }

    /// Charts drawn and not yet released
    pub fn live(&self) -> usize {
        self.drawn - self.released
    }
}

impl ChartBackend for TextChartBackend {
    type Handle = TextChart;

    fn draw(&mut self, histogram: &Histogram) -> Result<TextChart> {
        let max = histogram.max_count();
        let labels: Vec<String> = histogram
            .bins
            .iter()
            .enumerate()
            .map(|(i, b)| {
                let close = if i + 1 == histogram.bins.len() { ']' } else { ')' };
                format!("[{}, {}{}", format_edge(b.lower), format_edge(b.upper), close)
            })
            .collect();
        let label_width = labels.iter().map(|l| l.chars().count()).max().unwrap_or(0);

        let mut lines = Vec::with_capacity(histogram.bins.len() + 3);
        if !histogram.title.is_empty() {
            lines.push(histogram.title.clone());
        }
        for (label, b) in labels.iter().zip(&histogram.bins) {
            lines.push(format!(
                "{:<label_width$} │{} {}",
                label,
                bar(b.count, max, self.width),
                b.count
            ));
        }
        if !histogram.x_label.is_empty() || !histogram.y_label.is_empty() {
            lines.push(format!(
                "x: {}, y: {}",
                histogram.x_label, histogram.y_label
            ));
        }

        self.drawn += 1;
        Ok(TextChart { lines })
    }

    fn release(&mut self, handle: TextChart) {
        tracing::debug!(lines = handle.lines.len(), "Releasing chart");
        self.released += 1;
    }
}
