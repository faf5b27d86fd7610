//! Aggregates and charts over the record store
//!
//! Provides:
//! - Mean contact length, with an explicit "no data" state
//! - Name-length frequency histogram rendered into a [`ChartSlot`]
//!
//! Both read straight from the [`Store`]; nothing is cached between calls.

pub mod chart;
pub mod histogram;

pub use chart::{ChartBackend, ChartSlot, TextChart, TextChartBackend};
pub use histogram::{Bin, Histogram};

use std::fmt;

use crate::error::Result;
use crate::format::{format_two_decimals, round2};
use crate::store::Store;
use crate::types::NumericColumn;

/// Default number of histogram bins
pub const DEFAULT_BINS: usize = 5;

/// Mean contact length, or the empty-store state
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Average {
    NoData,
    /// Mean rounded to two decimals
    Mean(f64),
}

impl fmt::Display for Average {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Average::NoData => write!(f, "No data"),
            Average::Mean(v) => write!(f, "Average email length: {}", format_two_decimals(*v)),
        }
    }
}

/// Result of a histogram request
#[derive(Debug, PartialEq)]
pub enum ChartOutcome {
    /// The store is empty; nothing was drawn
    NoData,
    /// A chart was drawn into the slot over this many values
    Rendered { values: usize },
}

/// Mean of the contact lengths in the store
pub fn compute_average(store: &Store) -> Result<Average> {
    Ok(match store.average(NumericColumn::ContactLength)? {
        Some(avg) => Average::Mean(round2(avg)),
        None => Average::NoData,
    })
}

/// Build the name-length histogram from the current store contents.
///
/// Returns `None` when the store is empty.
pub fn name_length_histogram(store: &Store, bins: usize) -> Result<Option<Histogram>> {
    if store.average(NumericColumn::ContactLength)?.is_none() {
        return Ok(None);
    }

    let mut lengths = Vec::new();
    store
        .values::<i64>(NumericColumn::NameLength)
        .try_for_each(|len| lengths.push(len as f64))?;
    Ok(Histogram::from_values(&lengths, bins)
        .map(|h| h.labeled("Distribution of name lengths", "length", "frequency")))
}

/// Render the name-length histogram into `slot`.
///
/// Any chart already in the slot is released first, including when the store
/// turns out to be empty.
pub fn render_histogram<B: ChartBackend>(
    store: &Store,
    slot: &mut ChartSlot<B>,
    bins: usize,
) -> Result<ChartOutcome> {
    slot.release();

    let Some(histogram) = name_length_histogram(store, bins)? else {
        return Ok(ChartOutcome::NoData);
    };

    slot.render(&histogram)?;
    tracing::info!(values = histogram.total(), bins, "Histogram rendered");

    Ok(ChartOutcome::Rendered {
        values: histogram.total(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::NewRecord;

    #[test]
    fn test_average_no_data() {
        let store = Store::open_in_memory().unwrap();
        let avg = compute_average(&store).unwrap();
        assert_eq!(avg, Average::NoData);
        assert_eq!(avg.to_string(), "No data");
    }

    #[test]
    fn test_average_rounded() {
        let store = Store::open_in_memory().unwrap();
        store.insert(&NewRecord::with_lengths("A", "X", 1, 10.0)).unwrap();
        store.insert(&NewRecord::with_lengths("B", "X", 1, 10.0)).unwrap();
        store.insert(&NewRecord::with_lengths("C", "X", 1, 11.0)).unwrap();

        let avg = compute_average(&store).unwrap();
        assert_eq!(avg, Average::Mean(10.33));
        assert_eq!(avg.to_string(), "Average email length: 10.33");
    }

    #[test]
    fn test_histogram_on_empty_store_draws_nothing() {
        let store = Store::open_in_memory().unwrap();
        let mut slot = ChartSlot::new(TextChartBackend::new(20));

        let outcome = render_histogram(&store, &mut slot, DEFAULT_BINS).unwrap();
        assert_eq!(outcome, ChartOutcome::NoData);
        assert!(slot.current().is_none());
    }

    #[test]
    fn test_histogram_counts_every_row() {
        let store = Store::open_in_memory().unwrap();
        for (name, len) in [("Anna", 4), ("Bob", 3), ("Charlie", 7), ("Dora", 4)] {
            store
                .insert(&NewRecord::with_lengths(name, "Paris", len, 12.0))
                .unwrap();
        }
        let mut slot = ChartSlot::new(TextChartBackend::new(20));

        let outcome = render_histogram(&store, &mut slot, DEFAULT_BINS).unwrap();
        assert_eq!(outcome, ChartOutcome::Rendered { values: 4 });
        let text = slot.current().unwrap().to_text();
        assert!(text.starts_with("Distribution of name lengths"));
    }

    #[test]
    fn test_rerender_after_clear_releases_chart() {
        let store = Store::open_in_memory().unwrap();
        store.insert(&NewRecord::with_lengths("Anna", "Paris", 4, 12.0)).unwrap();
        let mut slot = ChartSlot::new(TextChartBackend::new(20));

        render_histogram(&store, &mut slot, DEFAULT_BINS).unwrap();
        assert_eq!(slot.backend().live(), 1);

        store.clear_all().unwrap();
        let outcome = render_histogram(&store, &mut slot, DEFAULT_BINS).unwrap();
        assert_eq!(outcome, ChartOutcome::NoData);
        assert_eq!(slot.backend().live(), 0);
    }
}
