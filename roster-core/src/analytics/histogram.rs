//! Equal-width frequency histograms.

/// One histogram bucket covering `[lower, upper)`; the last bucket is closed.
#[derive(Debug, Clone, PartialEq)]
pub struct Bin {
    pub lower: f64,
    pub upper: f64,
    pub count: usize,
}

/// Frequency histogram over a set of values.
#[derive(Debug, Clone, PartialEq)]
pub struct Histogram {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub bins: Vec<Bin>,
}

impl Histogram {
    /// Bucket `values` into `bin_count` equal-width bins spanning the observed
    /// range. Returns `None` when there are no values or no bins.
    ///
    /// When every value is identical the range `[v, v]` is widened to
    /// `[v - 0.5, v + 0.5]` so the bins keep a positive width.
    pub fn from_values(values: &[f64], bin_count: usize) -> Option<Self> {
        if values.is_empty() || bin_count == 0 {
            return None;
        }

        let (mut lo, mut hi) = values
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
                (lo.min(v), hi.max(v))
            });
        if lo == hi {
            lo -= 0.5;
            hi += 0.5;
        }

        let width = (hi - lo) / bin_count as f64;
        let mut bins: Vec<Bin> = (0..bin_count)
            .map(|i| Bin {
                lower: lo + width * i as f64,
                upper: if i + 1 == bin_count {
                    hi
                } else {
                    lo + width * (i + 1) as f64
                },
                count: 0,
            })
            .collect();

        for &v in values {
            let idx = (((v - lo) / width).floor() as usize).min(bin_count - 1);
            bins[idx].count += 1;
        }

        Some(Self {
            title: String::new(),
            x_label: String::new(),
            y_label: String::new(),
            bins,
        })
    }

    /// Attach a title and axis labels.
    pub fn labeled(mut self, title: &str, x_label: &str, y_label: &str) -> Self {
        self.title = title.to_string();
        self.x_label = x_label.to_string();
        self.y_label = y_label.to_string();
        self
    }

    /// Number of values counted.
    pub fn total(&self) -> usize {
        self.bins.iter().map(|b| b.count).sum()
    }

    /// Largest bin count.
    pub fn max_count(&self) -> usize {
        self.bins.iter().map(|b| b.count).max().unwrap_or(0)
    }
}
