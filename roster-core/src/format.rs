//! Formatting helpers shared by the chart and report renderers.

/// Round to two decimal places.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Format a value with two decimals (e.g., "12.00").
pub fn format_two_decimals(value: f64) -> String {
    format!("{:.2}", value)
}

/// A horizontal bar scaled so that `max` fills `width` characters.
///
/// Non-zero counts always get at least one cell.
pub fn bar(count: usize, max: usize, width: usize) -> String {
    if count == 0 || max == 0 || width == 0 {
        return String::new();
    }
    let cells = (count * width + max - 1) / max;
    "█".repeat(cells.clamp(1, width))
}

/// Format a bin edge, dropping the fraction for whole numbers.
pub fn format_edge(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{}", value as i64)
    } else {
        format!("{:.1}", value)
    }
}
