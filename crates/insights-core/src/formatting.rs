use std::fmt::Display;

use crate::models::{HistogramBucket, SummaryTable};

/// Format a count with thousands separators.
///
/// # Examples
///
/// ```
/// use insights_core::formatting::format_count;
///
/// assert_eq!(format_count(0), "0");
/// assert_eq!(format_count(8807), "8,807");
/// assert_eq!(format_count(1_234_567), "1,234,567");
/// ```
pub fn format_count(value: usize) -> String {
    group_thousands(&value.to_string())
}

/// Calculate `(part / whole) * 100`, rounded to `decimal_places`.
///
/// Returns `0.0` if `whole` is zero to avoid division by zero.
///
/// # Examples
///
/// ```
/// use insights_core::formatting::percentage;
///
/// assert!((percentage(50, 200, 1) - 25.0).abs() < 1e-9);
/// assert_eq!(percentage(0, 0, 2), 0.0);
/// ```
pub fn percentage(part: usize, whole: usize, decimal_places: u32) -> f64 {
    if whole == 0 {
        return 0.0;
    }
    let raw = (part as f64 / whole as f64) * 100.0;
    let factor = 10_f64.powi(decimal_places as i32);
    (raw * factor).round() / factor
}

/// Render a summary table as aligned text: one `key  count  share` line per
/// entry under a title line. An empty table renders as `(no data)`.
pub fn render_table<K: Display>(title: &str, table: &SummaryTable<K>) -> String {
    let mut out = format!("{}\n", title);
    if table.is_empty() {
        out.push_str("  (no data)\n");
        return out;
    }

    let total = table.total();
    let labels: Vec<String> = table.keys().map(|k| k.to_string()).collect();
    let width = labels.iter().map(|l| l.chars().count()).max().unwrap_or(0);

    for (label, entry) in labels.iter().zip(table.iter()) {
        out.push_str(&format!(
            "  {:<width$}  {:>8}  {:>5.1}%\n",
            label,
            format_count(entry.count),
            percentage(entry.count, total, 1),
            width = width,
        ));
    }
    out
}

/// Render a summary table as `key  count` lines, without a share column.
/// Used for series where a share of the total has no meaning.
pub fn render_counts<K: Display>(title: &str, table: &SummaryTable<K>) -> String {
    let mut out = format!("{}\n", title);
    if table.is_empty() {
        out.push_str("  (no data)\n");
        return out;
    }

    let labels: Vec<String> = table.keys().map(|k| k.to_string()).collect();
    let width = labels.iter().map(|l| l.chars().count()).max().unwrap_or(0);

    for (label, entry) in labels.iter().zip(table.iter()) {
        out.push_str(&format!(
            "  {:<width$}  {:>8}\n",
            label,
            format_count(entry.count),
            width = width,
        ));
    }
    out
}

/// Render histogram buckets as `start-end  count` lines.
pub fn render_histogram(title: &str, buckets: &[HistogramBucket]) -> String {
    let mut out = format!("{}\n", title);
    if buckets.is_empty() {
        out.push_str("  (no data)\n");
        return out;
    }
    for bucket in buckets {
        out.push_str(&format!(
            "  {:>7.1}-{:<7.1}  {:>8}\n",
            bucket.start,
            bucket.end,
            format_count(bucket.count)
        ));
    }
    out
}

// ── Internal helpers ──────────────────────────────────────────────────────────

/// Insert commas every three digits from the right of an integer string.
fn group_thousands(s: &str) -> String {
    if s.len() <= 3 {
        return s.to_string();
    }
    let chars: Vec<char> = s.chars().collect();
    let mut result = String::with_capacity(s.len() + s.len() / 3);
    let remainder = chars.len() % 3;
    for (i, &c) in chars.iter().enumerate() {
        if i != 0 && (i % 3 == remainder) {
            result.push(',');
        }
        result.push(c);
    }
    result
}

// ── Tests ──────────────────────────────────────────────────────────────────────
