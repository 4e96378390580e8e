//! Distribution reshaping: percentile lookup, frequency tables and
//! histogram rows.
//!
//! These helpers flatten the map- and set-shaped parts of a report into
//! ordered sequences a table or chart can consume directly.

use crate::format::round_to;
use crate::{HistogramBucket, LatencyPercentile};
use indexmap::IndexMap;
use serde::Serialize;
use tracing::debug;

/// A label/count pair with its share of all calls.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FrequencyRow {
    pub label: String,
    pub count: u64,
    pub percent_of_total: f64,
}

/// One histogram bucket prepared for bar rendering.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HistogramRow {
    /// Bucket mark converted to milliseconds, two decimals.
    pub mark_ms: f64,
    pub count: u64,
    pub percent_of_total: f64,
}

/// Exact-match lookup of one percentile's latency, in nanoseconds.
///
/// Report producers emit a fixed percentile set (typically
/// 10/25/50/75/90/95/99); there is no interpolation between entries, and
/// an absent percentile is `None`, not an error.
pub fn percentile_of(distribution: &[LatencyPercentile], percentage: u32) -> Option<u64> {
    distribution
        .iter()
        .find(|p| p.percentage == percentage)
        .map(|p| p.latency)
}

/// Flatten a label-to-count mapping into rows with percent-of-total.
///
/// Rows follow the mapping's insertion order; callers that want an
/// opinionated order re-sort themselves. A zero total yields 0.0 percents
/// rather than a NaN or infinity escaping to the view layer.
pub fn frequency_rows(map: &IndexMap<String, u64>, total_count: u64) -> Vec<FrequencyRow> {
    if total_count == 0 && !map.is_empty() {
        debug!("frequency rows requested over a zero total; percentages suppressed");
    }

    map.iter()
        .map(|(label, &count)| FrequencyRow {
            label: label.clone(),
            count,
            percent_of_total: percent_of(count, total_count),
        })
        .collect()
}

/// Display label for a gRPC-style error string.
///
/// `rpc error: code = Internal desc = Internal error.` renders as
/// `Internal`; a label without a `code =` marker passes through unchanged.
pub fn display_label(label: &str) -> String {
    const MARKER: &str = "code =";

    match label.find(MARKER) {
        Some(start) => {
            let rest = &label[start + MARKER.len()..];
            let end = rest.find("desc").unwrap_or(rest.len());
            rest[..end].trim().to_string()
        }
        None => label.to_string(),
    }
}

/// Histogram buckets prepared for rendering: marks converted from seconds
/// to milliseconds, with each bucket's share of the report's request
/// count.
pub fn histogram_rows(histogram: &[HistogramBucket], total_count: u64) -> Vec<HistogramRow> {
    histogram
        .iter()
        .map(|b| HistogramRow {
            mark_ms: round_to(b.mark * 1000.0, 2),
            count: b.count,
            percent_of_total: percent_of(b.count, total_count),
        })
        .collect()
}

fn percent_of(count: u64, total: u64) -> f64 {
    if total == 0 {
        0.0
    } else {
        round_to(count as f64 / total as f64 * 100.0, 2)
    }
}
