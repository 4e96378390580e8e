//! Metric polarity and change classification.
//!
//! The single polarity table consulted by every comparison view. Latency
//! metrics improve when they go down, throughput improves when it goes
//! up; duplicating that judgment per view is the bug class this module
//! exists to remove.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A comparable report metric.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Metric {
    Count,
    Total,
    Average,
    Fastest,
    Slowest,
    Rps,
    /// A latency percentile, e.g. `Percentile(95)` for p95.
    Percentile(u32),
}

impl Metric {
    /// Whether a decrease in this metric is an improvement.
    ///
    /// Durations and percentiles improve downward; request count and rps
    /// improve upward.
    pub fn lower_is_better(self) -> bool {
        !matches!(self, Metric::Count | Metric::Rps)
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Metric::Count => f.write_str("count"),
            Metric::Total => f.write_str("total"),
            Metric::Average => f.write_str("average"),
            Metric::Fastest => f.write_str("fastest"),
            Metric::Slowest => f.write_str("slowest"),
            Metric::Rps => f.write_str("rps"),
            Metric::Percentile(p) => write!(f, "p{p}"),
        }
    }
}

impl Serialize for Metric {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Which way a metric moved between two reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Increase,
    Decrease,
}

/// Direction of a change and whether that direction is an improvement
/// for the metric in question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Classification {
    pub direction: Direction,
    pub favorable: bool,
}

/// Classify a metric's movement from `baseline` to `current`.
///
/// A zero delta is always favorable: no movement is no regression.
pub fn classify(metric: Metric, current: f64, baseline: f64) -> Classification {
    let delta = current - baseline;
    let direction = if delta > 0.0 {
        Direction::Increase
    } else {
        Direction::Decrease
    };
    let favorable = if metric.lower_is_better() {
        delta <= 0.0
    } else {
        delta >= 0.0
    };

    Classification {
        direction,
        favorable,
    }
}
