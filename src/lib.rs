//! Pulseboard report metrics engine
//!
//! This crate holds the pure computations behind the Pulseboard dashboard
//! for gRPC load-test results. It includes:
//! - Duration scaling and float formatting shared by every view
//! - Metric polarity classification (is a change good or bad?)
//! - Field-by-field comparison of a report against a baseline or its
//!   chronological predecessor
//! - Distribution reshaping (latency percentiles, status/error code
//!   frequencies, histogram buckets)
//! - Trend series projection over a project's report history
//! - Pass/fail status rollup for reports and projects
//!
//! The engine performs no I/O and owns no state: report records are
//! borrowed for the duration of a call and every result is plain data for
//! whatever renderer or exporter sits on top.

pub mod classify;
pub mod compare;
pub mod distribution;
pub mod error;
pub mod format;
pub mod status;
pub mod timeseries;

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

pub use error::{MetricsError, Result};

/// Outcome of a single load-test run, or of a project's latest run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunStatus {
    #[serde(alias = "OK")]
    Ok,
    #[serde(alias = "FAIL")]
    Fail,
}

/// One entry of a report's latency distribution: the latency below which
/// `percentage` percent of requests completed.
///
/// Unordered on the wire; consumers that need ordered output go through
/// [`Report::sorted_latency`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LatencyPercentile {
    pub percentage: u32,
    /// Latency in nanoseconds.
    pub latency: u64,
}

/// One latency histogram bucket, in ascending bucket order.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HistogramBucket {
    /// Bucket mark in seconds.
    pub mark: f64,
    pub count: u64,
    /// Share of all requests falling into this bucket, in `[0, 1]`.
    pub frequency: f64,
}

/// A single completed load-test run as recorded by the test executor.
///
/// Immutable snapshot: the engine never mutates a report. All durations
/// are nanoseconds, with `fastest <= average <= slowest`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub id: u64,
    /// Owning project, by id only; the engine never follows the reference.
    #[serde(alias = "projectID")]
    pub project_id: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_reason: Option<String>,
    pub date: DateTime<Utc>,
    /// Total requests issued.
    pub count: u64,
    pub total: u64,
    pub average: u64,
    pub fastest: u64,
    pub slowest: u64,
    pub rps: f64,
    /// Pass/fail as recorded by the run; derived by the status rollup
    /// when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<RunStatus>,
    #[serde(default)]
    pub latency_distribution: Vec<LatencyPercentile>,
    #[serde(default)]
    pub status_code_distribution: IndexMap<String, u64>,
    #[serde(default)]
    pub error_distribution: IndexMap<String, u64>,
    #[serde(default)]
    pub histogram: Vec<HistogramBucket>,
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub tags: IndexMap<String, String>,
    /// Run options as recorded by the executor, passed through untouched.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<serde_json::Value>,
}

impl Report {
    /// Check the report for structurally invalid data.
    ///
    /// Expected absences (missing baselines, missing percentiles) are not
    /// errors; this only rejects values that would corrupt downstream
    /// math: non-finite rps, violated duration ordering, out-of-range or
    /// duplicate percentiles, histogram frequencies outside `[0, 1]`.
    pub fn validate(&self) -> Result<()> {
        if !self.rps.is_finite() || self.rps < 0.0 {
            return Err(MetricsError::InvalidRps {
                id: self.id,
                rps: self.rps,
            });
        }

        if self.fastest > self.average || self.average > self.slowest {
            return Err(MetricsError::DurationOrdering {
                id: self.id,
                fastest: self.fastest,
                average: self.average,
                slowest: self.slowest,
            });
        }

        let mut seen = Vec::with_capacity(self.latency_distribution.len());
        for p in &self.latency_distribution {
            if p.percentage > 100 {
                return Err(MetricsError::PercentileOutOfRange {
                    id: self.id,
                    percentage: p.percentage,
                });
            }
            if seen.contains(&p.percentage) {
                return Err(MetricsError::DuplicatePercentile {
                    id: self.id,
                    percentage: p.percentage,
                });
            }
            seen.push(p.percentage);
        }

        for b in &self.histogram {
            if !b.frequency.is_finite() || !(0.0..=1.0).contains(&b.frequency) {
                return Err(MetricsError::FrequencyOutOfRange {
                    id: self.id,
                    frequency: b.frequency,
                });
            }
        }

        Ok(())
    }

    /// Latency distribution sorted ascending by percentage.
    pub fn sorted_latency(&self) -> Vec<LatencyPercentile> {
        let mut sorted = self.latency_distribution.clone();
        sorted.sort_by_key(|p| p.percentage);
        sorted
    }
}

/// A named grouping of reports tracked over time.
///
/// The engine only reads a project and derives its status from its
/// reports; creation and persistence live elsewhere.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<RunStatus>,
}
