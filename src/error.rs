//! Error types for the metrics engine boundary.
//!
//! Only structurally invalid input is an error. Expected absences — a
//! report with no baseline, a percentile missing from a distribution, a
//! zero baseline value — are encoded as `None` fields in the result
//! shapes and are never raised.

use thiserror::Error;

/// Rejections for report data that would corrupt downstream math if
/// silently coerced.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MetricsError {
    #[error("report {id}: rps must be a finite non-negative number, got {rps}")]
    InvalidRps { id: u64, rps: f64 },

    #[error(
        "report {id}: duration ordering violated: fastest {fastest}ns, \
         average {average}ns, slowest {slowest}ns"
    )]
    DurationOrdering {
        id: u64,
        fastest: u64,
        average: u64,
        slowest: u64,
    },

    #[error("report {id}: latency percentile {percentage} is out of range")]
    PercentileOutOfRange { id: u64, percentage: u32 },

    #[error("report {id}: duplicate latency percentile {percentage}")]
    DuplicatePercentile { id: u64, percentage: u32 },

    #[error("report {id}: histogram frequency {frequency} outside [0, 1]")]
    FrequencyOutOfRange { id: u64, frequency: f64 },
}

pub type Result<T> = std::result::Result<T, MetricsError>;
