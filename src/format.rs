//! Duration scaling and float formatting.
//!
//! The one source of truth for the ns/ms/s display thresholds. Report
//! tables, comparison rows and trend charts all scale durations through
//! this module rather than carrying their own copies of the cutoffs.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Magnitude a duration is displayed in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum DurationUnit {
    #[default]
    #[serde(rename = "ns")]
    Nanoseconds,
    #[serde(rename = "ms")]
    Milliseconds,
    #[serde(rename = "s")]
    Seconds,
}

impl DurationUnit {
    /// Divisor from nanoseconds into this unit.
    pub fn divisor(self) -> f64 {
        match self {
            DurationUnit::Nanoseconds => 1.0,
            DurationUnit::Milliseconds => 1_000_000.0,
            DurationUnit::Seconds => 1_000_000_000.0,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            DurationUnit::Nanoseconds => "ns",
            DurationUnit::Milliseconds => "ms",
            DurationUnit::Seconds => "s",
        }
    }

    /// Unit a nanosecond magnitude is displayed in: below 10 000 ns stays
    /// in ns, below 1000 ms in ms, otherwise seconds.
    ///
    /// Thresholds apply to the absolute value, so negative deltas scale
    /// the same way as the values they were computed from.
    pub fn for_nanos(ns: f64) -> Self {
        if ns.abs() < 10_000.0 {
            DurationUnit::Nanoseconds
        } else if (ns / 1_000_000.0).abs() < 1000.0 {
            DurationUnit::Milliseconds
        } else {
            DurationUnit::Seconds
        }
    }
}

impl fmt::Display for DurationUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A duration scaled into its display unit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Scaled {
    pub value: f64,
    pub unit: DurationUnit,
}

impl fmt::Display for Scaled {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.unit {
            DurationUnit::Nanoseconds => write!(f, "{} ns", self.value),
            unit => write!(f, "{:.2} {}", self.value, unit),
        }
    }
}

/// Scale a nanosecond duration for display.
///
/// Nanosecond values pass through unrounded; milliseconds and seconds are
/// rounded to two decimals.
pub fn scale_duration(ns: f64) -> Scaled {
    let unit = DurationUnit::for_nanos(ns);
    let value = match unit {
        DurationUnit::Nanoseconds => ns,
        _ => round_to(ns / unit.divisor(), 2),
    };
    Scaled { value, unit }
}

/// Round to `precision` decimal places.
pub fn round_to(value: f64, precision: u32) -> f64 {
    let factor = 10f64.powi(precision as i32);
    (value * factor).round() / factor
}

/// Round to the default two decimals used for rps and percent cells.
pub fn format_float(value: f64) -> f64 {
    round_to(value, 2)
}
