//! Trend projection over a project's chronological report history.
//!
//! Produces the parallel series behind the "change over time" chart:
//! average, fastest, slowest, p95, p99 and rps, one point per report,
//! with every latency series in a single shared unit so a trend line
//! never switches magnitude mid-chart.

use crate::distribution::percentile_of;
use crate::format::{round_to, DurationUnit};
use crate::{Report, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// One chart point. `y` is `None` where the source report lacks the
/// metric — a gap in the line, not a zero and not a dropped index.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TrendPoint {
    pub x: DateTime<Utc>,
    pub y: Option<f64>,
}

/// Parallel per-report series for trend rendering.
///
/// All series are aligned by report index. Latency series share `unit`;
/// rps is unconverted.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendSeries {
    pub unit: DurationUnit,
    pub average: Vec<TrendPoint>,
    pub fastest: Vec<TrendPoint>,
    pub slowest: Vec<TrendPoint>,
    pub p95: Vec<TrendPoint>,
    pub p99: Vec<TrendPoint>,
    pub rps: Vec<TrendPoint>,
}

/// Project a chronological run of reports into trend series.
///
/// The input must already be sorted ascending by date — the projector
/// assumes chart order and does not sort. The shared latency unit is
/// chosen from the first report's average and applied uniformly across
/// the whole series. An empty input yields empty series.
pub fn project(reports: &[Report]) -> Result<TrendSeries> {
    let Some(first) = reports.first() else {
        return Ok(TrendSeries::default());
    };

    for report in reports {
        report.validate()?;
    }

    let unit = DurationUnit::for_nanos(first.average as f64);
    let divisor = unit.divisor();
    let scale = |nanos: u64| round_to(nanos as f64 / divisor, 2);

    let mut series = TrendSeries {
        unit,
        ..TrendSeries::default()
    };

    for report in reports {
        let x = report.date;
        series.average.push(TrendPoint {
            x,
            y: Some(scale(report.average)),
        });
        series.fastest.push(TrendPoint {
            x,
            y: Some(scale(report.fastest)),
        });
        series.slowest.push(TrendPoint {
            x,
            y: Some(scale(report.slowest)),
        });
        series.p95.push(TrendPoint {
            x,
            y: percentile_of(&report.latency_distribution, 95).map(scale),
        });
        series.p99.push(TrendPoint {
            x,
            y: percentile_of(&report.latency_distribution, 99).map(scale),
        });
        series.rps.push(TrendPoint {
            x,
            y: Some(round_to(report.rps, 2)),
        });
    }

    Ok(series)
}
