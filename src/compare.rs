//! Field-by-field comparison of a report against a baseline.
//!
//! Two entry points: [`compare`] for two explicit reports, and
//! [`compare_to_previous`] for a report against its chronological
//! predecessor. Resolving which report *is* the predecessor is a lookup
//! the surrounding data layer performs; the engine only receives the
//! result.

use crate::classify::{classify, Direction, Metric};
use crate::distribution::percentile_of;
use crate::format::{round_to, DurationUnit};
use crate::{Report, Result};
use serde::Serialize;
use tracing::debug;

/// One compared metric between a current report and its baseline.
///
/// When no baseline value exists for the metric — no baseline report, or
/// the percentile is absent from the baseline's distribution — every
/// delta field is `None`: "no comparison available", never a fabricated
/// zero. When the baseline value is zero, `percent_delta` alone is `None`
/// (the division is undefined) while the remaining fields are computed.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricDelta {
    pub metric: Metric,
    pub current: f64,
    pub baseline: Option<f64>,
    pub absolute_delta: Option<f64>,
    pub percent_delta: Option<f64>,
    pub direction: Option<Direction>,
    pub favorable: Option<bool>,
}

/// A full comparison between two reports, one row per metric.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Comparison {
    pub current_id: u64,
    pub baseline_id: Option<u64>,
    pub rows: Vec<MetricDelta>,
}

/// Latency summary of two reports in one shared unit, shaped for
/// side-by-side bar rendering.
///
/// Values are joined by metric (percentiles by percentage value, never by
/// position); a metric missing on either side is a `None` gap.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonSeries {
    pub unit: DurationUnit,
    pub metrics: Vec<Metric>,
    pub current: Vec<Option<f64>>,
    pub baseline: Vec<Option<f64>>,
}

/// Compare a report against an optional baseline, row by row.
///
/// Emits one row per scalar metric (count, total, average, fastest,
/// slowest, rps) followed by one per latency percentile of the current
/// report, ascending. With no baseline every row still appears, carrying
/// only the current value.
pub fn compare(current: &Report, baseline: Option<&Report>) -> Result<Comparison> {
    current.validate()?;
    if let Some(base) = baseline {
        base.validate()?;
    }

    let mut rows = Vec::with_capacity(6 + current.latency_distribution.len());

    for (metric, value, base_value) in [
        (
            Metric::Count,
            current.count as f64,
            baseline.map(|b| b.count as f64),
        ),
        (
            Metric::Total,
            current.total as f64,
            baseline.map(|b| b.total as f64),
        ),
        (
            Metric::Average,
            current.average as f64,
            baseline.map(|b| b.average as f64),
        ),
        (
            Metric::Fastest,
            current.fastest as f64,
            baseline.map(|b| b.fastest as f64),
        ),
        (
            Metric::Slowest,
            current.slowest as f64,
            baseline.map(|b| b.slowest as f64),
        ),
        (Metric::Rps, current.rps, baseline.map(|b| b.rps)),
    ] {
        rows.push(delta_row(metric, value, base_value));
    }

    for p in current.sorted_latency() {
        let base_value = baseline
            .and_then(|b| percentile_of(&b.latency_distribution, p.percentage))
            .map(|latency| latency as f64);
        rows.push(delta_row(
            Metric::Percentile(p.percentage),
            p.latency as f64,
            base_value,
        ));
    }

    Ok(Comparison {
        current_id: current.id,
        baseline_id: baseline.map(|b| b.id),
        rows,
    })
}

/// Compare a report against its chronological predecessor.
///
/// `previous` is the most recent report of the same project dated before
/// `current`, or `None` for a project's first report; looking it up is
/// the caller's concern.
pub fn compare_to_previous(current: &Report, previous: Option<&Report>) -> Result<Comparison> {
    compare(current, previous)
}

/// Project both reports' latency summary into one shared unit for a
/// grouped bar chart.
///
/// The unit is chosen from the current report's average and applied to
/// every value on both sides, so the two bars of a metric are always
/// directly comparable.
pub fn comparison_series(current: &Report, baseline: &Report) -> Result<ComparisonSeries> {
    current.validate()?;
    baseline.validate()?;

    let unit = DurationUnit::for_nanos(current.average as f64);
    let divisor = unit.divisor();
    let scale = |latency: u64| round_to(latency as f64 / divisor, 2);

    let mut metrics = vec![Metric::Fastest, Metric::Average, Metric::Slowest];
    let mut current_values = vec![
        Some(scale(current.fastest)),
        Some(scale(current.average)),
        Some(scale(current.slowest)),
    ];
    let mut baseline_values = vec![
        Some(scale(baseline.fastest)),
        Some(scale(baseline.average)),
        Some(scale(baseline.slowest)),
    ];

    for p in current.sorted_latency() {
        metrics.push(Metric::Percentile(p.percentage));
        current_values.push(Some(scale(p.latency)));
        baseline_values.push(
            percentile_of(&baseline.latency_distribution, p.percentage).map(scale),
        );
    }

    Ok(ComparisonSeries {
        unit,
        metrics,
        current: current_values,
        baseline: baseline_values,
    })
}

fn delta_row(metric: Metric, current: f64, baseline: Option<f64>) -> MetricDelta {
    let Some(base) = baseline else {
        return MetricDelta {
            metric,
            current,
            baseline: None,
            absolute_delta: None,
            percent_delta: None,
            direction: None,
            favorable: None,
        };
    };

    let classification = classify(metric, current, base);

    // Signed percent change; the sign matches the direction. Undefined
    // against a zero baseline, which must never leak as infinity or NaN.
    let percent_delta = if base == 0.0 {
        debug!(metric = %metric, "zero baseline, percent delta suppressed");
        None
    } else {
        Some(round_to(current / base * 100.0 - 100.0, 2))
    };

    MetricDelta {
        metric,
        current,
        baseline: Some(base),
        absolute_delta: Some((current - base).abs()),
        percent_delta,
        direction: Some(classification.direction),
        favorable: Some(classification.favorable),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::sample_report;
    use crate::{LatencyPercentile, MetricsError};

    fn baseline_report() -> Report {
        let mut report = sample_report();
        report.id = 9;
        report.average = 41_877_742;
        report.slowest = 72_984_994;
        report.rps = 956.34;
        report
    }

    fn row<'a>(comparison: &'a Comparison, metric: Metric) -> &'a MetricDelta {
        comparison
            .rows
            .iter()
            .find(|r| r.metric == metric)
            .expect("metric row present")
    }

    #[test]
    fn comparison_without_baseline_never_fabricates_deltas() {
        let current = sample_report();
        let comparison = compare(&current, None).unwrap();

        assert_eq!(comparison.baseline_id, None);
        assert_eq!(comparison.rows.len(), 9);
        for r in &comparison.rows {
            assert!(r.baseline.is_none());
            assert!(r.absolute_delta.is_none());
            assert!(r.percent_delta.is_none());
            assert!(r.direction.is_none());
            assert!(r.favorable.is_none());
        }
    }

    #[test]
    fn average_improvement_scenario() {
        let current = sample_report();
        let baseline = baseline_report();
        let comparison = compare(&current, Some(&baseline)).unwrap();

        let avg = row(&comparison, Metric::Average);
        assert_eq!(avg.current, 31_877_742.0);
        assert_eq!(avg.baseline, Some(41_877_742.0));
        assert_eq!(avg.absolute_delta, Some(10_000_000.0));
        assert_eq!(avg.direction, Some(Direction::Decrease));
        assert_eq!(avg.favorable, Some(true));

        let pct = avg.percent_delta.unwrap();
        assert!((pct - -23.88).abs() < 0.01, "percent delta was {pct}");
    }

    #[test]
    fn rps_increase_is_favorable() {
        let current = sample_report();
        let baseline = baseline_report();
        let comparison = compare(&current, Some(&baseline)).unwrap();

        let rps = row(&comparison, Metric::Rps);
        assert_eq!(rps.direction, Some(Direction::Increase));
        assert_eq!(rps.favorable, Some(true));
        assert!(rps.percent_delta.unwrap() > 0.0);
    }

    #[test]
    fn percentiles_join_by_percentage_not_position() {
        let current = sample_report();
        let mut baseline = baseline_report();
        // Same percentiles, reversed on the wire, p95 missing entirely.
        baseline.latency_distribution = vec![
            LatencyPercentile {
                percentage: 99,
                latency: 70_000_000,
            },
            LatencyPercentile {
                percentage: 50,
                latency: 35_000_000,
            },
        ];

        let comparison = compare(&current, Some(&baseline)).unwrap();

        let p50 = row(&comparison, Metric::Percentile(50));
        assert_eq!(p50.baseline, Some(35_000_000.0));
        assert_eq!(p50.favorable, Some(true));

        let p99 = row(&comparison, Metric::Percentile(99));
        assert_eq!(p99.baseline, Some(70_000_000.0));

        // Absent in the baseline: a null row, not a crash.
        let p95 = row(&comparison, Metric::Percentile(95));
        assert!(p95.baseline.is_none());
        assert!(p95.favorable.is_none());
    }

    #[test]
    fn zero_baseline_suppresses_percent_only() {
        let current = sample_report();
        let mut baseline = baseline_report();
        baseline.count = 0;

        let comparison = compare(&current, Some(&baseline)).unwrap();
        let count = row(&comparison, Metric::Count);
        assert_eq!(count.percent_delta, None);
        assert_eq!(count.baseline, Some(0.0));
        assert_eq!(count.absolute_delta, Some(200.0));
        assert_eq!(count.direction, Some(Direction::Increase));
        assert_eq!(count.favorable, Some(true));
    }

    #[test]
    fn malformed_reports_are_rejected_up_front() {
        let mut current = sample_report();
        current.rps = f64::INFINITY;
        assert!(matches!(
            compare(&current, None),
            Err(MetricsError::InvalidRps { .. })
        ));

        let current = sample_report();
        let mut baseline = baseline_report();
        baseline.fastest = baseline.slowest + 1;
        assert!(matches!(
            compare(&current, Some(&baseline)),
            Err(MetricsError::DurationOrdering { .. })
        ));
    }

    #[test]
    fn previous_entry_point_matches_point_comparison() {
        let current = sample_report();
        let previous = baseline_report();

        let by_point = compare(&current, Some(&previous)).unwrap();
        let by_previous = compare_to_previous(&current, Some(&previous)).unwrap();
        assert_eq!(by_point, by_previous);

        let first_report = compare_to_previous(&current, None).unwrap();
        assert!(first_report.rows.iter().all(|r| r.baseline.is_none()));
    }

    #[test]
    fn comparison_series_shares_one_unit() {
        let current = sample_report();
        let baseline = baseline_report();

        let series = comparison_series(&current, &baseline).unwrap();
        assert_eq!(series.unit, DurationUnit::Milliseconds);
        assert_eq!(
            series.metrics[..3],
            [Metric::Fastest, Metric::Average, Metric::Slowest]
        );
        assert_eq!(series.current[1], Some(31.88));
        assert_eq!(series.baseline[1], Some(41.88));
        assert_eq!(series.current.len(), series.baseline.len());
        assert_eq!(series.current.len(), series.metrics.len());
    }

    #[test]
    fn comparison_series_gaps_for_missing_baseline_percentiles() {
        let current = sample_report();
        let mut baseline = baseline_report();
        baseline.latency_distribution.retain(|p| p.percentage != 95);

        let series = comparison_series(&current, &baseline).unwrap();
        let idx = series
            .metrics
            .iter()
            .position(|m| *m == Metric::Percentile(95))
            .unwrap();
        assert!(series.current[idx].is_some());
        assert!(series.baseline[idx].is_none());
    }
}
