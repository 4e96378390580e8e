//! Pass/fail rollup for reports and projects.

use crate::{Report, RunStatus};

/// A report's status.
///
/// Trusts the status the run recorded, when it recorded one — a run can
/// be flagged failed for reasons beyond errors. Otherwise the report
/// fails iff its error distribution carries any occurrence.
pub fn report_status(report: &Report) -> RunStatus {
    if let Some(status) = report.status {
        return status;
    }

    if report.error_distribution.values().any(|&count| count > 0) {
        RunStatus::Fail
    } else {
        RunStatus::Ok
    }
}

/// A project's status mirrors its most recently dated report.
///
/// A project with no reports has no status; render it as neutral, never
/// default it to OK.
pub fn project_status(reports: &[Report]) -> Option<RunStatus> {
    reports
        .iter()
        .max_by_key(|report| report.date)
        .map(report_status)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::sample_report;
    use chrono::{Duration, TimeZone, Utc};

    #[test]
    fn report_without_errors_is_ok() {
        let report = sample_report();
        assert_eq!(report_status(&report), RunStatus::Ok);
    }

    #[test]
    fn report_with_errors_fails() {
        let mut report = sample_report();
        report
            .error_distribution
            .insert("rpc error: code = Internal desc = Internal error.".to_string(), 5);
        assert_eq!(report_status(&report), RunStatus::Fail);
    }

    #[test]
    fn zero_count_error_entries_do_not_fail() {
        let mut report = sample_report();
        report.error_distribution.insert("Canceled".to_string(), 0);
        assert_eq!(report_status(&report), RunStatus::Ok);
    }

    #[test]
    fn recorded_status_is_trusted_over_derivation() {
        let mut report = sample_report();
        report.status = Some(RunStatus::Fail);
        // No errors at all, yet the run flagged itself failed.
        assert!(report.error_distribution.is_empty());
        assert_eq!(report_status(&report), RunStatus::Fail);
    }

    #[test]
    fn project_mirrors_latest_report() {
        let start = Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 0).unwrap();
        let statuses = [RunStatus::Ok, RunStatus::Fail, RunStatus::Ok];

        let mut reports: Vec<Report> = statuses
            .iter()
            .enumerate()
            .map(|(i, &status)| {
                let mut r = sample_report();
                r.id = i as u64;
                r.date = start + Duration::days(i as i64);
                r.status = Some(status);
                r
            })
            .collect();

        assert_eq!(project_status(&reports), Some(RunStatus::Ok));

        // Order on the slice does not matter, only the dates do.
        reports.swap(0, 2);
        assert_eq!(project_status(&reports), Some(RunStatus::Ok));

        reports[0].status = Some(RunStatus::Fail);
        // reports[0] now holds the latest date after the swap.
        assert_eq!(project_status(&reports), Some(RunStatus::Fail));
    }

    #[test]
    fn project_without_reports_has_no_status() {
        assert_eq!(project_status(&[]), None);
    }
}
