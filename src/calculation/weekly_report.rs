//! Per-employee weekly report.

use crate::models::{AttendanceEvent, ReportSession, WeekWindow, WeeklyReport};

use super::payroll::REPORTING_DECIMAL_PLACES;
use super::time_accounting::account_window;

/// Builds an employee's report for one week.
///
/// Only events belonging to `employee_id` and falling inside `window` are
/// considered. Session dates and times are shown in the window's offset.
pub fn build_weekly_report(
    employee_id: &str,
    events: &[AttendanceEvent],
    window: &WeekWindow,
) -> WeeklyReport {
    let own: Vec<AttendanceEvent> = events
        .iter()
        .filter(|e| e.employee_id == employee_id)
        .cloned()
        .collect();
    let accounting = account_window(&own, window);

    let sessions = accounting
        .sessions
        .iter()
        .map(|s| {
            let check_in = s.check_in.with_timezone(&window.offset);
            let check_out = s.check_out.with_timezone(&window.offset);
            ReportSession {
                date: check_in.date_naive(),
                check_in: check_in.time(),
                check_out: check_out.time(),
                hours: s.duration_hours.round_dp(REPORTING_DECIMAL_PLACES),
            }
        })
        .collect();

    WeeklyReport {
        employee_id: employee_id.to_string(),
        week_start: window.week_start,
        total_hours: accounting.total_hours().round_dp(REPORTING_DECIMAL_PLACES),
        sessions,
        unmatched_check_ins: accounting.unmatched_check_ins,
        unmatched_check_outs: accounting.unmatched_check_outs,
    }
}
