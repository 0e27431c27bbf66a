//! Weekly payroll calculation.
//!
//! A payroll run groups the week's events by employee, pairs them with the
//! time accountant, and multiplies each employee's total hours by their rate.
//! Messy history never aborts a run: unmatched events and employees missing
//! from the directory are reported as anomalies instead.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use tracing::debug;

use crate::models::{
    AttendanceEvent, EmployeeDirectory, PayrollAnomalies, PayrollRun, WeekWindow, WeeklyAggregate,
};

use super::time_accounting::account_window;

/// Decimal places used for reported hours and pay.
pub const REPORTING_DECIMAL_PLACES: u32 = 2;

/// Computes the payroll rows for one week.
///
/// # Arguments
///
/// * `events` - Events for any employees; those outside `window` are ignored
/// * `directory` - Employee names and rates
/// * `window` - The week to pay
/// * `default_rate` - Rate for employees with no rate (or a zero rate)
///
/// # Returns
///
/// A [`PayrollRun`] with one row per known employee that has at least one
/// session, ordered by employee id. Hours are rounded to two places; pay is
/// computed from the unrounded hours and then rounded.
///
/// # Example
///
/// ```
/// use timeclock_engine::calculation::calculate_weekly_payroll;
/// use timeclock_engine::models::{
///     AttendanceEvent, EmployeeDirectory, EmployeeRecord, EventKind, WeekStartDay, WeekWindow,
/// };
/// use chrono::{FixedOffset, NaiveDate, TimeZone, Utc};
/// use rust_decimal::Decimal;
///
/// let directory = EmployeeDirectory::new(vec![EmployeeRecord {
///     id: "E001".to_string(),
///     name: "Alice".to_string(),
///     pin: "1111".to_string(),
///     hourly_rate: Some(Decimal::new(20, 0)),
/// }]);
/// let punch = |h: u32, kind: EventKind| AttendanceEvent {
///     timestamp: Utc.with_ymd_and_hms(2026, 1, 12, h, 0, 0).unwrap(),
///     employee_id: "E001".to_string(),
///     employee_name: "Alice".to_string(),
///     kind,
///     latitude: 0.0,
///     longitude: 0.0,
///     location_valid: true,
/// };
/// let window = WeekWindow::for_date(
///     NaiveDate::from_ymd_opt(2026, 1, 12).unwrap(),
///     FixedOffset::east_opt(0).unwrap(),
///     WeekStartDay::Monday,
/// )
/// .unwrap();
///
/// let run = calculate_weekly_payroll(
///     &[punch(9, EventKind::CheckIn), punch(17, EventKind::CheckOut)],
///     &directory,
///     &window,
///     Decimal::new(15, 0),
/// );
/// assert_eq!(run.rows[0].total_pay, Decimal::new(160, 0));
/// ```
pub fn calculate_weekly_payroll(
    events: &[AttendanceEvent],
    directory: &EmployeeDirectory,
    window: &WeekWindow,
    default_rate: Decimal,
) -> PayrollRun {
    let mut by_employee: BTreeMap<&str, Vec<AttendanceEvent>> = BTreeMap::new();
    for event in events.iter().filter(|e| window.contains(e.timestamp)) {
        by_employee
            .entry(event.employee_id.as_str())
            .or_default()
            .push(event.clone());
    }

    let mut rows = Vec::new();
    let mut anomalies = PayrollAnomalies::default();

    for (employee_id, employee_events) in by_employee {
        let accounting = account_window(&employee_events, window);
        anomalies.unmatched_check_ins += accounting.unmatched_check_ins;
        anomalies.unmatched_check_outs += accounting.unmatched_check_outs;

        if !accounting.has_sessions() {
            continue;
        }

        let Some(record) = directory.get(employee_id) else {
            debug!(employee_id, "Skipping payroll for employee missing from directory");
            anomalies.unknown_employees.push(employee_id.to_string());
            continue;
        };

        let hours = accounting.total_hours();
        let rate = record.effective_rate(default_rate);

        rows.push(WeeklyAggregate {
            week_start: window.week_start,
            employee_id: record.id.clone(),
            name: record.name.clone(),
            total_hours: hours.round_dp(REPORTING_DECIMAL_PLACES),
            rate,
            total_pay: (hours * rate).round_dp(REPORTING_DECIMAL_PLACES),
        });
    }

    PayrollRun {
        week_start: window.week_start,
        rows,
        anomalies,
    }
}
