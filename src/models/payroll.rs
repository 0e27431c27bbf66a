//! Weekly payroll and report models.
//!
//! This module contains the outputs of a payroll run ([`PayrollRun`] and its
//! [`WeeklyAggregate`] rows) and of a per-employee [`WeeklyReport`].

use chrono::{NaiveDate, NaiveTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One employee's totals for one week.
///
/// # Example
///
/// ```
/// use timeclock_engine::models::WeeklyAggregate;
/// use chrono::NaiveDate;
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// let row = WeeklyAggregate {
///     week_start: NaiveDate::from_ymd_opt(2026, 1, 12).unwrap(),
///     employee_id: "E001".to_string(),
///     name: "Alice Moreno".to_string(),
///     total_hours: Decimal::from_str("8.00").unwrap(),
///     rate: Decimal::from_str("20.00").unwrap(),
///     total_pay: Decimal::from_str("160.00").unwrap(),
/// };
/// assert_eq!(row.total_hours * row.rate, Decimal::from_str("160.0000").unwrap());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeeklyAggregate {
    /// Local date of the first day of the week.
    pub week_start: NaiveDate,
    /// The employee the row is for.
    pub employee_id: String,
    /// Employee name from the directory.
    pub name: String,
    /// Hours worked, rounded to two decimal places.
    pub total_hours: Decimal,
    /// Hourly rate applied (default substituted when unset).
    pub rate: Decimal,
    /// Pay for the week, rounded to two decimal places.
    pub total_pay: Decimal,
}

/// Data-quality findings collected during a payroll run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayrollAnomalies {
    /// Check-ins in the window that never paired.
    pub unmatched_check_ins: u32,
    /// Check-outs in the window with no preceding check-in.
    pub unmatched_check_outs: u32,
    /// Employees with sessions but no directory entry; they are not paid.
    pub unknown_employees: Vec<String>,
}

/// The result of one payroll run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayrollRun {
    /// Local date of the first day of the week.
    pub week_start: NaiveDate,
    /// One row per paid employee, ordered by employee id.
    pub rows: Vec<WeeklyAggregate>,
    /// Anything the run skipped or could not pair.
    pub anomalies: PayrollAnomalies,
}

impl PayrollRun {
    /// Sum of pay across all rows.
    pub fn total_pay(&self) -> Decimal {
        self.rows.iter().map(|r| r.total_pay).sum()
    }
}

/// One session as shown on a weekly report, in local time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportSession {
    /// Local date of the check-in.
    pub date: NaiveDate,
    /// Local time of the check-in.
    pub check_in: NaiveTime,
    /// Local time of the check-out.
    pub check_out: NaiveTime,
    /// Session hours, rounded to two decimal places.
    pub hours: Decimal,
}

/// An employee's sessions and total hours for one week.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeeklyReport {
    /// The employee the report is for.
    pub employee_id: String,
    /// Local date of the first day of the week.
    pub week_start: NaiveDate,
    /// Hours worked, rounded to two decimal places.
    pub total_hours: Decimal,
    /// Matched sessions in chronological order.
    pub sessions: Vec<ReportSession>,
    /// Check-ins in the window that never paired.
    pub unmatched_check_ins: u32,
    /// Check-outs in the window with no preceding check-in.
    pub unmatched_check_outs: u32,
}
