//! Core data models for the time clock engine.
//!
//! This module contains all the domain models used throughout the engine.

mod employee;
mod event;
mod payroll;
mod punch;
mod session;
mod status;
mod week_window;

pub use employee::{EmployeeDirectory, EmployeeRecord, EmployeeSummary};
pub use event::{AttendanceEvent, EventKind};
pub use payroll::{PayrollAnomalies, PayrollRun, ReportSession, WeeklyAggregate, WeeklyReport};
pub use punch::{DurationAnomaly, PunchReceipt, PunchRequest};
pub use session::{Session, SessionAccounting};
pub use status::{AttendanceStatus, StatusSnapshot};
pub use week_window::{WeekStartDay, WeekWindow};
