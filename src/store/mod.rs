//! Persistence for attendance events and payroll rows.

mod event_log;
mod json_lines;
mod payroll_ledger;

pub use event_log::{EventLog, InMemoryEventLog};
pub use json_lines::{JsonLinesEventLog, JsonLinesPayrollLedger};
pub use payroll_ledger::{InMemoryPayrollLedger, PayrollLedger};
