//! Derived work sessions.
//!
//! Sessions are never stored; they are rebuilt from the event log each time
//! they are needed.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One matched check-in/check-out pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// The employee who worked the session.
    pub employee_id: String,
    /// Timestamp of the check-in.
    pub check_in: DateTime<Utc>,
    /// Timestamp of the check-out.
    pub check_out: DateTime<Utc>,
    /// Elapsed time in hours, unrounded.
    pub duration_hours: Decimal,
}

/// The sessions recovered from one employee's events, plus anomaly counts.
///
/// Unmatched events are not errors; they are counted here so that reports
/// and payroll runs can surface them without failing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionAccounting {
    /// Matched sessions in chronological order.
    pub sessions: Vec<Session>,
    /// Check-ins that were superseded by a later check-in or never closed.
    pub unmatched_check_ins: u32,
    /// Check-outs with no open check-in before them.
    pub unmatched_check_outs: u32,
}

impl SessionAccounting {
    /// Sum of all session durations.
    pub fn total_hours(&self) -> Decimal {
        self.sessions.iter().map(|s| s.duration_hours).sum()
    }

    /// Returns true when at least one session was matched.
    pub fn has_sessions(&self) -> bool {
        !self.sessions.is_empty()
    }
}
