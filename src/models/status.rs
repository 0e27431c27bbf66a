//! Attendance status derived from the event log.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::EventKind;

/// Where an employee currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AttendanceStatus {
    /// No open session. This is the initial state.
    #[default]
    CheckedOut,
    /// A session is open.
    CheckedIn,
}

/// The current status of an employee derived from the event log.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StatusSnapshot {
    /// Derived status.
    pub status: AttendanceStatus,
    /// Kind of the most recent event, if any.
    pub last_action: Option<EventKind>,
    /// Timestamp of the most recent event, if any.
    pub last_event_time: Option<DateTime<Utc>>,
}

impl StatusSnapshot {
    /// Returns true if the employee has an open session.
    pub fn is_checked_in(&self) -> bool {
        self.status == AttendanceStatus::CheckedIn
    }
}
