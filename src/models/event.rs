//! Attendance event model.
//!
//! This module defines [`AttendanceEvent`], the only record the event log
//! stores, and [`EventKind`], the check-in/check-out discriminator.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Whether an event opens or closes a work session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventKind {
    /// The employee arrived at the work site.
    CheckIn,
    /// The employee left the work site.
    CheckOut,
}

impl std::fmt::Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EventKind::CheckIn => write!(f, "CHECK_IN"),
            EventKind::CheckOut => write!(f, "CHECK_OUT"),
        }
    }
}

/// A single geotagged check-in or check-out.
///
/// Events are immutable once appended. Their identity is the pair
/// `(employee_id, timestamp)`; timestamps are not unique across employees.
///
/// # Example
///
/// ```
/// use timeclock_engine::models::{AttendanceEvent, EventKind};
/// use chrono::{TimeZone, Utc};
///
/// let event = AttendanceEvent {
///     timestamp: Utc.with_ymd_and_hms(2026, 1, 12, 9, 0, 0).unwrap(),
///     employee_id: "E001".to_string(),
///     employee_name: "Alice Moreno".to_string(),
///     kind: EventKind::CheckIn,
///     latitude: 34.0659,
///     longitude: -84.6769,
///     location_valid: true,
/// };
/// assert!(event.is_check_in());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttendanceEvent {
    /// When the event was recorded.
    pub timestamp: DateTime<Utc>,
    /// The employee the event belongs to.
    pub employee_id: String,
    /// The employee name as submitted with the request.
    pub employee_name: String,
    /// Check-in or check-out.
    pub kind: EventKind,
    /// Latitude reported by the device.
    pub latitude: f64,
    /// Longitude reported by the device.
    pub longitude: f64,
    /// Whether the location passed the geofence check when recorded.
    pub location_valid: bool,
}

impl AttendanceEvent {
    /// Returns true if this is a check-in event.
    pub fn is_check_in(&self) -> bool {
        self.kind == EventKind::CheckIn
    }

    /// Returns true if this is a check-out event.
    pub fn is_check_out(&self) -> bool {
        self.kind == EventKind::CheckOut
    }
}
