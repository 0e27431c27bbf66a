//! Check-in/check-out requests and receipts.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

use super::EventKind;

/// A check-in or check-out as submitted by a device.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PunchRequest {
    /// The employee punching.
    pub employee_id: String,
    /// The employee name shown on the device.
    pub employee_name: String,
    /// Device latitude in degrees.
    pub latitude: f64,
    /// Device longitude in degrees.
    pub longitude: f64,
}

impl PunchRequest {
    /// Creates a punch request.
    pub fn new(
        employee_id: impl Into<String>,
        employee_name: impl Into<String>,
        latitude: f64,
        longitude: f64,
    ) -> Self {
        Self {
            employee_id: employee_id.into(),
            employee_name: employee_name.into(),
            latitude,
            longitude,
        }
    }

    /// Rejects requests the geofence math cannot meaningfully evaluate.
    ///
    /// # Example
    ///
    /// ```
    /// use timeclock_engine::models::PunchRequest;
    ///
    /// assert!(PunchRequest::new("E001", "Alice", 34.0, -84.0).validate().is_ok());
    /// assert!(PunchRequest::new("E001", "Alice", 91.0, -84.0).validate().is_err());
    /// assert!(PunchRequest::new("", "Alice", 34.0, -84.0).validate().is_err());
    /// ```
    pub fn validate(&self) -> EngineResult<()> {
        if self.employee_id.trim().is_empty() {
            return Err(EngineError::malformed("employee_id", "must not be empty"));
        }
        if !self.latitude.is_finite() || !(-90.0..=90.0).contains(&self.latitude) {
            return Err(EngineError::malformed(
                "latitude",
                format!("{} is not between -90 and 90", self.latitude),
            ));
        }
        if !self.longitude.is_finite() || !(-180.0..=180.0).contains(&self.longitude) {
            return Err(EngineError::malformed(
                "longitude",
                format!("{} is not between -180 and 180", self.longitude),
            ));
        }
        Ok(())
    }
}

/// Irregularities detected while accepting a punch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DurationAnomaly {
    /// The check-out time preceded the check-in; hours were clamped to zero.
    NegativeDurationClamped,
}

/// Proof that a punch was accepted and appended.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PunchReceipt {
    /// Check-in or check-out.
    pub kind: EventKind,
    /// The timestamp stored with the event.
    pub timestamp: DateTime<Utc>,
    /// Distance from the work site at the time of the punch.
    pub distance_meters: f64,
    /// Session length for check-outs, never negative.
    pub hours_worked: Option<Decimal>,
    /// Set when the session length had to be corrected.
    pub anomaly: Option<DurationAnomaly>,
}
