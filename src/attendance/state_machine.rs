//! The per-employee check-in/check-out state machine.
//!
//! An employee is either checked out (the initial state) or checked in. The
//! state is never stored; it is derived from the event with the greatest
//! timestamp in the log. Accepted requests append exactly one event and
//! rejected ones leave the log untouched.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use tracing::{debug, info, warn};

use crate::calculation::{check_geofence, hours_between};
use crate::config::WorkSite;
use crate::error::{EngineError, EngineResult, TransitionViolation};
use crate::models::{
    AttendanceEvent, AttendanceStatus, DurationAnomaly, EventKind, PunchReceipt, PunchRequest,
    StatusSnapshot,
};
use crate::store::EventLog;

use super::locks::EmployeeLocks;

/// Validates and records check-ins and check-outs against an event log.
pub struct AttendanceStateMachine {
    log: Arc<dyn EventLog>,
    site: WorkSite,
    locks: EmployeeLocks,
}

impl AttendanceStateMachine {
    /// Creates a state machine for `site` backed by `log`.
    pub fn new(log: Arc<dyn EventLog>, site: WorkSite) -> Self {
        Self {
            log,
            site,
            locks: EmployeeLocks::new(),
        }
    }

    /// The work site punches are checked against.
    pub fn site(&self) -> &WorkSite {
        &self.site
    }

    /// Derives the employee's status from their most recent event.
    pub fn current_status(&self, employee_id: &str) -> EngineResult<StatusSnapshot> {
        let latest = self.log.latest_for_employee(employee_id)?;
        Ok(match latest {
            Some(event) => StatusSnapshot {
                status: match event.kind {
                    EventKind::CheckIn => AttendanceStatus::CheckedIn,
                    EventKind::CheckOut => AttendanceStatus::CheckedOut,
                },
                last_action: Some(event.kind),
                last_event_time: Some(event.timestamp),
            },
            None => StatusSnapshot::default(),
        })
    }

    /// Records a check-in at `now` if the location and state allow it.
    ///
    /// # Errors
    ///
    /// - [`EngineError::OutOfGeofence`] when the punch is outside the site radius
    /// - [`EngineError::InvalidTransition`] when the employee is already checked in
    /// - [`EngineError::StorageUnavailable`] when the log cannot be read or written
    pub fn request_check_in(
        &self,
        punch: &PunchRequest,
        now: DateTime<Utc>,
    ) -> EngineResult<PunchReceipt> {
        self.punch(punch, now, EventKind::CheckIn)
    }

    /// Records a check-out at `now` if the location and state allow it.
    ///
    /// The receipt carries the hours since the open check-in. A check-out
    /// stamped before its check-in reports zero hours and a
    /// [`DurationAnomaly::NegativeDurationClamped`] flag.
    pub fn request_check_out(
        &self,
        punch: &PunchRequest,
        now: DateTime<Utc>,
    ) -> EngineResult<PunchReceipt> {
        self.punch(punch, now, EventKind::CheckOut)
    }

    fn punch(
        &self,
        punch: &PunchRequest,
        now: DateTime<Utc>,
        kind: EventKind,
    ) -> EngineResult<PunchReceipt> {
        let geofence = check_geofence(&self.site, punch.latitude, punch.longitude);
        if !geofence.within {
            debug!(
                employee_id = %punch.employee_id,
                distance_meters = geofence.distance_meters,
                %kind,
                "Punch rejected outside geofence"
            );
            return Err(EngineError::OutOfGeofence {
                distance_meters: geofence.distance_meters,
                radius_meters: self.site.geofence_radius_meters,
            });
        }

        let lock = self.locks.lock_for(&punch.employee_id);
        // The guarded data is (), so a poisoned lock is still usable
        let _guard = lock.lock().unwrap_or_else(|e| e.into_inner());

        let status = self.current_status(&punch.employee_id)?;
        let violation = match (kind, status.status) {
            (EventKind::CheckIn, AttendanceStatus::CheckedIn) => {
                Some(TransitionViolation::AlreadyCheckedIn)
            }
            (EventKind::CheckOut, AttendanceStatus::CheckedOut) => {
                Some(TransitionViolation::NotCheckedIn)
            }
            _ => None,
        };
        if let Some(violation) = violation {
            debug!(employee_id = %punch.employee_id, %violation, "Punch rejected by state");
            return Err(EngineError::InvalidTransition {
                employee_id: punch.employee_id.clone(),
                violation,
            });
        }

        let (hours_worked, anomaly) = match (kind, status.last_event_time) {
            (EventKind::CheckOut, Some(checked_in_at)) => {
                let hours = hours_between(checked_in_at, now);
                if hours < Decimal::ZERO {
                    warn!(
                        employee_id = %punch.employee_id,
                        check_in = %checked_in_at,
                        check_out = %now,
                        "Check-out precedes check-in, clamping duration to zero"
                    );
                    (
                        Some(Decimal::ZERO),
                        Some(DurationAnomaly::NegativeDurationClamped),
                    )
                } else {
                    (Some(hours), None)
                }
            }
            _ => (None, None),
        };

        self.log.append(AttendanceEvent {
            timestamp: now,
            employee_id: punch.employee_id.clone(),
            employee_name: punch.employee_name.clone(),
            kind,
            latitude: punch.latitude,
            longitude: punch.longitude,
            location_valid: true,
        })?;

        info!(
            employee_id = %punch.employee_id,
            %kind,
            distance_meters = geofence.distance_meters,
            "Punch accepted"
        );

        Ok(PunchReceipt {
            kind,
            timestamp: now,
            distance_meters: geofence.distance_meters,
            hours_worked,
            anomaly,
        })
    }
}
