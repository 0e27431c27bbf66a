//! The attendance service: the operations a device or admin front-end calls.
//!
//! [`AttendanceService`] wires the configuration, event log, payroll ledger
//! and clock together. Business rejections (outside the geofence, wrong
//! state, bad credentials) come back as ordinary values; only input and
//! infrastructure problems are returned as errors.

use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::attendance::AttendanceStateMachine;
use crate::calculation::{build_weekly_report, calculate_weekly_payroll};
use crate::clock::{Clock, SystemClock};
use crate::config::TimeClockConfig;
use crate::error::{EngineError, EngineResult, TransitionViolation};
use crate::models::{
    DurationAnomaly, EmployeeSummary, EventKind, PayrollRun, PunchReceipt, PunchRequest,
    StatusSnapshot, WeekWindow, WeeklyReport,
};
use crate::store::{EventLog, InMemoryEventLog, InMemoryPayrollLedger, PayrollLedger};

/// Why a punch was turned down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PunchRejection {
    /// The device was outside the work-site radius.
    OutOfGeofence,
    /// A check-in arrived while already checked in.
    AlreadyCheckedIn,
    /// A check-out arrived while checked out.
    NotCheckedIn,
}

impl From<TransitionViolation> for PunchRejection {
    fn from(violation: TransitionViolation) -> Self {
        match violation {
            TransitionViolation::AlreadyCheckedIn => PunchRejection::AlreadyCheckedIn,
            TransitionViolation::NotCheckedIn => PunchRejection::NotCheckedIn,
        }
    }
}

/// Result of a check-in or check-out request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PunchOutcome {
    /// True when an event was appended.
    pub accepted: bool,
    /// Set when the punch was refused.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rejection: Option<PunchRejection>,
    /// Human-readable reason for a refusal.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    /// Timestamp of the appended event.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
    /// Session length, for accepted check-outs.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hours_worked: Option<Decimal>,
    /// Distance from the work site, when the location was evaluated.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distance_meters: Option<f64>,
    /// Set when the session length had to be corrected.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub anomaly: Option<DurationAnomaly>,
}

impl PunchOutcome {
    fn accepted(receipt: PunchReceipt) -> Self {
        Self {
            accepted: true,
            rejection: None,
            reason: None,
            timestamp: Some(receipt.timestamp),
            hours_worked: receipt.hours_worked,
            distance_meters: Some(receipt.distance_meters),
            anomaly: receipt.anomaly,
        }
    }

    fn rejected(rejection: PunchRejection, reason: String, distance_meters: Option<f64>) -> Self {
        Self {
            accepted: false,
            rejection: Some(rejection),
            reason: Some(reason),
            timestamp: None,
            hours_worked: None,
            distance_meters,
            anomaly: None,
        }
    }
}

/// Result of an id/PIN check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredentialCheck {
    /// True when the pair matched a directory entry.
    pub valid: bool,
    /// The matched employee.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub employee: Option<EmployeeSummary>,
}

/// Entry point for all attendance operations.
pub struct AttendanceService {
    config: TimeClockConfig,
    log: Arc<dyn EventLog>,
    ledger: Arc<dyn PayrollLedger>,
    machine: AttendanceStateMachine,
    clock: Arc<dyn Clock>,
}

impl AttendanceService {
    /// Creates a service over the given stores and clock.
    pub fn new(
        config: TimeClockConfig,
        log: Arc<dyn EventLog>,
        ledger: Arc<dyn PayrollLedger>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let machine = AttendanceStateMachine::new(Arc::clone(&log), config.site().clone());
        Self {
            config,
            log,
            ledger,
            machine,
            clock,
        }
    }

    /// Creates a service with in-memory stores and the system clock.
    pub fn in_memory(config: TimeClockConfig) -> Self {
        Self::new(
            config,
            Arc::new(InMemoryEventLog::new()),
            Arc::new(InMemoryPayrollLedger::new()),
            Arc::new(SystemClock),
        )
    }

    /// Returns the configuration.
    pub fn config(&self) -> &TimeClockConfig {
        &self.config
    }

    /// Returns the event log.
    pub fn event_log(&self) -> &Arc<dyn EventLog> {
        &self.log
    }

    /// Returns the payroll ledger.
    pub fn ledger(&self) -> &Arc<dyn PayrollLedger> {
        &self.ledger
    }

    /// Requests a check-in at the current time.
    pub fn check_in(&self, punch: &PunchRequest) -> EngineResult<PunchOutcome> {
        self.punch(punch, EventKind::CheckIn)
    }

    /// Requests a check-out at the current time.
    pub fn check_out(&self, punch: &PunchRequest) -> EngineResult<PunchOutcome> {
        self.punch(punch, EventKind::CheckOut)
    }

    /// Returns the employee's current status.
    pub fn status(&self, employee_id: &str) -> EngineResult<StatusSnapshot> {
        self.validate_employee_id(employee_id)?;
        self.ensure_known(employee_id)?;
        self.machine.current_status(employee_id)
    }

    /// Builds the employee's report for the week containing `week_of`, or
    /// the current week when not given.
    pub fn weekly_report(
        &self,
        employee_id: &str,
        week_of: Option<NaiveDate>,
    ) -> EngineResult<WeeklyReport> {
        self.validate_employee_id(employee_id)?;
        self.ensure_known(employee_id)?;
        let window = self.window_for(week_of)?;
        let events = self.log.events_for_employee(employee_id)?;
        Ok(build_weekly_report(employee_id, &events, &window))
    }

    /// Computes payroll for the week containing `week_of` (default: the
    /// current week) and records the rows in the ledger.
    ///
    /// Unpaired events and unknown employees are reported on the run, never
    /// as errors.
    pub fn run_weekly_payroll(&self, week_of: Option<NaiveDate>) -> EngineResult<PayrollRun> {
        let window = self.window_for(week_of)?;
        let events = self.log.events_in_range(window.start, window.end)?;
        let run = calculate_weekly_payroll(
            &events,
            self.config.directory(),
            &window,
            self.config.default_rate(),
        );

        let anomalies = &run.anomalies;
        if anomalies.unmatched_check_ins > 0
            || anomalies.unmatched_check_outs > 0
            || !anomalies.unknown_employees.is_empty()
        {
            warn!(
                week_start = %run.week_start,
                unmatched_check_ins = anomalies.unmatched_check_ins,
                unmatched_check_outs = anomalies.unmatched_check_outs,
                unknown_employees = anomalies.unknown_employees.len(),
                "Payroll run found unpaired or unattributed events"
            );
        }

        self.ledger.record(&run)?;
        info!(
            week_start = %run.week_start,
            rows = run.rows.len(),
            total_pay = %run.total_pay(),
            "Payroll run recorded"
        );
        Ok(run)
    }

    /// Checks an employee id and PIN against the directory.
    pub fn verify_credentials(&self, employee_id: &str, pin: &str) -> CredentialCheck {
        match self
            .config
            .directory()
            .verify(employee_id, pin, self.config.default_rate())
        {
            Ok(employee) => CredentialCheck {
                valid: true,
                employee: Some(employee),
            },
            Err(_) => CredentialCheck {
                valid: false,
                employee: None,
            },
        }
    }

    fn punch(&self, punch: &PunchRequest, kind: EventKind) -> EngineResult<PunchOutcome> {
        punch.validate()?;
        self.ensure_known(&punch.employee_id)?;

        let punch = self.with_directory_name(punch);
        let now = self.clock.now();
        let result = match kind {
            EventKind::CheckIn => self.machine.request_check_in(&punch, now),
            EventKind::CheckOut => self.machine.request_check_out(&punch, now),
        };

        match result {
            Ok(receipt) => Ok(PunchOutcome::accepted(receipt)),
            Err(error @ EngineError::OutOfGeofence { distance_meters, .. }) => Ok(
                PunchOutcome::rejected(
                    PunchRejection::OutOfGeofence,
                    error.to_string(),
                    Some(distance_meters),
                ),
            ),
            Err(error @ EngineError::InvalidTransition { violation, .. }) => Ok(
                PunchOutcome::rejected(violation.into(), error.to_string(), None),
            ),
            Err(error) => Err(error),
        }
    }

    /// Fills a blank employee name from the directory.
    fn with_directory_name(&self, punch: &PunchRequest) -> PunchRequest {
        let mut punch = punch.clone();
        if punch.employee_name.trim().is_empty() {
            if let Some(record) = self.config.directory().get(&punch.employee_id) {
                punch.employee_name = record.name.clone();
            }
        }
        punch
    }

    fn validate_employee_id(&self, employee_id: &str) -> EngineResult<()> {
        if employee_id.trim().is_empty() {
            return Err(EngineError::malformed("employee_id", "must not be empty"));
        }
        Ok(())
    }

    fn ensure_known(&self, employee_id: &str) -> EngineResult<()> {
        if self.config.attendance().require_known_employee {
            self.config.directory().require(employee_id)?;
        }
        Ok(())
    }

    fn window_for(&self, week_of: Option<NaiveDate>) -> EngineResult<WeekWindow> {
        let offset = self.config.offset();
        let week_start = self.config.payroll().week_starts_on;
        match week_of {
            Some(date) => WeekWindow::for_date(date, offset, week_start),
            None => WeekWindow::containing(self.clock.now(), offset, week_start),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::config::{AttendanceSettings, PayrollSettings, SiteConfig, WorkSite};
    use crate::models::{EmployeeRecord, WeekStartDay};
    use chrono::{Duration, TimeZone};
    use std::str::FromStr;

    const SITE_LAT: f64 = 34.0659;
    const SITE_LON: f64 = -84.6769;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn config(require_known_employee: bool) -> TimeClockConfig {
        TimeClockConfig::new(
            SiteConfig {
                site: WorkSite {
                    name: "Test Site".to_string(),
                    latitude: SITE_LAT,
                    longitude: SITE_LON,
                    geofence_radius_meters: 100.0,
                },
                payroll: PayrollSettings {
                    default_hourly_rate: dec("15.00"),
                    week_starts_on: WeekStartDay::Monday,
                    utc_offset_minutes: 0,
                },
                attendance: AttendanceSettings {
                    require_known_employee,
                },
            },
            vec![
                EmployeeRecord {
                    id: "E001".to_string(),
                    name: "Alice Moreno".to_string(),
                    pin: "1111".to_string(),
                    hourly_rate: Some(dec("20.00")),
                },
                EmployeeRecord {
                    id: "E002".to_string(),
                    name: "Ben Okafor".to_string(),
                    pin: "2222".to_string(),
                    hourly_rate: None,
                },
            ],
        )
        .unwrap()
    }

    fn service(require_known_employee: bool) -> (AttendanceService, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::new(
            Utc.with_ymd_and_hms(2026, 1, 12, 9, 0, 0).unwrap(),
        ));
        let service = AttendanceService::new(
            config(require_known_employee),
            Arc::new(InMemoryEventLog::new()),
            Arc::new(InMemoryPayrollLedger::new()),
            clock.clone(),
        );
        (service, clock)
    }

    fn on_site(employee_id: &str) -> PunchRequest {
        PunchRequest::new(employee_id, "", SITE_LAT, SITE_LON)
    }

    #[test]
    fn test_full_day_flows_into_payroll() {
        let (service, clock) = service(false);

        let check_in = service.check_in(&on_site("E001")).unwrap();
        assert!(check_in.accepted);

        clock.advance(Duration::hours(8));
        let check_out = service.check_out(&on_site("E001")).unwrap();
        assert!(check_out.accepted);
        assert_eq!(check_out.hours_worked, Some(dec("8")));

        let run = service.run_weekly_payroll(None).unwrap();
        assert_eq!(run.rows.len(), 1);
        assert_eq!(run.rows[0].total_hours, dec("8.00"));
        assert_eq!(run.rows[0].total_pay, dec("160.00"));
        assert_eq!(service.ledger().rows().unwrap().len(), 1);
    }

    #[test]
    fn test_rejections_are_values() {
        let (service, _) = service(false);

        let far = PunchRequest::new("E001", "Alice", SITE_LAT + 0.01, SITE_LON);
        let outcome = service.check_in(&far).unwrap();
        assert!(!outcome.accepted);
        assert_eq!(outcome.rejection, Some(PunchRejection::OutOfGeofence));
        assert!(outcome.distance_meters.unwrap() > 100.0);

        let outcome = service.check_out(&on_site("E001")).unwrap();
        assert!(!outcome.accepted);
        assert_eq!(outcome.rejection, Some(PunchRejection::NotCheckedIn));
        assert_eq!(outcome.reason.as_deref().map(|r| r.contains("not checked in")), Some(true));
    }

    #[test]
    fn test_blank_name_filled_from_directory() {
        let (service, _) = service(false);
        service.check_in(&on_site("E001")).unwrap();

        let events = service.event_log().events_for_employee("E001").unwrap();
        assert_eq!(events[0].employee_name, "Alice Moreno");
    }

    #[test]
    fn test_invalid_coordinates_are_errors() {
        let (service, _) = service(false);
        let bad = PunchRequest::new("E001", "Alice", 120.0, SITE_LON);
        assert!(matches!(
            service.check_in(&bad),
            Err(EngineError::MalformedRequest { .. })
        ));
    }

    #[test]
    fn test_unknown_employee_allowed_by_default() {
        let (service, _) = service(false);
        assert!(service.check_in(&on_site("E999")).unwrap().accepted);
    }

    #[test]
    fn test_unknown_employee_refused_when_required() {
        let (service, _) = service(true);
        assert!(matches!(
            service.check_in(&on_site("E999")),
            Err(EngineError::UnknownEmployee { .. })
        ));
        assert!(matches!(
            service.status("E999"),
            Err(EngineError::UnknownEmployee { .. })
        ));
    }

    #[test]
    fn test_verify_credentials() {
        let (service, _) = service(false);

        let ok = service.verify_credentials("E002", "2222");
        assert!(ok.valid);
        let employee = ok.employee.unwrap();
        assert_eq!(employee.name, "Ben Okafor");
        assert_eq!(employee.rate, dec("15.00"));

        let bad = service.verify_credentials("E002", "0000");
        assert!(!bad.valid);
        assert!(bad.employee.is_none());
        assert!(!service.verify_credentials("E404", "2222").valid);
    }

    #[test]
    fn test_weekly_report_for_explicit_week() {
        let (service, clock) = service(false);
        service.check_in(&on_site("E002")).unwrap();
        clock.advance(Duration::minutes(90));
        service.check_out(&on_site("E002")).unwrap();

        // Any date in the week selects it
        let report = service
            .weekly_report("E002", NaiveDate::from_ymd_opt(2026, 1, 15))
            .unwrap();
        assert_eq!(report.week_start, NaiveDate::from_ymd_opt(2026, 1, 12).unwrap());
        assert_eq!(report.total_hours, dec("1.50"));

        let next_week = service
            .weekly_report("E002", NaiveDate::from_ymd_opt(2026, 1, 19))
            .unwrap();
        assert!(next_week.sessions.is_empty());
    }

    #[test]
    fn test_status_reflects_last_action() {
        let (service, _) = service(false);
        service.check_in(&on_site("E001")).unwrap();

        let status = service.status("E001").unwrap();
        assert!(status.is_checked_in());
        assert_eq!(status.last_action, Some(EventKind::CheckIn));
        assert!(matches!(
            service.status(" "),
            Err(EngineError::MalformedRequest { .. })
        ));
    }

    #[test]
    fn test_payroll_rerun_appends_to_ledger() {
        let (service, clock) = service(false);
        service.check_in(&on_site("E001")).unwrap();
        clock.advance(Duration::hours(2));
        service.check_out(&on_site("E001")).unwrap();

        service.run_weekly_payroll(None).unwrap();
        service.run_weekly_payroll(None).unwrap();
        assert_eq!(service.ledger().rows().unwrap().len(), 2);
    }

    #[test]
    fn test_week_of_beyond_calendar_is_rejected_before_ledger_write() {
        let (service, _) = service(false);
        let result = service.run_weekly_payroll(Some(NaiveDate::MAX));
        assert!(matches!(
            result,
            Err(EngineError::MalformedRequest { ref field, .. }) if field == "week_of"
        ));
        assert!(service.ledger().rows().unwrap().is_empty());

        assert!(matches!(
            service.weekly_report("E001", Some(NaiveDate::MAX)),
            Err(EngineError::MalformedRequest { .. })
        ));
    }
}
