//! Request types for the time clock API.
//!
//! Every call is a `POST /` whose JSON body names the operation in an
//! `action` field; the remaining fields depend on the action.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::PunchRequest;

/// Body of `POST /`, tagged by `action`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum ActionRequest {
    /// Start a session.
    CheckIn(PunchPayload),
    /// End the open session.
    CheckOut(PunchPayload),
    /// Check an employee id and PIN.
    VerifyEmployee(VerifyPayload),
    /// Report whether an employee is checked in.
    GetStatus(EmployeePayload),
    /// One employee's sessions for a week.
    GetWeeklyReport(ReportPayload),
    /// Compute and record payroll for a week.
    RunWeeklyPayroll(PayrollPayload),
}

impl ActionRequest {
    /// The wire name of the action, for logging.
    pub fn name(&self) -> &'static str {
        match self {
            ActionRequest::CheckIn(_) => "checkIn",
            ActionRequest::CheckOut(_) => "checkOut",
            ActionRequest::VerifyEmployee(_) => "verifyEmployee",
            ActionRequest::GetStatus(_) => "getStatus",
            ActionRequest::GetWeeklyReport(_) => "getWeeklyReport",
            ActionRequest::RunWeeklyPayroll(_) => "runWeeklyPayroll",
        }
    }
}

/// Location and identity sent with a check-in or check-out.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PunchPayload {
    /// The employee punching.
    pub employee_id: String,
    /// Name shown on the device; filled from the directory when blank.
    #[serde(default)]
    pub employee_name: String,
    /// Device latitude in degrees.
    pub latitude: f64,
    /// Device longitude in degrees.
    pub longitude: f64,
}

/// Credentials for `verifyEmployee`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyPayload {
    /// Employee id.
    pub employee_id: String,
    /// Employee PIN.
    pub pin: String,
}

/// Identifies a single employee.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeePayload {
    /// Employee id.
    pub employee_id: String,
}

/// Parameters for `getWeeklyReport`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportPayload {
    /// Employee id.
    pub employee_id: String,
    /// Any local date in the wanted week; defaults to the current week.
    #[serde(default)]
    pub week_of: Option<NaiveDate>,
}

/// Parameters for `runWeeklyPayroll`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PayrollPayload {
    /// Any local date in the wanted week; defaults to the current week.
    #[serde(default)]
    pub week_of: Option<NaiveDate>,
}

impl From<PunchPayload> for PunchRequest {
    fn from(payload: PunchPayload) -> Self {
        PunchRequest {
            employee_id: payload.employee_id,
            employee_name: payload.employee_name,
            latitude: payload.latitude,
            longitude: payload.longitude,
        }
    }
}
