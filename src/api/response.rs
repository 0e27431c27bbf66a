//! Response types for the time clock API.
//!
//! This module defines the JSON bodies returned by the action dispatcher and
//! the mapping from engine errors to HTTP statuses.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::EngineError;
use crate::models::{DurationAnomaly, EventKind, StatusSnapshot};
use crate::service::{PunchOutcome, PunchRejection};

/// API error response structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    /// Error code for programmatic handling.
    pub code: String,
    /// Human-readable error message.
    pub message: String,
    /// Optional details about the error.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    /// Creates a new API error with details.
    pub fn with_details(
        code: impl Into<String>,
        message: impl Into<String>,
        details: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: Some(details.into()),
        }
    }

    /// Creates a validation error response.
    pub fn validation_error(message: impl Into<String>) -> Self {
        Self::new("VALIDATION_ERROR", message)
    }

    /// Creates a malformed JSON error response.
    pub fn malformed_json(message: impl Into<String>) -> Self {
        Self::new("MALFORMED_JSON", message)
    }
}

/// API error with HTTP status code.
pub struct ApiErrorResponse {
    /// The HTTP status code.
    pub status: StatusCode,
    /// The error body.
    pub error: ApiError,
}

impl IntoResponse for ApiErrorResponse {
    fn into_response(self) -> Response {
        (self.status, Json(self.error)).into_response()
    }
}

impl From<EngineError> for ApiErrorResponse {
    fn from(error: EngineError) -> Self {
        let message = error.to_string();
        match error {
            EngineError::OutOfGeofence { .. } => ApiErrorResponse {
                status: StatusCode::FORBIDDEN,
                error: ApiError::new("OUT_OF_GEOFENCE", message),
            },
            EngineError::InvalidTransition { .. } => ApiErrorResponse {
                status: StatusCode::CONFLICT,
                error: ApiError::new("INVALID_TRANSITION", message),
            },
            EngineError::InvalidCredentials => ApiErrorResponse {
                status: StatusCode::UNAUTHORIZED,
                error: ApiError::new("INVALID_CREDENTIALS", message),
            },
            EngineError::UnknownEmployee { employee_id } => ApiErrorResponse {
                status: StatusCode::NOT_FOUND,
                error: ApiError::with_details(
                    "UNKNOWN_EMPLOYEE",
                    message,
                    format!("Employee '{}' is not in the directory", employee_id),
                ),
            },
            EngineError::MalformedRequest { field, .. } => ApiErrorResponse {
                status: StatusCode::BAD_REQUEST,
                error: ApiError::with_details(
                    "VALIDATION_ERROR",
                    message,
                    format!("Check the '{}' field and retry", field),
                ),
            },
            EngineError::StorageUnavailable { message: cause } => ApiErrorResponse {
                status: StatusCode::SERVICE_UNAVAILABLE,
                error: ApiError::with_details(
                    "STORAGE_UNAVAILABLE",
                    "Attendance storage is unavailable",
                    cause,
                ),
            },
            EngineError::ConfigNotFound { .. }
            | EngineError::ConfigParseError { .. }
            | EngineError::InvalidConfig { .. } => ApiErrorResponse {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                error: ApiError::with_details("CONFIG_ERROR", "Configuration error", message),
            },
        }
    }
}

/// Body of `GET /`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Always `"ok"`.
    pub status: String,
    /// Service banner.
    pub message: String,
}

/// Result of a check-in or check-out.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PunchResponse {
    /// True when the punch was recorded.
    pub accepted: bool,
    /// Machine-readable refusal reason.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rejection: Option<PunchRejection>,
    /// Human-readable refusal reason.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    /// Stored event timestamp.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
    /// Session length for check-outs.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hours_worked: Option<Decimal>,
    /// Distance from the work site.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distance_meters: Option<f64>,
    /// Set when the session length was corrected.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub anomaly: Option<DurationAnomaly>,
}

impl PunchResponse {
    /// HTTP status for this outcome.
    pub fn status_code(&self) -> StatusCode {
        match self.rejection {
            None => StatusCode::OK,
            Some(PunchRejection::OutOfGeofence) => StatusCode::FORBIDDEN,
            Some(PunchRejection::AlreadyCheckedIn | PunchRejection::NotCheckedIn) => {
                StatusCode::CONFLICT
            }
        }
    }
}

impl From<PunchOutcome> for PunchResponse {
    fn from(outcome: PunchOutcome) -> Self {
        Self {
            accepted: outcome.accepted,
            rejection: outcome.rejection,
            reason: outcome.reason,
            timestamp: outcome.timestamp,
            hours_worked: outcome.hours_worked,
            distance_meters: outcome.distance_meters,
            anomaly: outcome.anomaly,
        }
    }
}

/// Body returned for `getStatus`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusResponse {
    /// The employee queried.
    pub employee_id: String,
    /// True when a session is open.
    pub is_checked_in: bool,
    /// Kind of the most recent event.
    pub last_action: Option<EventKind>,
    /// Timestamp of the most recent event.
    pub last_timestamp: Option<DateTime<Utc>>,
}

impl StatusResponse {
    /// Builds the response from a status snapshot.
    pub fn new(employee_id: impl Into<String>, snapshot: StatusSnapshot) -> Self {
        Self {
            employee_id: employee_id.into(),
            is_checked_in: snapshot.is_checked_in(),
            last_action: snapshot.last_action,
            last_timestamp: snapshot.last_event_time,
        }
    }
}
