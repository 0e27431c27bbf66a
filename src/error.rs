//! Error types for the time clock engine.
//!
//! This module provides strongly-typed errors using the `thiserror` crate
//! for every failure a caller can observe: rejected punches, credential
//! problems, malformed input, storage outages and configuration issues.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The reason a check-in or check-out was refused by the state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransitionViolation {
    /// A check-in was requested while the employee is already checked in.
    AlreadyCheckedIn,
    /// A check-out was requested while the employee is checked out.
    NotCheckedIn,
}

impl std::fmt::Display for TransitionViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TransitionViolation::AlreadyCheckedIn => write!(f, "already checked in"),
            TransitionViolation::NotCheckedIn => write!(f, "not checked in"),
        }
    }
}

/// The main error type for the time clock engine.
///
/// Every variant is recoverable: callers receive it as a structured
/// failure and decide whether to retry.
///
/// # Example
///
/// ```
/// use timeclock_engine::error::EngineError;
///
/// let error = EngineError::UnknownEmployee {
///     employee_id: "E999".to_string(),
/// };
/// assert_eq!(error.to_string(), "Unknown employee: E999");
/// ```
#[derive(Debug, Error)]
pub enum EngineError {
    /// The punch location is outside the work-site geofence.
    #[error("Location is {distance_meters:.1} m from the work site (limit {radius_meters} m)")]
    OutOfGeofence {
        /// Great-circle distance from the work site.
        distance_meters: f64,
        /// Configured geofence radius.
        radius_meters: f64,
    },

    /// The requested transition is not allowed from the employee's current state.
    #[error("Invalid transition for employee '{employee_id}': {violation}")]
    InvalidTransition {
        /// The employee whose request was refused.
        employee_id: String,
        /// Which rule was violated.
        violation: TransitionViolation,
    },

    /// Employee id and PIN do not match a directory entry.
    #[error("Invalid employee ID or PIN")]
    InvalidCredentials,

    /// The employee id is not present in the directory.
    #[error("Unknown employee: {employee_id}")]
    UnknownEmployee {
        /// The id that was looked up.
        employee_id: String,
    },

    /// A request field was missing or invalid.
    #[error("Malformed request field '{field}': {message}")]
    MalformedRequest {
        /// The offending field.
        field: String,
        /// What was wrong with it.
        message: String,
    },

    /// The event store or payroll ledger could not be read or written.
    #[error("Storage unavailable: {message}")]
    StorageUnavailable {
        /// A description of the underlying failure.
        message: String,
    },

    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// Configuration parsed but holds an unusable value.
    #[error("Invalid configuration value '{field}': {message}")]
    InvalidConfig {
        /// The configuration key.
        field: String,
        /// Why the value was rejected.
        message: String,
    },
}

impl EngineError {
    /// Builds a [`EngineError::StorageUnavailable`] from any displayable cause.
    pub fn storage(cause: impl std::fmt::Display) -> Self {
        EngineError::StorageUnavailable {
            message: cause.to_string(),
        }
    }

    /// Builds a [`EngineError::MalformedRequest`] for the given field.
    pub fn malformed(field: impl Into<String>, message: impl Into<String>) -> Self {
        EngineError::MalformedRequest {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// A type alias for Results that return EngineError.
pub type EngineResult<T> = Result<T, EngineError>;
