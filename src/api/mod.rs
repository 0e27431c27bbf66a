//! HTTP API module for the time clock.
//!
//! This module exposes the attendance service over a single JSON endpoint
//! whose body selects the action to run.

mod handlers;
mod request;
mod response;
mod state;

pub use handlers::create_router;
pub use request::{
    ActionRequest, EmployeePayload, PayrollPayload, PunchPayload, ReportPayload, VerifyPayload,
};
pub use response::{ApiError, ApiErrorResponse, HealthResponse, PunchResponse, StatusResponse};
pub use state::AppState;
