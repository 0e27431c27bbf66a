//! HTTP request handlers for the time clock API.
//!
//! `GET /` is a health check. `POST /` dispatches on the body's `action`.

use std::time::Instant;

use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::get,
};
use serde::Serialize;
use tokio::task::{self, JoinError};
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::error::EngineResult;

use super::request::ActionRequest;
use super::response::{ApiError, ApiErrorResponse, HealthResponse, PunchResponse, StatusResponse};
use super::state::AppState;

/// Creates the API router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(health_handler).post(action_handler))
        .with_state(state)
}

/// Handler for GET /.
async fn health_handler() -> impl IntoResponse {
    json_response(
        StatusCode::OK,
        HealthResponse {
            status: "ok".to_string(),
            message: "Time clock API is running".to_string(),
        },
    )
}

/// Handler for POST /.
async fn action_handler(
    State(state): State<AppState>,
    payload: Result<Json<ActionRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();

    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => {
            let error = rejection_to_error(rejection, correlation_id);
            return json_response(StatusCode::BAD_REQUEST, error);
        }
    };

    let action = request.name();
    info!(correlation_id = %correlation_id, action, "Processing action");

    // Store appends lock and sync files, so they run off the async workers
    let start_time = Instant::now();
    let joined = task::spawn_blocking(move || dispatch(&state, request)).await;
    let duration = start_time.elapsed();

    let result = match joined {
        Ok(result) => result,
        Err(join_error) => return worker_failure(correlation_id, action, join_error),
    };

    match result {
        Ok(response) => {
            info!(
                correlation_id = %correlation_id,
                action,
                status = response.status().as_u16(),
                duration_us = duration.as_micros(),
                "Action completed"
            );
            response
        }
        Err(err) => {
            warn!(
                correlation_id = %correlation_id,
                action,
                error = %err,
                "Action failed"
            );
            let api_error: ApiErrorResponse = err.into();
            json_response(api_error.status, api_error.error)
        }
    }
}

/// Runs one action against the service.
fn dispatch(state: &AppState, request: ActionRequest) -> EngineResult<Response> {
    let service = state.service();
    Ok(match request {
        ActionRequest::CheckIn(payload) => {
            let response = PunchResponse::from(service.check_in(&payload.into())?);
            json_response(response.status_code(), response)
        }
        ActionRequest::CheckOut(payload) => {
            let response = PunchResponse::from(service.check_out(&payload.into())?);
            json_response(response.status_code(), response)
        }
        ActionRequest::VerifyEmployee(payload) => {
            let check = service.verify_credentials(&payload.employee_id, &payload.pin);
            let status = if check.valid {
                StatusCode::OK
            } else {
                StatusCode::UNAUTHORIZED
            };
            json_response(status, check)
        }
        ActionRequest::GetStatus(payload) => {
            let snapshot = service.status(&payload.employee_id)?;
            json_response(
                StatusCode::OK,
                StatusResponse::new(payload.employee_id, snapshot),
            )
        }
        ActionRequest::GetWeeklyReport(payload) => {
            let report = service.weekly_report(&payload.employee_id, payload.week_of)?;
            json_response(StatusCode::OK, report)
        }
        ActionRequest::RunWeeklyPayroll(payload) => {
            let run = service.run_weekly_payroll(payload.week_of)?;
            json_response(StatusCode::OK, run)
        }
    })
}

/// Response for an action whose blocking worker panicked or was cancelled.
fn worker_failure(correlation_id: Uuid, action: &str, join_error: JoinError) -> Response {
    error!(
        correlation_id = %correlation_id,
        action,
        error = %join_error,
        "Action worker failed"
    );
    json_response(
        StatusCode::INTERNAL_SERVER_ERROR,
        ApiError::new("INTERNAL_ERROR", "The action could not be completed"),
    )
}

/// Maps a body extraction failure to an API error.
fn rejection_to_error(rejection: JsonRejection, correlation_id: Uuid) -> ApiError {
    match rejection {
        JsonRejection::JsonDataError(err) => {
            let body_text = err.body_text();
            warn!(
                correlation_id = %correlation_id,
                error = %body_text,
                "JSON data error"
            );
            if body_text.contains("missing field") || body_text.contains("unknown variant") {
                ApiError::validation_error(body_text)
            } else {
                ApiError::malformed_json(body_text)
            }
        }
        JsonRejection::JsonSyntaxError(err) => {
            warn!(
                correlation_id = %correlation_id,
                error = %err,
                "JSON syntax error"
            );
            ApiError::malformed_json(format!("Invalid JSON syntax: {}", err))
        }
        JsonRejection::MissingJsonContentType(_) => {
            ApiError::new("MISSING_CONTENT_TYPE", "Content-Type must be application/json")
        }
        _ => ApiError::malformed_json("Failed to parse request body"),
    }
}

fn json_response<T: Serialize>(status: StatusCode, body: T) -> Response {
    (
        status,
        [(header::CONTENT_TYPE, "application/json")],
        Json(body),
    )
        .into_response()
}
