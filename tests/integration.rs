//! End-to-end tests for the time clock API.
//!
//! Every test drives the axum router with `oneshot` against the default
//! configuration (work site at 34.0659, -84.6769 with a 100 m radius) and a
//! manual clock starting Monday 2026-01-12 09:00 UTC.

use std::str::FromStr;
use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use chrono::{Duration, TimeZone, Utc};
use rust_decimal::Decimal;
use serde_json::{Value, json};
use tower::ServiceExt;

use timeclock_engine::api::{AppState, create_router};
use timeclock_engine::clock::ManualClock;
use timeclock_engine::config::ConfigLoader;
use timeclock_engine::service::AttendanceService;
use timeclock_engine::store::{
    EventLog, InMemoryEventLog, InMemoryPayrollLedger, JsonLinesEventLog, JsonLinesPayrollLedger,
    PayrollLedger,
};

const SITE_LAT: f64 = 34.0659;
const SITE_LON: f64 = -84.6769;

// =============================================================================
// Test Helpers
// =============================================================================

struct TestApp {
    router: Router,
    clock: Arc<ManualClock>,
    log: Arc<dyn EventLog>,
    ledger: Arc<dyn PayrollLedger>,
}

fn create_test_app() -> TestApp {
    create_test_app_with(
        Arc::new(InMemoryEventLog::new()),
        Arc::new(InMemoryPayrollLedger::new()),
    )
}

fn create_test_app_with(log: Arc<dyn EventLog>, ledger: Arc<dyn PayrollLedger>) -> TestApp {
    let config = ConfigLoader::load("./config/default").expect("Failed to load config");
    let clock = Arc::new(ManualClock::new(
        Utc.with_ymd_and_hms(2026, 1, 12, 9, 0, 0).unwrap(),
    ));
    let service = AttendanceService::new(
        config.into_config(),
        Arc::clone(&log),
        Arc::clone(&ledger),
        clock.clone(),
    );
    TestApp {
        router: create_router(AppState::new(service)),
        clock,
        log,
        ledger,
    }
}

fn decimal(value: &Value) -> Decimal {
    Decimal::from_str(value.as_str().expect("decimal encoded as string")).unwrap()
}

async fn post_action(router: &Router, body: Value) -> (StatusCode, Value) {
    post_raw(router, body.to_string()).await
}

async fn post_raw(router: &Router, body: String) -> (StatusCode, Value) {
    let response = router
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/")
                .header("Content-Type", "application/json")
                .body(Body::from(body))
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json: Value = serde_json::from_slice(&body_bytes).unwrap();

    (status, json)
}

fn punch(action: &str, employee_id: &str, latitude: f64, longitude: f64) -> Value {
    json!({
        "action": action,
        "employeeId": employee_id,
        "employeeName": "",
        "latitude": latitude,
        "longitude": longitude
    })
}

async fn work_shift(app: &TestApp, employee_id: &str, hours: i64) {
    let (status, _) = post_action(&app.router, punch("checkIn", employee_id, SITE_LAT, SITE_LON)).await;
    assert_eq!(status, StatusCode::OK);
    app.clock.advance(Duration::hours(hours));
    let (status, _) =
        post_action(&app.router, punch("checkOut", employee_id, SITE_LAT, SITE_LON)).await;
    assert_eq!(status, StatusCode::OK);
}

// =============================================================================
// Health
// =============================================================================

#[tokio::test]
async fn test_health_check() {
    let app = create_test_app();

    let response = app
        .router
        .clone()
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["status"], "ok");
}

// =============================================================================
// Check-in / check-out
// =============================================================================

#[tokio::test]
async fn test_check_in_and_out_reports_hours() {
    let app = create_test_app();

    let (status, body) =
        post_action(&app.router, punch("checkIn", "E001", SITE_LAT, SITE_LON)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["accepted"], true);
    assert_eq!(body["distanceMeters"].as_f64(), Some(0.0));
    assert!(body.get("hoursWorked").is_none());

    app.clock.advance(Duration::hours(8));
    let (status, body) =
        post_action(&app.router, punch("checkOut", "E001", SITE_LAT, SITE_LON)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["accepted"], true);
    assert_eq!(decimal(&body["hoursWorked"]), Decimal::from(8));

    let events = app.log.events_for_employee("E001").unwrap();
    assert_eq!(events.len(), 2);
    assert_eq!(events[0].employee_name, "Alice Moreno");
    assert!(events.iter().all(|e| e.location_valid));
}

#[tokio::test]
async fn test_check_in_outside_geofence_returns_403() {
    let app = create_test_app();

    // About 1.1 km north of the site
    let (status, body) =
        post_action(&app.router, punch("checkIn", "E001", SITE_LAT + 0.01, SITE_LON)).await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["accepted"], false);
    assert_eq!(body["rejection"], "OUT_OF_GEOFENCE");
    assert!(body["distanceMeters"].as_f64().unwrap() > 1_000.0);
    assert!(body["reason"].as_str().unwrap().contains("limit 100 m"));
    assert!(app.log.events_for_employee("E001").unwrap().is_empty());
}

#[tokio::test]
async fn test_point_just_inside_radius_is_accepted() {
    let app = create_test_app();

    // 0.0008 degrees of latitude is roughly 89 m
    let (status, body) =
        post_action(&app.router, punch("checkIn", "E001", SITE_LAT + 0.0008, SITE_LON)).await;

    assert_eq!(status, StatusCode::OK);
    assert!(body["distanceMeters"].as_f64().unwrap() < 100.0);
}

#[tokio::test]
async fn test_double_check_in_returns_409() {
    let app = create_test_app();
    post_action(&app.router, punch("checkIn", "E001", SITE_LAT, SITE_LON)).await;

    app.clock.advance(Duration::minutes(5));
    let (status, body) =
        post_action(&app.router, punch("checkIn", "E001", SITE_LAT, SITE_LON)).await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["accepted"], false);
    assert_eq!(body["rejection"], "ALREADY_CHECKED_IN");
    assert_eq!(app.log.events_for_employee("E001").unwrap().len(), 1);
}

#[tokio::test]
async fn test_check_out_without_check_in_returns_409() {
    let app = create_test_app();

    let (status, body) =
        post_action(&app.router, punch("checkOut", "E002", SITE_LAT, SITE_LON)).await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["rejection"], "NOT_CHECKED_IN");
    assert!(app.log.events_for_employee("E002").unwrap().is_empty());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_check_ins_accept_exactly_one() {
    let app = create_test_app();

    let handles: Vec<_> = (0..10)
        .map(|_| {
            let router = app.router.clone();
            tokio::spawn(async move {
                post_action(&router, punch("checkIn", "E003", SITE_LAT, SITE_LON)).await
            })
        })
        .collect();

    let mut accepted = 0;
    let mut conflicts = 0;
    for handle in handles {
        let (status, _) = handle.await.unwrap();
        if status == StatusCode::OK {
            accepted += 1;
        } else if status == StatusCode::CONFLICT {
            conflicts += 1;
        } else {
            panic!("Unexpected status {}", status);
        }
    }

    assert_eq!(accepted, 1);
    assert_eq!(conflicts, 9);
    assert_eq!(app.log.events_for_employee("E003").unwrap().len(), 1);
}

// =============================================================================
// Status and credentials
// =============================================================================

#[tokio::test]
async fn test_status_follows_punches() {
    let app = create_test_app();

    let (status, body) = post_action(
        &app.router,
        json!({"action": "getStatus", "employeeId": "E001"}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["isCheckedIn"], false);
    assert!(body["lastAction"].is_null());

    post_action(&app.router, punch("checkIn", "E001", SITE_LAT, SITE_LON)).await;

    let (_, body) = post_action(
        &app.router,
        json!({"action": "getStatus", "employeeId": "E001"}),
    )
    .await;
    assert_eq!(body["isCheckedIn"], true);
    assert_eq!(body["lastAction"], "CHECK_IN");
    assert_eq!(body["lastTimestamp"], "2026-01-12T09:00:00Z");
}

#[tokio::test]
async fn test_verify_employee() {
    let app = create_test_app();

    let (status, body) = post_action(
        &app.router,
        json!({"action": "verifyEmployee", "employeeId": "E003", "pin": "3333"}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["valid"], true);
    assert_eq!(body["employee"]["name"], "Chen Wei");
    assert_eq!(decimal(&body["employee"]["rate"]), Decimal::from_str("17.50").unwrap());
    assert!(body["employee"].get("pin").is_none());

    let (status, body) = post_action(
        &app.router,
        json!({"action": "verifyEmployee", "employeeId": "E003", "pin": "0000"}),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["valid"], false);
}

// =============================================================================
// Reports and payroll
// =============================================================================

#[tokio::test]
async fn test_weekly_report_lists_sessions() {
    let app = create_test_app();
    work_shift(&app, "E002", 4).await;
    app.clock.advance(Duration::hours(20));
    work_shift(&app, "E002", 3).await;

    let (status, body) = post_action(
        &app.router,
        json!({"action": "getWeeklyReport", "employeeId": "E002", "weekOf": "2026-01-15"}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["week_start"], "2026-01-12");
    assert_eq!(body["sessions"].as_array().unwrap().len(), 2);
    assert_eq!(body["sessions"][0]["check_in"], "09:00:00");
    assert_eq!(decimal(&body["total_hours"]), Decimal::from(7));
}

#[tokio::test]
async fn test_weekly_payroll_totals() {
    let app = create_test_app();
    work_shift(&app, "E002", 8).await;
    work_shift(&app, "E001", 8).await;

    let (status, body) =
        post_action(&app.router, json!({"action": "runWeeklyPayroll"})).await;

    assert_eq!(status, StatusCode::OK);
    let rows = body["rows"].as_array().unwrap();
    assert_eq!(rows.len(), 2);

    // Ordered by employee id
    assert_eq!(rows[0]["employee_id"], "E001");
    assert_eq!(decimal(&rows[0]["total_pay"]), Decimal::from_str("160.00").unwrap());

    // E002 has no rate of their own and is paid the default
    assert_eq!(rows[1]["employee_id"], "E002");
    assert_eq!(decimal(&rows[1]["rate"]), Decimal::from_str("15.00").unwrap());
    assert_eq!(decimal(&rows[1]["total_pay"]), Decimal::from_str("120.00").unwrap());

    assert_eq!(app.ledger.rows().unwrap().len(), 2);
}

#[tokio::test]
async fn test_payroll_reports_anomalies_instead_of_failing() {
    let app = create_test_app();
    work_shift(&app, "E001", 2).await;
    // Left open at the end of the week
    post_action(&app.router, punch("checkIn", "E003", SITE_LAT, SITE_LON)).await;
    // Not in the directory
    work_shift(&app, "E404", 1).await;

    let (status, body) = post_action(
        &app.router,
        json!({"action": "runWeeklyPayroll", "weekOf": "2026-01-12"}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["rows"].as_array().unwrap().len(), 1);
    assert_eq!(body["anomalies"]["unmatched_check_ins"], 1);
    assert_eq!(body["anomalies"]["unknown_employees"], json!(["E404"]));
}

#[tokio::test]
async fn test_payroll_for_other_week_is_empty() {
    let app = create_test_app();
    work_shift(&app, "E001", 8).await;

    let (status, body) = post_action(
        &app.router,
        json!({"action": "runWeeklyPayroll", "weekOf": "2026-01-05"}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["week_start"], "2026-01-05");
    assert!(body["rows"].as_array().unwrap().is_empty());
}

// =============================================================================
// Error cases
// =============================================================================

#[tokio::test]
async fn test_malformed_json_returns_400() {
    let app = create_test_app();
    let (status, body) = post_raw(&app.router, "{not json".to_string()).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "MALFORMED_JSON");
}

#[tokio::test]
async fn test_blank_employee_id_returns_400() {
    let app = create_test_app();
    let (status, body) = post_action(&app.router, punch("checkIn", " ", SITE_LAT, SITE_LON)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_week_of_outside_calendar_returns_400() {
    let app = create_test_app();
    let (status, body) = post_action(
        &app.router,
        json!({"action": "runWeeklyPayroll", "weekOf": "+262142-12-31"}),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");
    assert!(app.ledger.rows().unwrap().is_empty());
}

// =============================================================================
// Persistence
// =============================================================================

#[tokio::test]
async fn test_file_backed_state_survives_restart() {
    let dir = tempfile::tempdir().unwrap();
    let events_path = dir.path().join("events.jsonl");
    let ledger_path = dir.path().join("payroll.jsonl");

    {
        let app = create_test_app_with(
            Arc::new(JsonLinesEventLog::open(&events_path).unwrap()),
            Arc::new(JsonLinesPayrollLedger::new(&ledger_path)),
        );
        post_action(&app.router, punch("checkIn", "E001", SITE_LAT, SITE_LON)).await;
    }

    let app = create_test_app_with(
        Arc::new(JsonLinesEventLog::open(&events_path).unwrap()),
        Arc::new(JsonLinesPayrollLedger::new(&ledger_path)),
    );

    // Still checked in after the restart
    let (status, _) = post_action(&app.router, punch("checkIn", "E001", SITE_LAT, SITE_LON)).await;
    assert_eq!(status, StatusCode::CONFLICT);

    app.clock.advance(Duration::hours(8));
    let (status, body) =
        post_action(&app.router, punch("checkOut", "E001", SITE_LAT, SITE_LON)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(decimal(&body["hoursWorked"]), Decimal::from(8));

    post_action(&app.router, json!({"action": "runWeeklyPayroll"})).await;
    let rows = JsonLinesPayrollLedger::new(&ledger_path).rows().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].total_pay, Decimal::from_str("160.00").unwrap());
}
