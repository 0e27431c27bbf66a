//! Calculation logic for the time clock engine.
//!
//! This module contains the pure functions behind attendance accounting:
//! geofence distance checks, pairing of check-in/check-out events into
//! sessions, weekly payroll aggregation and per-employee weekly reports.

mod geofence;
mod payroll;
mod time_accounting;
mod weekly_report;

pub use geofence::{
    EARTH_RADIUS_METERS, GeofenceCheck, check_geofence, distance_meters, is_within_geofence,
};
pub use payroll::{REPORTING_DECIMAL_PLACES, calculate_weekly_payroll};
pub use time_accounting::{account_window, hours_between, pair_sessions};
pub use weekly_report::build_weekly_report;
