//! Geofenced attendance tracking and weekly payroll.
//!
//! Employees check in and out from a device. Each punch is accepted only
//! inside the work-site geofence and only as a valid transition of the
//! employee's checked-in/checked-out state. Accepted punches go to an
//! append-only event log, from which per-employee weekly reports and
//! payroll runs are computed.

#![warn(missing_docs)]

pub mod api;
pub mod attendance;
pub mod calculation;
pub mod clock;
pub mod config;
pub mod error;
pub mod models;
pub mod service;
pub mod store;
