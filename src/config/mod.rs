//! Configuration loading and management for the time clock engine.
//!
//! This module loads the work site, geofence, payroll settings and the
//! employee directory from YAML files.
//!
//! # Example
//!
//! ```no_run
//! use timeclock_engine::config::ConfigLoader;
//!
//! let loader = ConfigLoader::load("./config/default").unwrap();
//! println!("Employees: {}", loader.config().directory().len());
//! ```

mod loader;
mod types;

pub use loader::ConfigLoader;
pub use types::{
    AttendanceSettings, EmployeesConfig, PayrollSettings, SiteConfig, TimeClockConfig, WorkSite,
};
