//! Configuration types for the time clock.
//!
//! This module contains the strongly-typed configuration structures that
//! are deserialized from YAML configuration files.

use chrono::FixedOffset;
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::error::{EngineError, EngineResult};
use crate::models::{EmployeeDirectory, EmployeeRecord, WeekStartDay};

/// The work location and its geofence.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct WorkSite {
    /// Human-readable site name.
    #[serde(default)]
    pub name: String,
    /// Site latitude in degrees.
    pub latitude: f64,
    /// Site longitude in degrees.
    pub longitude: f64,
    /// Radius of the geofence around the site, in meters.
    pub geofence_radius_meters: f64,
}

/// Payroll and week-boundary settings.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PayrollSettings {
    /// Rate used for employees without their own rate.
    pub default_hourly_rate: Decimal,
    /// First day of the pay week.
    #[serde(default)]
    pub week_starts_on: WeekStartDay,
    /// Local time offset from UTC in minutes, used for week boundaries and report times.
    #[serde(default)]
    pub utc_offset_minutes: i32,
}

/// Attendance policy switches.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct AttendanceSettings {
    /// Refuse punches from ids missing in the employee directory.
    #[serde(default)]
    pub require_known_employee: bool,
}

/// Structure of `site.yaml`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SiteConfig {
    /// The work site.
    pub site: WorkSite,
    /// Payroll settings.
    pub payroll: PayrollSettings,
    /// Attendance policy.
    #[serde(default)]
    pub attendance: AttendanceSettings,
}

/// Structure of `employees.yaml`.
#[derive(Debug, Clone, Deserialize)]
pub struct EmployeesConfig {
    /// All configured employees.
    pub employees: Vec<EmployeeRecord>,
}

/// The complete, validated time clock configuration.
#[derive(Debug, Clone)]
pub struct TimeClockConfig {
    site: WorkSite,
    payroll: PayrollSettings,
    attendance: AttendanceSettings,
    offset: FixedOffset,
    directory: EmployeeDirectory,
}

impl TimeClockConfig {
    /// Validates and assembles a configuration from its parts.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` when the site coordinates are out of range,
    /// the radius is not positive, the default rate is negative or the UTC
    /// offset is not a valid offset.
    pub fn new(site_config: SiteConfig, employees: Vec<EmployeeRecord>) -> EngineResult<Self> {
        let SiteConfig {
            site,
            payroll,
            attendance,
        } = site_config;

        if !(-90.0..=90.0).contains(&site.latitude) {
            return Err(invalid("site.latitude", "must be between -90 and 90"));
        }
        if !(-180.0..=180.0).contains(&site.longitude) {
            return Err(invalid("site.longitude", "must be between -180 and 180"));
        }
        if !site.geofence_radius_meters.is_finite() || site.geofence_radius_meters <= 0.0 {
            return Err(invalid(
                "site.geofence_radius_meters",
                "must be a positive number of meters",
            ));
        }
        if payroll.default_hourly_rate.is_sign_negative() {
            return Err(invalid(
                "payroll.default_hourly_rate",
                "must not be negative",
            ));
        }
        let offset = payroll
            .utc_offset_minutes
            .checked_mul(60)
            .and_then(FixedOffset::east_opt)
            .ok_or_else(|| invalid("payroll.utc_offset_minutes", "must be within ±24 hours"))?;

        Ok(Self {
            site,
            payroll,
            attendance,
            offset,
            directory: EmployeeDirectory::new(employees),
        })
    }

    /// Returns the work site.
    pub fn site(&self) -> &WorkSite {
        &self.site
    }

    /// Returns the payroll settings.
    pub fn payroll(&self) -> &PayrollSettings {
        &self.payroll
    }

    /// Returns the attendance policy.
    pub fn attendance(&self) -> &AttendanceSettings {
        &self.attendance
    }

    /// Returns the local offset used for week boundaries.
    pub fn offset(&self) -> FixedOffset {
        self.offset
    }

    /// Returns the employee directory.
    pub fn directory(&self) -> &EmployeeDirectory {
        &self.directory
    }

    /// Returns the fallback hourly rate.
    pub fn default_rate(&self) -> Decimal {
        self.payroll.default_hourly_rate
    }
}

fn invalid(field: &str, message: &str) -> EngineError {
    EngineError::InvalidConfig {
        field: field.to_string(),
        message: message.to_string(),
    }
}
