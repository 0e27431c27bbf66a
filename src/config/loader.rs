//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading the time clock
//! configuration from YAML files.

use std::fs;
use std::path::Path;

use crate::error::{EngineError, EngineResult};

use super::types::{EmployeesConfig, SiteConfig, TimeClockConfig};

/// Loads and provides access to the time clock configuration.
///
/// # Directory Structure
///
/// ```text
/// config/default/
/// ├── site.yaml       # Work site, geofence, payroll settings
/// └── employees.yaml  # Employee directory
/// ```
///
/// # Example
///
/// ```no_run
/// use timeclock_engine::config::ConfigLoader;
///
/// let loader = ConfigLoader::load("./config/default").unwrap();
/// println!("Geofence radius: {} m", loader.config().site().geofence_radius_meters);
/// ```
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    config: TimeClockConfig,
}

impl ConfigLoader {
    /// Loads configuration from the specified directory.
    ///
    /// # Returns
    ///
    /// Returns a `ConfigLoader` on success, or an error if:
    /// - Either file is missing (`ConfigNotFound`)
    /// - Either file contains invalid YAML (`ConfigParseError`)
    /// - A value is out of range (`InvalidConfig`)
    pub fn load<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let path = path.as_ref();

        let site_config = Self::load_yaml::<SiteConfig>(&path.join("site.yaml"))?;
        let employees = Self::load_yaml::<EmployeesConfig>(&path.join("employees.yaml"))?;

        let config = TimeClockConfig::new(site_config, employees.employees)?;
        Ok(Self { config })
    }

    /// Wraps an already-built configuration.
    pub fn from_config(config: TimeClockConfig) -> Self {
        Self { config }
    }

    /// Loads and parses a YAML file.
    fn load_yaml<T: serde::de::DeserializeOwned>(path: &Path) -> EngineResult<T> {
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| EngineError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        serde_yaml::from_str(&content).map_err(|e| EngineError::ConfigParseError {
            path: path_str,
            message: e.to_string(),
        })
    }

    /// Returns the underlying configuration.
    pub fn config(&self) -> &TimeClockConfig {
        &self.config
    }

    /// Consumes the loader, returning the configuration.
    pub fn into_config(self) -> TimeClockConfig {
        self.config
    }
}
