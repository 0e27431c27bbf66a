//! Application state for the time clock API.
//!
//! This module defines the shared application state that is available
//! to all request handlers.

use std::sync::Arc;

use crate::config::ConfigLoader;
use crate::service::AttendanceService;

/// Shared application state.
///
/// Holds the attendance service that every handler dispatches to.
#[derive(Clone)]
pub struct AppState {
    service: Arc<AttendanceService>,
}

impl AppState {
    /// Creates a new application state around the given service.
    pub fn new(service: AttendanceService) -> Self {
        Self {
            service: Arc::new(service),
        }
    }

    /// Creates a state with in-memory stores from a loaded configuration.
    pub fn in_memory(config: ConfigLoader) -> Self {
        Self::new(AttendanceService::in_memory(config.into_config()))
    }

    /// Returns the attendance service.
    pub fn service(&self) -> &AttendanceService {
        &self.service
    }
}
