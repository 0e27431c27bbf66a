//! The append-only attendance event log.
//!
//! Components never hold ambient global state: an [`EventLog`] is injected
//! wherever events are read or written. Reads return owned snapshots, so a
//! caller scanning the log sees a consistent view even while appends continue.

use std::sync::RwLock;

use chrono::{DateTime, Utc};

use crate::error::{EngineError, EngineResult};
use crate::models::AttendanceEvent;

/// Append-only storage of attendance events.
///
/// Implementations are not required to return events in timestamp order;
/// consumers sort or scan for the maximum timestamp themselves.
pub trait EventLog: Send + Sync {
    /// Appends one event. On error nothing is stored.
    fn append(&self, event: AttendanceEvent) -> EngineResult<()>;

    /// Returns every event for `employee_id`.
    fn events_for_employee(&self, employee_id: &str) -> EngineResult<Vec<AttendanceEvent>>;

    /// Returns every event with `start <= timestamp < end`, for all employees.
    fn events_in_range(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> EngineResult<Vec<AttendanceEvent>>;

    /// Returns the event with the greatest timestamp for `employee_id`.
    ///
    /// When several events share the greatest timestamp, the one appended
    /// last wins.
    fn latest_for_employee(&self, employee_id: &str) -> EngineResult<Option<AttendanceEvent>> {
        Ok(self
            .events_for_employee(employee_id)?
            .into_iter()
            .max_by_key(|e| e.timestamp))
    }
}

/// An [`EventLog`] kept in process memory.
///
/// # Example
///
/// ```
/// use timeclock_engine::store::{EventLog, InMemoryEventLog};
///
/// let log = InMemoryEventLog::new();
/// assert!(log.events_for_employee("E001").unwrap().is_empty());
/// ```
#[derive(Debug, Default)]
pub struct InMemoryEventLog {
    events: RwLock<Vec<AttendanceEvent>>,
}

impl InMemoryEventLog {
    /// Creates an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a log pre-populated with historical events, in the given order.
    pub fn with_events(events: Vec<AttendanceEvent>) -> Self {
        Self {
            events: RwLock::new(events),
        }
    }

    /// Number of stored events.
    pub fn len(&self) -> EngineResult<usize> {
        Ok(self.read_all()?.len())
    }

    /// Returns true when no events are stored.
    pub fn is_empty(&self) -> EngineResult<bool> {
        Ok(self.len()? == 0)
    }

    /// Returns a copy of every stored event in append order.
    pub fn snapshot(&self) -> EngineResult<Vec<AttendanceEvent>> {
        self.read_all()
    }

    fn read_all(&self) -> EngineResult<Vec<AttendanceEvent>> {
        self.events
            .read()
            .map(|events| events.clone())
            .map_err(|_| EngineError::storage("event log lock poisoned"))
    }
}

impl EventLog for InMemoryEventLog {
    fn append(&self, event: AttendanceEvent) -> EngineResult<()> {
        let mut events = self
            .events
            .write()
            .map_err(|_| EngineError::storage("event log lock poisoned"))?;
        events.push(event);
        Ok(())
    }

    fn events_for_employee(&self, employee_id: &str) -> EngineResult<Vec<AttendanceEvent>> {
        let events = self
            .events
            .read()
            .map_err(|_| EngineError::storage("event log lock poisoned"))?;
        Ok(events
            .iter()
            .filter(|e| e.employee_id == employee_id)
            .cloned()
            .collect())
    }

    fn events_in_range(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> EngineResult<Vec<AttendanceEvent>> {
        let events = self
            .events
            .read()
            .map_err(|_| EngineError::storage("event log lock poisoned"))?;
        Ok(events
            .iter()
            .filter(|e| e.timestamp >= start && e.timestamp < end)
            .cloned()
            .collect())
    }
}
