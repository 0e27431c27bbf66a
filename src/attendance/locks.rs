//! Per-employee mutual exclusion.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// A registry of one mutex per employee id.
///
/// Holding an employee's lock serializes the status check and the append
/// for that employee; different employees never contend beyond the brief
/// registry lookup.
#[derive(Debug, Default)]
pub struct EmployeeLocks {
    locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl EmployeeLocks {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the lock for `employee_id`, creating it on first use.
    pub fn lock_for(&self, employee_id: &str) -> Arc<Mutex<()>> {
        // A poisoned registry still holds valid Arcs
        let mut locks = self.locks.lock().unwrap_or_else(|e| e.into_inner());
        Arc::clone(
            locks
                .entry(employee_id.to_string())
                .or_insert_with(|| Arc::new(Mutex::new(()))),
        )
    }

    /// Number of employees that have been locked at least once.
    pub fn len(&self) -> usize {
        self.locks.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    /// Returns true if no employee has been locked yet.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
