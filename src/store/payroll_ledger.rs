//! Destination for payroll rows.
//!
//! The engine computes payroll but does not decide where rows are kept; a
//! [`PayrollLedger`] is handed the finished run.

use std::sync::RwLock;

use crate::error::{EngineError, EngineResult};
use crate::models::{PayrollRun, WeeklyAggregate};

/// Persists the rows of completed payroll runs.
pub trait PayrollLedger: Send + Sync {
    /// Records every row of `run`. Re-running a week appends a second set of rows.
    fn record(&self, run: &PayrollRun) -> EngineResult<()>;

    /// Returns all recorded rows in the order they were written.
    fn rows(&self) -> EngineResult<Vec<WeeklyAggregate>>;
}

/// A [`PayrollLedger`] kept in process memory.
#[derive(Debug, Default)]
pub struct InMemoryPayrollLedger {
    rows: RwLock<Vec<WeeklyAggregate>>,
}

impl InMemoryPayrollLedger {
    /// Creates an empty ledger.
    pub fn new() -> Self {
        Self::default()
    }
}

impl PayrollLedger for InMemoryPayrollLedger {
    fn record(&self, run: &PayrollRun) -> EngineResult<()> {
        let mut rows = self
            .rows
            .write()
            .map_err(|_| EngineError::storage("payroll ledger lock poisoned"))?;
        rows.extend(run.rows.iter().cloned());
        Ok(())
    }

    fn rows(&self) -> EngineResult<Vec<WeeklyAggregate>> {
        self.rows
            .read()
            .map(|rows| rows.clone())
            .map_err(|_| EngineError::storage("payroll ledger lock poisoned"))
    }
}
