//! Employee records and the employee directory.
//!
//! The directory is administered outside the engine and is read-only here.
//! It answers two questions: which rate applies to an employee, and whether
//! an id/PIN pair is valid.

use std::collections::HashMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

/// An employee as configured by administration.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployeeRecord {
    /// Unique identifier for the employee.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Opaque credential used by [`EmployeeDirectory::verify`].
    #[serde(skip_serializing)]
    pub pin: String,
    /// Hourly rate; `None` or zero falls back to the configured default.
    #[serde(default)]
    pub hourly_rate: Option<Decimal>,
}

impl std::fmt::Debug for EmployeeRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EmployeeRecord")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("pin", &"***")
            .field("hourly_rate", &self.hourly_rate)
            .finish()
    }
}

impl EmployeeRecord {
    /// Returns the employee's rate, or `default_rate` when unset or zero.
    ///
    /// # Example
    ///
    /// ```
    /// use timeclock_engine::models::EmployeeRecord;
    /// use rust_decimal::Decimal;
    ///
    /// let record = EmployeeRecord {
    ///     id: "E002".to_string(),
    ///     name: "Ben Okafor".to_string(),
    ///     pin: "2222".to_string(),
    ///     hourly_rate: Some(Decimal::ZERO),
    /// };
    /// assert_eq!(record.effective_rate(Decimal::new(15, 0)), Decimal::new(15, 0));
    /// ```
    pub fn effective_rate(&self, default_rate: Decimal) -> Decimal {
        match self.hourly_rate {
            Some(rate) if !rate.is_zero() => rate,
            _ => default_rate,
        }
    }
}

/// Public view of an employee returned after a successful credential check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployeeSummary {
    /// Unique identifier for the employee.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Effective hourly rate (default applied).
    pub rate: Decimal,
}

/// Lookup table of employees keyed by id.
#[derive(Debug, Clone, Default)]
pub struct EmployeeDirectory {
    employees: HashMap<String, EmployeeRecord>,
}

impl EmployeeDirectory {
    /// Builds a directory from a list of records. Later duplicates replace earlier ones.
    pub fn new(records: Vec<EmployeeRecord>) -> Self {
        let employees = records.into_iter().map(|r| (r.id.clone(), r)).collect();
        Self { employees }
    }

    /// Returns the record for `employee_id`, if any.
    pub fn get(&self, employee_id: &str) -> Option<&EmployeeRecord> {
        self.employees.get(employee_id)
    }

    /// Returns the record for `employee_id` or `UnknownEmployee`.
    pub fn require(&self, employee_id: &str) -> EngineResult<&EmployeeRecord> {
        self.get(employee_id)
            .ok_or_else(|| EngineError::UnknownEmployee {
                employee_id: employee_id.to_string(),
            })
    }

    /// Number of employees in the directory.
    pub fn len(&self) -> usize {
        self.employees.len()
    }

    /// Returns true when no employees are configured.
    pub fn is_empty(&self) -> bool {
        self.employees.is_empty()
    }

    /// Checks an id/PIN pair.
    ///
    /// Both an unknown id and a wrong PIN yield `InvalidCredentials`, so the
    /// caller cannot tell which field was wrong.
    pub fn verify(
        &self,
        employee_id: &str,
        pin: &str,
        default_rate: Decimal,
    ) -> EngineResult<EmployeeSummary> {
        match self.get(employee_id) {
            Some(record) if record.pin == pin => Ok(EmployeeSummary {
                id: record.id.clone(),
                name: record.name.clone(),
                rate: record.effective_rate(default_rate),
            }),
            _ => Err(EngineError::InvalidCredentials),
        }
    }
}
