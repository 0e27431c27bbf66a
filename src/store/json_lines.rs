//! File-backed stores using one JSON document per line.
//!
//! Files are only ever appended to. Each write is a single `write_all` of
//! complete lines followed by `sync_data`; a record becomes visible in memory
//! only after the write succeeded. A line left unterminated by a crash is
//! ignored on read and cut off before the next append.

use std::fs::{self, File, OpenOptions};
use std::io::{self, ErrorKind, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{info, warn};

use crate::error::{EngineError, EngineResult};
use crate::models::{AttendanceEvent, PayrollRun, WeeklyAggregate};

use super::event_log::EventLog;
use super::payroll_ledger::PayrollLedger;

/// Reads every record from a JSON-lines file. A missing file reads as empty.
///
/// A last line without its newline that does not parse is the remains of an
/// interrupted append and is skipped. Any other bad line is an error.
fn read_json_lines<T: DeserializeOwned>(path: &Path) -> EngineResult<Vec<T>> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => {
            return Err(EngineError::storage(format!(
                "cannot read {}: {}",
                path.display(),
                e
            )));
        }
    };

    let (complete, tail) = match content.rfind('\n') {
        Some(end) => content.split_at(end + 1),
        None => ("", content.as_str()),
    };

    let mut records = complete
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(index, line)| {
            serde_json::from_str(line).map_err(|e| {
                EngineError::storage(format!(
                    "{} line {} is not a valid record: {}",
                    path.display(),
                    index + 1,
                    e
                ))
            })
        })
        .collect::<EngineResult<Vec<T>>>()?;

    if !tail.trim().is_empty() {
        match serde_json::from_str(tail) {
            Ok(record) => records.push(record),
            Err(e) => warn!(
                path = %path.display(),
                bytes = tail.len(),
                error = %e,
                "Ignoring torn record at end of file"
            ),
        }
    }

    Ok(records)
}

/// Leaves the file ending on a line boundary.
///
/// An unterminated last line that parses gets its newline; one that does not
/// is cut off.
fn seal_tail(file: &mut File, path: &Path) -> io::Result<()> {
    let len = file.metadata()?.len();
    if len == 0 {
        return Ok(());
    }

    let mut last = [0u8; 1];
    file.seek(SeekFrom::Start(len - 1))?;
    file.read_exact(&mut last)?;
    if last[0] == b'\n' {
        return Ok(());
    }

    let mut content = Vec::new();
    file.seek(SeekFrom::Start(0))?;
    file.read_to_end(&mut content)?;
    let line_start = content
        .iter()
        .rposition(|byte| *byte == b'\n')
        .map_or(0, |newline| newline + 1);
    let tail = &content[line_start..];

    if serde_json::from_slice::<serde_json::Value>(tail).is_ok() {
        file.write_all(b"\n")
    } else {
        warn!(
            path = %path.display(),
            bytes = tail.len(),
            "Discarding torn record at end of file"
        );
        file.set_len(line_start as u64)
    }
}

/// Appends records to a JSON-lines file in one write.
///
/// A write that fails part way is truncated back off the file.
fn append_json_lines<T: Serialize>(path: &Path, records: &[T]) -> EngineResult<()> {
    if records.is_empty() {
        return Ok(());
    }

    let mut buffer = String::new();
    for record in records {
        let line = serde_json::to_string(record).map_err(EngineError::storage)?;
        buffer.push_str(&line);
        buffer.push('\n');
    }

    let mut file = OpenOptions::new()
        .read(true)
        .append(true)
        .create(true)
        .open(path)
        .map_err(|e| EngineError::storage(format!("cannot open {}: {}", path.display(), e)))?;
    let len = seal_tail(&mut file, path)
        .and_then(|_| file.metadata())
        .map_err(|e| EngineError::storage(format!("cannot prepare {}: {}", path.display(), e)))?
        .len();

    if let Err(e) = file
        .write_all(buffer.as_bytes())
        .and_then(|_| file.sync_data())
    {
        if let Err(rollback) = file.set_len(len) {
            warn!(
                path = %path.display(),
                error = %rollback,
                "Cannot remove partial write"
            );
        }
        return Err(EngineError::storage(format!(
            "cannot write {}: {}",
            path.display(),
            e
        )));
    }
    Ok(())
}

/// An [`EventLog`] persisted to a JSON-lines file.
///
/// The file is read once on open; afterwards queries are answered from
/// memory and appends go to both the file and memory.
#[derive(Debug)]
pub struct JsonLinesEventLog {
    path: PathBuf,
    events: RwLock<Vec<AttendanceEvent>>,
}

impl JsonLinesEventLog {
    /// Opens (or prepares to create) the log at `path`.
    pub fn open(path: impl Into<PathBuf>) -> EngineResult<Self> {
        let path = path.into();
        let events: Vec<AttendanceEvent> = read_json_lines(&path)?;
        info!(path = %path.display(), events = events.len(), "Opened event log");
        Ok(Self {
            path,
            events: RwLock::new(events),
        })
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl EventLog for JsonLinesEventLog {
    fn append(&self, event: AttendanceEvent) -> EngineResult<()> {
        let mut events = self
            .events
            .write()
            .map_err(|_| EngineError::storage("event log lock poisoned"))?;
        append_json_lines(&self.path, std::slice::from_ref(&event))?;
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

/// A [`PayrollLedger`] persisted to a JSON-lines file, one row per line.
#[derive(Debug)]
pub struct JsonLinesPayrollLedger {
    path: PathBuf,
    write_guard: RwLock<()>,
}

impl JsonLinesPayrollLedger {
    /// Uses the ledger file at `path`, creating it on first write.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_guard: RwLock::new(()),
        }
    }
}

impl PayrollLedger for JsonLinesPayrollLedger {
    fn record(&self, run: &PayrollRun) -> EngineResult<()> {
        let _guard = self
            .write_guard
            .write()
            .map_err(|_| EngineError::storage("payroll ledger lock poisoned"))?;
        append_json_lines(&self.path, &run.rows)
    }

    fn rows(&self) -> EngineResult<Vec<WeeklyAggregate>> {
        let _guard = self
            .write_guard
            .read()
            .map_err(|_| EngineError::storage("payroll ledger lock poisoned"))?;
        read_json_lines(&self.path)
    }
}
