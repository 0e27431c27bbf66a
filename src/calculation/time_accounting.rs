//! Pairing of check-in/check-out events into sessions.
//!
//! The accountant makes a single forward pass over one employee's events in
//! timestamp order, holding at most one pending check-in:
//!
//! - a check-in while another is pending replaces it, and the replaced one is
//!   counted as unmatched ("last check-in wins");
//! - a check-out with a pending check-in closes a [`Session`];
//! - a check-out with nothing pending is counted as unmatched and ignored;
//! - a check-in still pending at the end is counted as unmatched and does
//!   not accrue hours.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use crate::models::{AttendanceEvent, EventKind, Session, SessionAccounting, WeekWindow};

const MILLIS_PER_HOUR: i64 = 3_600_000;

/// Returns the hours between two instants at millisecond resolution.
///
/// Negative spans produce negative hours; callers decide how to treat them.
///
/// # Example
///
/// ```
/// use timeclock_engine::calculation::hours_between;
/// use chrono::{TimeZone, Utc};
/// use rust_decimal::Decimal;
///
/// let start = Utc.with_ymd_and_hms(2026, 1, 12, 9, 0, 0).unwrap();
/// let end = Utc.with_ymd_and_hms(2026, 1, 12, 17, 30, 0).unwrap();
/// assert_eq!(hours_between(start, end), Decimal::new(85, 1));
/// ```
pub fn hours_between(start: DateTime<Utc>, end: DateTime<Utc>) -> Decimal {
    let millis = (end - start).num_milliseconds();
    Decimal::from(millis) / Decimal::from(MILLIS_PER_HOUR)
}

/// Pairs one employee's events into sessions.
///
/// Events may arrive in any order; they are sorted by timestamp first, with
/// ties kept in their given order. All events are assumed to belong to the
/// same employee.
///
/// # Example
///
/// ```
/// use timeclock_engine::calculation::pair_sessions;
/// use timeclock_engine::models::{AttendanceEvent, EventKind};
/// use chrono::{TimeZone, Utc};
/// use rust_decimal::Decimal;
///
/// let punch = |h: u32, kind: EventKind| AttendanceEvent {
///     timestamp: Utc.with_ymd_and_hms(2026, 1, 12, h, 0, 0).unwrap(),
///     employee_id: "E001".to_string(),
///     employee_name: "Alice".to_string(),
///     kind,
///     latitude: 0.0,
///     longitude: 0.0,
///     location_valid: true,
/// };
///
/// let accounting = pair_sessions(&[punch(9, EventKind::CheckIn), punch(17, EventKind::CheckOut)]);
/// assert_eq!(accounting.sessions.len(), 1);
/// assert_eq!(accounting.total_hours(), Decimal::new(8, 0));
/// ```
pub fn pair_sessions(events: &[AttendanceEvent]) -> SessionAccounting {
    let mut ordered: Vec<&AttendanceEvent> = events.iter().collect();
    ordered.sort_by_key(|e| e.timestamp);

    let mut accounting = SessionAccounting::default();
    let mut pending: Option<&AttendanceEvent> = None;

    for event in ordered {
        match event.kind {
            EventKind::CheckIn => {
                if pending.replace(event).is_some() {
                    accounting.unmatched_check_ins += 1;
                }
            }
            EventKind::CheckOut => match pending.take() {
                Some(check_in) => accounting.sessions.push(Session {
                    employee_id: check_in.employee_id.clone(),
                    check_in: check_in.timestamp,
                    check_out: event.timestamp,
                    duration_hours: hours_between(check_in.timestamp, event.timestamp),
                }),
                None => accounting.unmatched_check_outs += 1,
            },
        }
    }

    if pending.is_some() {
        accounting.unmatched_check_ins += 1;
    }

    accounting
}

/// Pairs the events that fall inside `window`.
///
/// Events outside the window are ignored entirely, so a session that
/// straddles a week boundary shows up as an unmatched check-in in one week
/// and an unmatched check-out in the next.
pub fn account_window(events: &[AttendanceEvent], window: &WeekWindow) -> SessionAccounting {
    let in_window: Vec<AttendanceEvent> = events
        .iter()
        .filter(|e| window.contains(e.timestamp))
        .cloned()
        .collect();
    pair_sessions(&in_window)
}
