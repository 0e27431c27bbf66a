//! Week windows used for reporting and payroll.
//!
//! A [`WeekWindow`] covers seven local calendar days starting at 00:00:00.000
//! on the configured first weekday and ending at 23:59:59.999 on the last.
//! It is stored as the half-open UTC interval `[start, end)`.

use chrono::{DateTime, Datelike, Duration, FixedOffset, NaiveDate, NaiveTime, Utc, Weekday};
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

/// The weekday a pay week starts on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeekStartDay {
    /// Weeks run Monday through Sunday.
    #[default]
    Monday,
    /// Weeks run Tuesday through Monday.
    Tuesday,
    /// Weeks run Wednesday through Tuesday.
    Wednesday,
    /// Weeks run Thursday through Wednesday.
    Thursday,
    /// Weeks run Friday through Thursday.
    Friday,
    /// Weeks run Saturday through Friday.
    Saturday,
    /// Weeks run Sunday through Saturday.
    Sunday,
}

impl WeekStartDay {
    /// The matching chrono weekday.
    pub fn weekday(self) -> Weekday {
        match self {
            WeekStartDay::Monday => Weekday::Mon,
            WeekStartDay::Tuesday => Weekday::Tue,
            WeekStartDay::Wednesday => Weekday::Wed,
            WeekStartDay::Thursday => Weekday::Thu,
            WeekStartDay::Friday => Weekday::Fri,
            WeekStartDay::Saturday => Weekday::Sat,
            WeekStartDay::Sunday => Weekday::Sun,
        }
    }
}

/// A seven-day aggregation window.
///
/// # Example
///
/// ```
/// use timeclock_engine::models::{WeekStartDay, WeekWindow};
/// use chrono::{FixedOffset, NaiveDate};
///
/// let utc = FixedOffset::east_opt(0).unwrap();
/// // 2026-01-15 is a Thursday
/// let window = WeekWindow::for_date(
///     NaiveDate::from_ymd_opt(2026, 1, 15).unwrap(),
///     utc,
///     WeekStartDay::Monday,
/// )
/// .unwrap();
/// assert_eq!(window.week_start, NaiveDate::from_ymd_opt(2026, 1, 12).unwrap());
/// assert_eq!(window.week_end(), NaiveDate::from_ymd_opt(2026, 1, 18).unwrap());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeekWindow {
    /// Local calendar date of the first day of the week.
    pub week_start: NaiveDate,
    /// First instant of the week (inclusive).
    pub start: DateTime<Utc>,
    /// First instant after the week (exclusive).
    pub end: DateTime<Utc>,
    /// The local offset the window was computed in.
    pub offset: FixedOffset,
}

impl WeekWindow {
    /// Returns the window containing the local calendar date `date`.
    ///
    /// Dates whose week cannot be represented as UTC instants are rejected
    /// with [`EngineError::MalformedRequest`] on `week_of`.
    pub fn for_date(
        date: NaiveDate,
        offset: FixedOffset,
        week_start: WeekStartDay,
    ) -> EngineResult<Self> {
        let out_of_range = || {
            EngineError::malformed(
                "week_of",
                format!("{} is outside the supported date range", date),
            )
        };

        let first = week_start.weekday().num_days_from_monday();
        let today = date.weekday().num_days_from_monday();
        let days_back = (today + 7 - first) % 7;
        let week_start_date = date
            .checked_sub_signed(Duration::days(i64::from(days_back)))
            .ok_or_else(out_of_range)?;

        let start = week_start_date
            .and_time(NaiveTime::MIN)
            .checked_sub_signed(Duration::seconds(i64::from(offset.local_minus_utc())))
            .ok_or_else(out_of_range)?
            .and_utc();
        let end = start
            .checked_add_signed(Duration::days(7))
            .ok_or_else(out_of_range)?;

        Ok(Self {
            week_start: week_start_date,
            start,
            end,
            offset,
        })
    }

    /// Returns the window containing `instant` as seen in the local offset.
    pub fn containing(
        instant: DateTime<Utc>,
        offset: FixedOffset,
        week_start: WeekStartDay,
    ) -> EngineResult<Self> {
        Self::for_date(instant.with_timezone(&offset).date_naive(), offset, week_start)
    }

    /// Returns true if `instant` falls inside the window.
    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        instant >= self.start && instant < self.end
    }

    /// Local calendar date of the last day of the week.
    pub fn week_end(&self) -> NaiveDate {
        self.week_start + Duration::days(6)
    }

    /// The last millisecond inside the window (23:59:59.999 local on the last day).
    pub fn last_instant(&self) -> DateTime<Utc> {
        self.end - Duration::milliseconds(1)
    }
}
