//! Calendar-day arithmetic shared by the scheduler and the Gantt layout.
//!
//! Everything here works on [`Date`], so "start of day" and "end of day" are
//! implicit: an instant is normalized to its local calendar day once, at the
//! edge, via [`normalize_instant`].

use crate::error::AppError;
use serde::{Deserialize, Serialize};
use time::format_description::well_known::Rfc3339;
use time::macros::format_description;
use time::{Date, Duration, Month, OffsetDateTime, UtcOffset, Weekday};

const DATE_FORMAT: &[time::format_description::FormatItem<'static>] =
    format_description!("[year]-[month]-[day]");

/// Inclusive range of calendar days.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Interval {
    pub start: Date,
    pub end: Date,
}

impl Interval {
    pub fn new(start: Date, end: Date) -> Self {
        Self { start, end }
    }

    /// Number of days covered, counting both ends. Zero or negative when the
    /// interval is inverted.
    pub fn len_days(&self) -> i64 {
        days_between(self.start, self.end) + 1
    }
}

pub fn add_days(date: Date, days: i64) -> Date {
    date.saturating_add(Duration::days(days))
}

/// Whole days from `start` to `end`; negative when `end` precedes `start`.
pub fn days_between(start: Date, end: Date) -> i64 {
    (end - start).whole_days()
}

pub fn start_of_month(date: Date) -> Date {
    date.replace_day(1).unwrap_or(date)
}

pub fn end_of_month(date: Date) -> Date {
    let (year, month) = match date.month() {
        Month::December => (date.year() + 1, Month::January),
        month => (date.year(), month.next()),
    };

    Date::from_calendar_date(year, month, 1)
        .ok()
        .and_then(Date::previous_day)
        .unwrap_or(date)
}

pub fn is_first_of_year(date: Date) -> bool {
    date.month() == Month::January && date.day() == 1
}

pub fn is_weekend(date: Date) -> bool {
    matches!(date.weekday(), Weekday::Saturday | Weekday::Sunday)
}

/// Every day from `start` through `end`. Empty when the range is inverted.
pub fn day_sequence(start: Date, end: Date) -> Vec<Date> {
    let mut days = Vec::new();
    let mut current = Some(start);

    while let Some(day) = current {
        if day > end {
            break;
        }
        days.push(day);
        current = day.next_day();
    }

    days
}

pub fn normalize_instant(instant: OffsetDateTime, offset: UtcOffset) -> Date {
    instant.to_offset(offset).date()
}

pub fn local_offset() -> UtcOffset {
    UtcOffset::current_local_offset().unwrap_or(UtcOffset::UTC)
}

pub fn today() -> Date {
    normalize_instant(OffsetDateTime::now_utc(), local_offset())
}

/// Accepts `YYYY-MM-DD` or a full RFC 3339 timestamp (reduced to its local day).
pub fn parse_date(raw: &str) -> Result<Date, AppError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(AppError::invalid_input("date is required"));
    }

    if let Ok(date) = Date::parse(trimmed, DATE_FORMAT) {
        return Ok(date);
    }

    OffsetDateTime::parse(trimmed, &Rfc3339)
        .map(|instant| normalize_instant(instant, local_offset()))
        .map_err(|_| AppError::invalid_input(format!("invalid date '{trimmed}', expected YYYY-MM-DD")))
}

pub fn format_date(date: Date) -> String {
    date.format(DATE_FORMAT)
        .unwrap_or_else(|_| date.to_string())
}
