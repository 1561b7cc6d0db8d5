use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

use crate::error::{TimelineError, TimelineResult};

pub const MILLIS_PER_DAY: f64 = 86_400_000.0;

/// Parses the calendar day of an event date.
///
/// Accepts `YYYY-MM-DD` and ISO date-times; only the date prefix before `T`
/// is used, so a `...T23:30:00Z` suffix never shifts the day.
pub fn parse_event_day(raw: &str) -> TimelineResult<NaiveDate> {
    let trimmed = raw.trim();
    let day_part = trimmed
        .split_once(['T', ' '])
        .map_or(trimmed, |(day, _)| day);
    NaiveDate::parse_from_str(day_part, "%Y-%m-%d").map_err(|_| TimelineError::InvalidDate {
        input: raw.to_owned(),
    })
}

/// Parses a 24h `HH:MM` or `HH:MM:SS` time of day.
pub fn parse_time_of_day(raw: &str) -> TimelineResult<NaiveTime> {
    let trimmed = raw.trim();
    NaiveTime::parse_from_str(trimmed, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(trimmed, "%H:%M:%S"))
        .map_err(|_| TimelineError::InvalidTime {
            input: raw.to_owned(),
        })
}

#[must_use]
pub fn day_start(day: NaiveDate) -> NaiveDateTime {
    day.and_time(NaiveTime::MIN)
}

/// Milliseconds since the epoch of a naive wall-clock instant.
#[must_use]
pub fn naive_to_millis(instant: NaiveDateTime) -> i64 {
    instant.and_utc().timestamp_millis()
}
