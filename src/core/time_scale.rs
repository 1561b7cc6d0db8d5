use chrono::{Days, Months, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::core::Event;
use crate::error::{TimelineError, TimelineResult};

/// Padding applied in front of the earliest event by [`DateWindow::fit_events`].
pub const FIT_LEAD_DAYS: u64 = 14;
/// Padding applied after the latest event by [`DateWindow::fit_events`].
pub const FIT_TRAIL_MONTHS: u32 = 1;
/// Look-ahead of the default window.
pub const DEFAULT_TRAIL_MONTHS: u32 = 2;

/// Calendar-day aligned window shown on the timeline.
///
/// `start <= end` always holds. A zero-length window is legal; scale math
/// treats it as spanning one day so widths never collapse to zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "RawDateWindow")]
pub struct DateWindow {
    start_date: NaiveDate,
    end_date: NaiveDate,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawDateWindow {
    start_date: NaiveDate,
    end_date: NaiveDate,
}

impl TryFrom<RawDateWindow> for DateWindow {
    type Error = TimelineError;

    fn try_from(raw: RawDateWindow) -> TimelineResult<Self> {
        Self::new(raw.start_date, raw.end_date)
    }
}

impl DateWindow {
    pub fn new(start_date: NaiveDate, end_date: NaiveDate) -> TimelineResult<Self> {
        if start_date > end_date {
            return Err(TimelineError::InvalidData(format!(
                "date window start {start_date} is after end {end_date}"
            )));
        }
        Ok(Self {
            start_date,
            end_date,
        })
    }

    /// `[today - 2 weeks, today + 2 months]`.
    #[must_use]
    pub fn default_for(today: NaiveDate) -> Self {
        let start_date = today.checked_sub_days(Days::new(FIT_LEAD_DAYS)).unwrap_or(today);
        let end_date = today
            .checked_add_months(Months::new(DEFAULT_TRAIL_MONTHS))
            .unwrap_or(today);
        Self {
            start_date,
            end_date,
        }
    }

    /// Window covering every parseable event date, padded by two weeks before
    /// the earliest and one month after the latest.
    ///
    /// Returns `None` when no event carries a parseable date.
    #[must_use]
    pub fn fit_events(events: &[Event]) -> Option<Self> {
        let mut days = events.iter().filter_map(|event| event.day().ok());
        let first = days.next()?;
        let (earliest, latest) = days.fold((first, first), |(min, max), day| {
            (min.min(day), max.max(day))
        });

        let start_date = earliest
            .checked_sub_days(Days::new(FIT_LEAD_DAYS))
            .unwrap_or(earliest);
        let end_date = latest
            .checked_add_months(Months::new(FIT_TRAIL_MONTHS))
            .unwrap_or(latest);
        Some(Self {
            start_date,
            end_date,
        })
    }

    #[must_use]
    pub fn start_date(self) -> NaiveDate {
        self.start_date
    }

    #[must_use]
    pub fn end_date(self) -> NaiveDate {
        self.end_date
    }

    /// Whole days between start and end (`0` for a zero-length window).
    #[must_use]
    pub fn day_count(self) -> i64 {
        (self.end_date - self.start_date).num_days()
    }

    /// Day count used for canvas sizing, never below one.
    #[must_use]
    pub fn span_days(self) -> f64 {
        self.day_count().max(1) as f64
    }

    #[must_use]
    pub fn contains(self, day: NaiveDate) -> bool {
        (self.start_date..=self.end_date).contains(&day)
    }

    /// Days from the window start, clamped into the window.
    #[must_use]
    pub fn day_offset(self, day: NaiveDate) -> i64 {
        (day - self.start_date).num_days().clamp(0, self.day_count())
    }
}
