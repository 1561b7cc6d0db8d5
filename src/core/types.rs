use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::core::primitives::{parse_event_day, parse_time_of_day};
use crate::error::TimelineResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl Priority {
    /// Ordering weight used when a cluster picks its display priority.
    #[must_use]
    pub fn rank(self) -> u8 {
        match self {
            Self::High => 3,
            Self::Medium => 2,
            Self::Low => 1,
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::High => "High",
            Self::Medium => "Medium",
            Self::Low => "Low",
        }
    }

    /// Marker color for dot and mini cards.
    #[must_use]
    pub fn color(self) -> &'static str {
        match self {
            Self::High => "#DC2626",
            Self::Medium => "#D97706",
            Self::Low => "#16A34A",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventStatus {
    #[serde(rename = "Not Started", alias = "NotStarted")]
    NotStarted,
    #[serde(rename = "In Progress", alias = "InProgress")]
    InProgress,
    Completed,
}

impl EventStatus {
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::NotStarted => "Not Started",
            Self::InProgress => "In Progress",
            Self::Completed => "Completed",
        }
    }

    #[must_use]
    pub fn glyph(self) -> char {
        match self {
            Self::NotStarted => '○',
            Self::InProgress => '◐',
            Self::Completed => '●',
        }
    }
}

/// Event record as delivered by the data layer.
///
/// `date` and the optional times are kept as raw strings: the layout pass
/// parses them and reports records it cannot place instead of failing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: String,
    pub title: String,
    pub date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<String>,
    pub priority: Priority,
    pub status: EventStatus,
    pub category_id: String,
}

impl Event {
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        date: impl Into<String>,
        category_id: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            date: date.into(),
            time: None,
            end_time: None,
            priority: Priority::Medium,
            status: EventStatus::NotStarted,
            category_id: category_id.into(),
        }
    }

    #[must_use]
    pub fn with_time(mut self, time: impl Into<String>) -> Self {
        self.time = Some(time.into());
        self
    }

    #[must_use]
    pub fn with_end_time(mut self, end_time: impl Into<String>) -> Self {
        self.end_time = Some(end_time.into());
        self
    }

    #[must_use]
    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    #[must_use]
    pub fn with_status(mut self, status: EventStatus) -> Self {
        self.status = status;
        self
    }

    /// Calendar day of the event, ignoring any time-of-day component.
    pub fn day(&self) -> TimelineResult<NaiveDate> {
        parse_event_day(&self.date)
    }

    /// Start time, when present and well-formed.
    #[must_use]
    pub fn start_time(&self) -> Option<NaiveTime> {
        self.time.as_deref().and_then(|raw| parse_time_of_day(raw).ok())
    }

    #[must_use]
    pub fn finish_time(&self) -> Option<NaiveTime> {
        self.end_time
            .as_deref()
            .and_then(|raw| parse_time_of_day(raw).ok())
    }

    /// Sort key inside a day bucket: raw start time, missing sorts first.
    #[must_use]
    pub fn time_sort_key(&self) -> &str {
        self.time.as_deref().unwrap_or("")
    }

    /// Duration in whole minutes when both times are valid and end > start.
    #[must_use]
    pub fn duration_minutes(&self) -> Option<i64> {
        let start = self.start_time()?;
        let end = self.finish_time()?;
        let minutes = (end - start).num_minutes();
        (minutes > 0).then_some(minutes)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: String,
    pub name: String,
    pub color: String,
}

impl Category {
    #[must_use]
    pub fn new(id: impl Into<String>, name: impl Into<String>, color: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            color: color.into(),
        }
    }
}
