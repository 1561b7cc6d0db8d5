use std::iter::FusedIterator;

use chrono::{Datelike, Months, NaiveDateTime, NaiveTime, TimeDelta, Timelike};
use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::primitives::day_start;
use crate::core::{CoordinateMapper, DateWindow, Granularity, TimelineScale};

use super::event_layout::EventPosition;

/// Default pixel drift tolerated between a tick and a card on the same day.
pub const DEFAULT_ALIGNMENT_TOLERANCE_PX: f64 = 2.0;

/// One ruler mark.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AxisTick {
    pub date: NaiveDateTime,
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub month_label: Option<String>,
    pub x: f64,
    /// Coarser boundary: drawn with a longer mark and a bolder label.
    pub is_primary: bool,
}

/// Lazy, finite ruler sequence from window start to window end (inclusive).
///
/// Cloning the generator (or calling [`AxisTicks::restart`]) replays the
/// sequence from the first tick.
#[derive(Debug, Clone)]
pub struct AxisTicks {
    mapper: CoordinateMapper,
    granularity: Granularity,
    hour_step: i64,
    first: Option<NaiveDateTime>,
    current: Option<NaiveDateTime>,
    end: NaiveDateTime,
    previous_month: Option<u32>,
}

impl AxisTicks {
    /// Builds the ruler for `window` at the scale's zoom granularity.
    ///
    /// Hourly rulers step by six hours (aligned to 0/6/12/18) while the visual
    /// scale is at or below `reduce_threshold`.
    #[must_use]
    pub fn new(window: DateWindow, scale: TimelineScale, reduce_threshold: f64) -> Self {
        let granularity = scale.zoom_level.profile().granularity;
        let reduced_hourly =
            granularity == Granularity::Hour && scale.visual_scale.get() <= reduce_threshold;
        let hour_step = if reduced_hourly { 6 } else { 1 };

        let mut first = day_start(window.start_date());
        if reduced_hourly {
            let aligned_hour = first.hour() / 6 * 6;
            first = first
                .with_hour(aligned_hour)
                .and_then(|t| t.with_minute(0))
                .unwrap_or(first);
        }

        Self {
            mapper: scale.mapper(window),
            granularity,
            hour_step,
            first: Some(first),
            current: Some(first),
            end: day_start(window.end_date()),
            previous_month: None,
        }
    }

    #[must_use]
    pub fn granularity(&self) -> Granularity {
        self.granularity
    }

    /// Fresh generator positioned at the first tick.
    #[must_use]
    pub fn restart(&self) -> Self {
        Self {
            current: self.first,
            previous_month: None,
            ..self.clone()
        }
    }

    fn advance(&self, from: NaiveDateTime) -> Option<NaiveDateTime> {
        let next = match self.granularity {
            Granularity::Hour => from.checked_add_signed(TimeDelta::hours(self.hour_step)),
            Granularity::Day => from.checked_add_signed(TimeDelta::days(1)),
            Granularity::Week => from.checked_add_signed(TimeDelta::weeks(1)),
            Granularity::Month => from.checked_add_months(Months::new(1)),
        }?;
        // Strict monotonicity is what bounds the walk.
        (next > from).then_some(next)
    }

    fn describe(&mut self, date: NaiveDateTime) -> (String, Option<String>, bool) {
        match self.granularity {
            Granularity::Hour => {
                let label = date.format("%-I %p").to_string();
                let hour = date.hour();
                let month_label = (hour == 0).then(|| date.format("%b %-d").to_string());
                // Six-hour rulers mark midnight and noon, hourly ones every sixth hour.
                let is_primary = if self.hour_step == 6 {
                    hour % 12 == 0
                } else {
                    hour % 6 == 0
                };
                (label, month_label, is_primary)
            }
            Granularity::Day => {
                let label = date.day().to_string();
                let first_of_month = date.day() == 1;
                let month_label = first_of_month.then(|| date.format("%b").to_string());
                (label, month_label, first_of_month)
            }
            Granularity::Week => {
                let label = date.day().to_string();
                let month = date.month();
                if self.previous_month != Some(month) {
                    self.previous_month = Some(month);
                    (label, Some(date.format("%b").to_string()), true)
                } else {
                    (label, None, date.day() <= 7)
                }
            }
            Granularity::Month => {
                let label = date.format("%b").to_string();
                (label, None, date.month0() % 3 == 0)
            }
        }
    }
}

impl Iterator for AxisTicks {
    type Item = AxisTick;

    fn next(&mut self) -> Option<Self::Item> {
        let date = self.current.filter(|date| *date <= self.end)?;
        self.current = self.advance(date);

        let (label, month_label, is_primary) = self.describe(date);
        Some(AxisTick {
            date,
            label,
            month_label,
            x: self.mapper.datetime_to_x(date),
            is_primary,
        })
    }
}

impl FusedIterator for AxisTicks {}

/// Day where a ruler tick and the stack-0 card on that day disagree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlignmentDrift {
    pub date: NaiveDateTime,
    pub tick_x: f64,
    pub card_x: f64,
}

/// Compares day-boundary ticks with the stack-0 card of the same day.
///
/// Only ticks that fall on midnight are checked; hourly ticks inside a day
/// have no card counterpart. Result is ordered by date, then drift size.
#[must_use]
pub fn validate_axis_alignment(
    ticks: &[AxisTick],
    positions: &[EventPosition],
    tolerance_px: f64,
) -> Vec<AlignmentDrift> {
    let mut drifts: Vec<AlignmentDrift> = ticks
        .iter()
        .filter(|tick| tick.date.time() == NaiveTime::MIN)
        .flat_map(|tick| {
            positions
                .iter()
                .filter(move |position| {
                    position.stack_index == 0 && position.day == tick.date.date()
                })
                .filter(move |position| (position.x_position - tick.x).abs() > tolerance_px)
                .map(move |position| AlignmentDrift {
                    date: tick.date,
                    tick_x: tick.x,
                    card_x: position.x_position,
                })
        })
        .collect();

    drifts.sort_by_key(|drift| (drift.date, OrderedFloat((drift.card_x - drift.tick_x).abs())));
    if !drifts.is_empty() {
        debug!(count = drifts.len(), tolerance_px, "axis and cards drifted apart");
    }
    drifts
}
