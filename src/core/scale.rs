use chrono::{NaiveDate, NaiveDateTime, TimeDelta};
use serde::{Deserialize, Serialize};

use crate::core::primitives::{MILLIS_PER_DAY, day_start, naive_to_millis};
use crate::core::{DateWindow, VisualScale, ZoomLevel};

/// Resolved horizontal density for one layout pass.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineScale {
    pub zoom_level: ZoomLevel,
    pub visual_scale: VisualScale,
    pub pixels_per_day: f64,
    pub total_width: f64,
}

impl TimelineScale {
    /// `pixels_per_day = base[zoom] * scale`, `total_width = days * pixels_per_day`.
    ///
    /// The scale is clamped through [`VisualScale::new`], so the result is
    /// always finite and strictly positive.
    #[must_use]
    pub fn resolve(zoom_level: ZoomLevel, visual_scale: f64, window: DateWindow) -> Self {
        let visual_scale = VisualScale::new(visual_scale);
        let pixels_per_day = zoom_level.profile().base_pixels_per_day * visual_scale.get();
        Self {
            zoom_level,
            visual_scale,
            pixels_per_day,
            total_width: window.span_days() * pixels_per_day,
        }
    }

    #[must_use]
    pub fn mapper(self, window: DateWindow) -> CoordinateMapper {
        CoordinateMapper::new(window, self.pixels_per_day)
    }
}

/// Single source of truth for date to pixel conversion.
///
/// Positions are linear over millisecond timestamps and clamped to
/// `[0, total_width]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoordinateMapper {
    start: NaiveDateTime,
    start_ms: i64,
    span_ms: i64,
    total_width: f64,
}

impl CoordinateMapper {
    #[must_use]
    pub fn new(window: DateWindow, pixels_per_day: f64) -> Self {
        let start = day_start(window.start_date());
        let start_ms = naive_to_millis(start);
        let end_ms = naive_to_millis(day_start(window.end_date()));
        Self {
            start,
            start_ms,
            span_ms: end_ms - start_ms,
            total_width: window.span_days() * pixels_per_day,
        }
    }

    #[must_use]
    pub fn total_width(self) -> f64 {
        self.total_width
    }

    #[must_use]
    pub fn day_to_x(self, day: NaiveDate) -> f64 {
        self.datetime_to_x(day_start(day))
    }

    #[must_use]
    pub fn datetime_to_x(self, instant: NaiveDateTime) -> f64 {
        let offset_ms = naive_to_millis(instant) - self.start_ms;
        if offset_ms <= 0 {
            return 0.0;
        }
        if offset_ms >= self.span_ms {
            return self.total_width;
        }
        // Multiply first so day-aligned offsets land on exact pixels.
        offset_ms as f64 * self.total_width / self.span_ms as f64
    }

    /// Inverse mapping; `x` is clamped to the canvas first.
    #[must_use]
    pub fn x_to_datetime(self, x: f64) -> NaiveDateTime {
        if !x.is_finite() || self.total_width <= 0.0 || self.span_ms <= 0 {
            return self.start;
        }
        let normalized = (x / self.total_width).clamp(0.0, 1.0);
        let offset_ms = (normalized * self.span_ms as f64).round() as i64;
        self.start + TimeDelta::milliseconds(offset_ms)
    }

    /// Width of one day on the canvas.
    #[must_use]
    pub fn pixels_per_day(self) -> f64 {
        if self.span_ms <= 0 {
            return self.total_width;
        }
        self.total_width * MILLIS_PER_DAY / self.span_ms as f64
    }
}
