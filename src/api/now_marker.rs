use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::core::{DateWindow, TimelineScale};

/// Vertical "today" indicator.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NowMarker {
    pub date: NaiveDate,
    /// Canvas x of today's midnight, clamped like every other date.
    pub x: f64,
    pub in_window: bool,
}

impl NowMarker {
    #[must_use]
    pub fn locate(today: NaiveDate, window: DateWindow, scale: TimelineScale) -> Self {
        Self {
            date: today,
            x: scale.mapper(window).day_to_x(today),
            in_window: window.contains(today),
        }
    }

    /// Scroll offset that centers the marker in a viewport of `viewport_width`.
    #[must_use]
    pub fn jump_to_now_offset(self, viewport_width: f64) -> f64 {
        let half = if viewport_width.is_finite() {
            viewport_width.max(0.0) / 2.0
        } else {
            0.0
        };
        (self.x - half).max(0.0)
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::NowMarker;
    use crate::core::{DateWindow, TimelineScale, ZoomLevel};

    fn day(raw: &str) -> NaiveDate {
        NaiveDate::parse_from_str(raw, "%Y-%m-%d").expect("test date")
    }

    #[test]
    fn marker_centers_in_viewport_without_negative_offset() {
        let window = DateWindow::default_for(day("2025-06-15"));
        let scale = TimelineScale::resolve(ZoomLevel::Week, 1.0, window);
        let marker = NowMarker::locate(day("2025-06-15"), window, scale);

        assert!(marker.in_window);
        assert_eq!(marker.x, 14.0 * 20.0);
        assert_eq!(marker.jump_to_now_offset(200.0), 180.0);
        assert_eq!(marker.jump_to_now_offset(1200.0), 0.0);
    }

    #[test]
    fn marker_outside_window_clamps_to_edge() {
        let window = DateWindow::new(day("2025-01-01"), day("2025-02-01")).expect("window");
        let scale = TimelineScale::resolve(ZoomLevel::Month, 1.0, window);
        let marker = NowMarker::locate(day("2025-06-15"), window, scale);
        assert!(!marker.in_window);
        assert_eq!(marker.x, scale.total_width);
    }
}
