use serde::{Deserialize, Serialize};

use crate::core::{DateWindow, TimelineScale};
use crate::error::{TimelineError, TimelineResult};
use crate::persistence::ViewMode;

use super::axis_ticks::AxisTick;
use super::event_layout::{EventPosition, SkippedEvent};
use super::now_marker::NowMarker;
use super::swimlane::Swimlane;

/// Everything the rendering surface needs for one frame.
///
/// Recomputed wholesale on every pass; consumers treat it as immutable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineFrame {
    pub window: DateWindow,
    pub scale: TimelineScale,
    pub view_mode: ViewMode,
    pub lanes: Vec<Swimlane>,
    pub ticks: Vec<AxisTick>,
    pub now_marker: NowMarker,
    pub skipped: Vec<SkippedEvent>,
    pub total_width: f64,
    pub total_height: f64,
}

impl TimelineFrame {
    /// All positioned markers across lanes, lane by lane.
    pub fn positions(&self) -> impl Iterator<Item = &EventPosition> {
        self.lanes.iter().flat_map(|lane| lane.positions.iter())
    }

    #[must_use]
    pub fn position(&self, event_id: &str) -> Option<&EventPosition> {
        self.positions().find(|position| position.event_id == event_id)
    }

    pub fn validate(&self) -> TimelineResult<()> {
        if self.window.start_date() > self.window.end_date() {
            return Err(TimelineError::InvalidData(
                "frame window start is after its end".to_owned(),
            ));
        }
        if !self.total_width.is_finite() || self.total_width <= 0.0 {
            return Err(TimelineError::InvalidData(format!(
                "frame width must be finite and > 0, got {}",
                self.total_width
            )));
        }
        if !self.total_height.is_finite() || self.total_height < 0.0 {
            return Err(TimelineError::InvalidData(format!(
                "frame height must be finite and >= 0, got {}",
                self.total_height
            )));
        }

        let on_canvas = |x: f64| x.is_finite() && (0.0..=self.total_width).contains(&x);
        for position in self.positions() {
            if !on_canvas(position.x_position) {
                return Err(TimelineError::InvalidData(format!(
                    "marker `{}` x {} is off canvas",
                    position.event_id, position.x_position
                )));
            }
            if !(position.width.is_finite() && position.width > 0.0)
                || !(position.height.is_finite() && position.height > 0.0)
                || !(position.y_position.is_finite() && position.y_position >= 0.0)
            {
                return Err(TimelineError::InvalidData(format!(
                    "marker `{}` has degenerate geometry",
                    position.event_id
                )));
            }
        }

        let mut previous = f64::NEG_INFINITY;
        for tick in &self.ticks {
            if !on_canvas(tick.x) || tick.x < previous {
                return Err(TimelineError::InvalidData(format!(
                    "axis tick {} at x {} is off canvas or out of order",
                    tick.date, tick.x
                )));
            }
            previous = tick.x;
        }

        if !on_canvas(self.now_marker.x) {
            return Err(TimelineError::InvalidData(format!(
                "now marker x {} is off canvas",
                self.now_marker.x
            )));
        }
        Ok(())
    }
}
