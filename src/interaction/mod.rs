use indexmap::IndexSet;
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::api::EventPosition;

/// z-index floor for markers raised by hover; above any layout-assigned z.
pub const HOVER_Z_BASE: i64 = 1 << 40;
/// Recently hovered markers kept raised, oldest dropped first.
pub const HOVER_HISTORY_LIMIT: usize = 16;

/// Recency-of-interaction ordering for hovered markers.
///
/// The marker under the pointer draws above everything; markers hovered
/// earlier stay raised above the layout order, most recent on top.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HoverStack {
    recent: IndexSet<String>,
    hovered: Option<String>,
}

impl HoverStack {
    #[must_use]
    pub fn hovered(&self) -> Option<&str> {
        self.hovered.as_deref()
    }

    pub fn on_pointer_enter(&mut self, event_id: impl Into<String>) {
        let event_id = event_id.into();
        self.recent.shift_remove(&event_id);
        self.recent.insert(event_id.clone());
        while self.recent.len() > HOVER_HISTORY_LIMIT {
            self.recent.shift_remove_index(0);
        }
        trace!(event_id = %event_id, "hover raise");
        self.hovered = Some(event_id);
    }

    pub fn on_pointer_leave(&mut self, event_id: &str) {
        if self.hovered.as_deref() == Some(event_id) {
            self.hovered = None;
        }
    }

    pub fn clear(&mut self) {
        self.recent.clear();
        self.hovered = None;
    }

    /// z-index override for `event_id`, if it was interacted with.
    #[must_use]
    pub fn z_index_for(&self, event_id: &str) -> Option<i64> {
        if self.hovered.as_deref() == Some(event_id) {
            return Some(HOVER_Z_BASE + HOVER_HISTORY_LIMIT as i64);
        }
        self.recent
            .get_index_of(event_id)
            .map(|rank| HOVER_Z_BASE + rank as i64)
    }

    /// Applies hover ordering on top of layout-assigned z values.
    pub fn apply(&self, positions: &mut [EventPosition]) {
        if self.recent.is_empty() {
            return;
        }
        for position in positions {
            if let Some(z_index) = self.z_index_for(&position.event_id) {
                position.z_index = z_index;
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NowVisibility {
    Visible,
    Hidden,
}

impl NowVisibility {
    /// The "jump to today" control is offered only while the marker is off screen.
    #[must_use]
    pub fn offers_jump_to_now(self) -> bool {
        self == Self::Hidden
    }
}

/// Reports transitions of the now marker in and out of the viewport.
///
/// Visibility uses the viewport shrunk by `margin_px` on both sides, so a
/// marker hugging the edge already counts as hidden.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NowMarkerObserver {
    margin_px: f64,
    last: Option<NowVisibility>,
}

impl NowMarkerObserver {
    #[must_use]
    pub fn new(margin_px: f64) -> Self {
        let margin_px = if margin_px.is_finite() {
            margin_px.max(0.0)
        } else {
            0.0
        };
        Self {
            margin_px,
            last: None,
        }
    }

    #[must_use]
    pub fn current(&self) -> Option<NowVisibility> {
        self.last
    }

    #[must_use]
    pub fn classify(&self, marker_x: f64, scroll_left: f64, viewport_width: f64) -> NowVisibility {
        let viewport_width = viewport_width.max(0.0);
        let (mut left, mut right) = (
            scroll_left + self.margin_px,
            scroll_left + viewport_width - self.margin_px,
        );
        if left > right {
            left = scroll_left;
            right = scroll_left + viewport_width;
        }
        if (left..=right).contains(&marker_x) {
            NowVisibility::Visible
        } else {
            NowVisibility::Hidden
        }
    }

    /// Returns the new visibility when it differs from the last observation.
    pub fn observe(
        &mut self,
        marker_x: f64,
        scroll_left: f64,
        viewport_width: f64,
    ) -> Option<NowVisibility> {
        let visibility = self.classify(marker_x, scroll_left, viewport_width);
        if self.last == Some(visibility) {
            return None;
        }
        trace!(?visibility, marker_x, scroll_left, "now marker visibility changed");
        self.last = Some(visibility);
        Some(visibility)
    }

    pub fn disconnect(&mut self) {
        self.last = None;
    }
}
