use serde::{Deserialize, Serialize};

use crate::error::{TimelineError, TimelineResult};

/// Layout tunables shared by every pass of a [`super::TimelineEngine`].
///
/// Serializable so hosts can keep layout setup next to their own settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutConfig {
    /// Individual cards shown per day before an overflow marker takes over.
    #[serde(default = "default_max_stack_count")]
    pub max_stack_count: usize,
    /// Vertical gap between cards stacked on the same side.
    #[serde(default = "default_stack_spacing_px")]
    pub stack_spacing_px: f64,
    #[serde(default = "default_lane_padding_px")]
    pub lane_padding_px: f64,
    #[serde(default = "default_empty_lane_height_px")]
    pub empty_lane_height_px: f64,
    #[serde(default = "default_title_max_chars")]
    pub title_max_chars: usize,
    #[serde(default = "default_mini_title_max_chars")]
    pub mini_title_max_chars: usize,
    /// At day zoom, scales at or below this value use 6-hour ruler ticks.
    #[serde(default = "default_hour_tick_reduce_threshold")]
    pub hour_tick_reduce_threshold: f64,
    #[serde(default = "default_now_visibility_margin_px")]
    pub now_visibility_margin_px: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            max_stack_count: default_max_stack_count(),
            stack_spacing_px: default_stack_spacing_px(),
            lane_padding_px: default_lane_padding_px(),
            empty_lane_height_px: default_empty_lane_height_px(),
            title_max_chars: default_title_max_chars(),
            mini_title_max_chars: default_mini_title_max_chars(),
            hour_tick_reduce_threshold: default_hour_tick_reduce_threshold(),
            now_visibility_margin_px: default_now_visibility_margin_px(),
        }
    }
}

impl LayoutConfig {
    pub fn validate(self) -> TimelineResult<Self> {
        if self.max_stack_count == 0 {
            return Err(TimelineError::InvalidData(
                "layout max stack count must be > 0".to_owned(),
            ));
        }
        if self.title_max_chars == 0 || self.mini_title_max_chars == 0 {
            return Err(TimelineError::InvalidData(
                "layout title limits must be > 0".to_owned(),
            ));
        }

        for (value, name) in [
            (self.stack_spacing_px, "stack_spacing_px"),
            (self.lane_padding_px, "lane_padding_px"),
            (self.now_visibility_margin_px, "now_visibility_margin_px"),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(TimelineError::InvalidData(format!(
                    "layout config `{name}` must be finite and >= 0"
                )));
            }
        }

        for (value, name) in [
            (self.empty_lane_height_px, "empty_lane_height_px"),
            (self.hour_tick_reduce_threshold, "hour_tick_reduce_threshold"),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(TimelineError::InvalidData(format!(
                    "layout config `{name}` must be finite and > 0"
                )));
            }
        }

        Ok(self)
    }
}

fn default_max_stack_count() -> usize {
    10
}

fn default_stack_spacing_px() -> f64 {
    8.0
}

fn default_lane_padding_px() -> f64 {
    32.0
}

fn default_empty_lane_height_px() -> f64 {
    64.0
}

fn default_title_max_chars() -> usize {
    50
}

fn default_mini_title_max_chars() -> usize {
    18
}

fn default_hour_tick_reduce_threshold() -> f64 {
    7.5
}

fn default_now_visibility_margin_px() -> f64 {
    100.0
}
