use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{TimelineError, TimelineResult};

/// Storage keys and write pacing shared by view-state and scroll persistence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistenceConfig {
    /// Quiet period after the last change before a write happens.
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
    /// Scroll entries kept when pruning storage after a quota failure.
    #[serde(default = "default_retain_recent_keys")]
    pub retain_recent_keys: usize,
    #[serde(default = "default_view_state_key")]
    pub view_state_key: String,
    #[serde(default = "default_scroll_key_prefix")]
    pub scroll_key_prefix: String,
    /// Keys containing this marker are candidates for quota pruning.
    #[serde(default = "default_prunable_key_marker")]
    pub prunable_key_marker: String,
}

impl Default for PersistenceConfig {
    fn default() -> Self {
        Self {
            debounce_ms: default_debounce_ms(),
            retain_recent_keys: default_retain_recent_keys(),
            view_state_key: default_view_state_key(),
            scroll_key_prefix: default_scroll_key_prefix(),
            prunable_key_marker: default_prunable_key_marker(),
        }
    }
}

impl PersistenceConfig {
    #[must_use]
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    /// Storage key holding the scroll offset of one timeline.
    #[must_use]
    pub fn scroll_key(&self, timeline_id: &str) -> String {
        format!("{}{timeline_id}", self.scroll_key_prefix)
    }

    pub fn validate(self) -> TimelineResult<Self> {
        for (value, name) in [
            (&self.view_state_key, "view_state_key"),
            (&self.scroll_key_prefix, "scroll_key_prefix"),
            (&self.prunable_key_marker, "prunable_key_marker"),
        ] {
            if value.trim().is_empty() {
                return Err(TimelineError::InvalidData(format!(
                    "persistence config `{name}` must not be empty"
                )));
            }
        }
        if self.scroll_key_prefix.starts_with(&self.view_state_key) {
            return Err(TimelineError::InvalidData(
                "scroll keys must not share the view state key prefix".to_owned(),
            ));
        }
        Ok(self)
    }
}

fn default_debounce_ms() -> u64 {
    150
}

fn default_retain_recent_keys() -> usize {
    5
}

fn default_view_state_key() -> String {
    "timeline-view-state".to_owned()
}

fn default_scroll_key_prefix() -> String {
    "timeline-scroll-".to_owned()
}

fn default_prunable_key_marker() -> String {
    "scroll".to_owned()
}
