use std::fmt;
use std::str::FromStr;
use std::time::Instant;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::core::{VisualScale, ZoomLevel};
use crate::error::{TimelineError, TimelineResult};

use super::config::PersistenceConfig;
use super::debounce::DebouncedTask;
use super::storage::{KeyValueStore, WriteOutcome, write_with_quota_recovery};

/// Top-level arrangement of the timeline page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    /// One swimlane per category.
    #[default]
    Category,
    /// Single chronological lane.
    Timeline,
}

impl ViewMode {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Category => "category",
            Self::Timeline => "timeline",
        }
    }
}

impl fmt::Display for ViewMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ViewMode {
    type Err = TimelineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "category" => Ok(Self::Category),
            "timeline" => Ok(Self::Timeline),
            _ => Err(TimelineError::UnknownViewMode(s.to_owned())),
        }
    }
}

/// User view settings persisted across sessions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineViewState {
    pub view_mode: ViewMode,
    pub zoom_level: ZoomLevel,
    pub visual_scale: f64,
    pub scroll_position: f64,
    /// Milliseconds since the Unix epoch of the last change.
    #[serde(default)]
    pub timestamp: i64,
}

impl Default for TimelineViewState {
    fn default() -> Self {
        Self {
            view_mode: ViewMode::Category,
            zoom_level: ZoomLevel::Month,
            visual_scale: VisualScale::DEFAULT,
            scroll_position: 0.0,
            timestamp: 0,
        }
    }
}

impl TimelineViewState {
    pub fn validate(&self) -> TimelineResult<()> {
        if !VisualScale::is_valid(self.visual_scale) {
            return Err(TimelineError::InvalidData(format!(
                "persisted visual scale {} outside [{}, {}]",
                self.visual_scale,
                VisualScale::MIN,
                VisualScale::MAX
            )));
        }
        if !self.scroll_position.is_finite() || self.scroll_position < 0.0 {
            return Err(TimelineError::InvalidData(format!(
                "persisted scroll position {} must be finite and >= 0",
                self.scroll_position
            )));
        }
        Ok(())
    }

    /// Strict decode: every field must be present and within range.
    pub fn from_json_str(input: &str) -> TimelineResult<Self> {
        let state: Self = serde_json::from_str(input).map_err(|e| {
            TimelineError::Serialization(format!("failed to parse view state payload: {e}"))
        })?;
        state.validate()?;
        Ok(state)
    }

    /// Decodes `input`, or returns the full default when any field is off.
    ///
    /// Never merges a partially valid payload with defaults.
    #[must_use]
    pub fn from_json_or_default(input: &str) -> Self {
        Self::from_json_str(input).unwrap_or_else(|err| {
            warn!(error = %err, "discarding persisted view state");
            Self::default()
        })
    }

    pub fn to_json(&self) -> TimelineResult<String> {
        serde_json::to_string(self).map_err(|e| {
            TimelineError::Serialization(format!("failed to serialize view state: {e}"))
        })
    }

    #[must_use]
    pub fn visual_scale(&self) -> VisualScale {
        VisualScale::new(self.visual_scale)
    }
}

/// Milliseconds since the Unix epoch.
pub type WallClock = fn() -> i64;

fn system_wall_clock() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Owns the view state, restores it on creation and debounces its writes.
///
/// Storage failures are logged and absorbed; the in-memory state stays
/// authoritative either way.
#[derive(Debug)]
pub struct ViewStatePersistence<S: KeyValueStore> {
    store: S,
    config: PersistenceConfig,
    state: TimelineViewState,
    writes: DebouncedTask<TimelineViewState>,
    wall_clock: WallClock,
    torn_down: bool,
}

impl<S: KeyValueStore> ViewStatePersistence<S> {
    /// Restores from `store`, falling back to defaults on any problem.
    #[must_use]
    pub fn load(store: S, config: PersistenceConfig) -> Self {
        Self::load_with_clock(store, config, system_wall_clock)
    }

    #[must_use]
    pub fn load_with_clock(store: S, config: PersistenceConfig, wall_clock: WallClock) -> Self {
        let state = match store.get(&config.view_state_key) {
            Ok(Some(raw)) => match TimelineViewState::from_json_str(&raw) {
                Ok(restored) => TimelineViewState {
                    timestamp: wall_clock(),
                    ..restored
                },
                Err(err) => {
                    warn!(error = %err, "discarding persisted view state");
                    TimelineViewState::default()
                }
            },
            Ok(None) => TimelineViewState::default(),
            Err(err) => {
                warn!(error = %err, "view state storage unreadable, using defaults");
                TimelineViewState::default()
            }
        };
        debug!(
            view_mode = %state.view_mode,
            zoom = %state.zoom_level,
            visual_scale = state.visual_scale,
            "view state restored"
        );

        Self {
            writes: DebouncedTask::new(config.debounce()),
            store,
            config,
            state,
            wall_clock,
            torn_down: false,
        }
    }

    #[must_use]
    pub fn state(&self) -> &TimelineViewState {
        &self.state
    }

    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    #[must_use]
    pub fn into_store(self) -> S {
        self.store
    }

    #[must_use]
    pub fn has_pending_write(&self) -> bool {
        self.writes.is_pending()
    }

    pub fn set_view_mode(&mut self, view_mode: ViewMode, now: Instant) {
        self.update(now, |state| state.view_mode = view_mode);
    }

    pub fn set_zoom_level(&mut self, zoom_level: ZoomLevel, now: Instant) {
        self.update(now, |state| state.zoom_level = zoom_level);
    }

    /// Clamped into `[VisualScale::MIN, VisualScale::MAX]`.
    pub fn set_visual_scale(&mut self, visual_scale: f64, now: Instant) {
        let visual_scale = VisualScale::new(visual_scale).get();
        self.update(now, |state| state.visual_scale = visual_scale);
    }

    pub fn step_visual_scale_in(&mut self, now: Instant) {
        let next = self.state.visual_scale().step_in().get();
        self.update(now, |state| state.visual_scale = next);
    }

    pub fn step_visual_scale_out(&mut self, now: Instant) {
        let next = self.state.visual_scale().step_out().get();
        self.update(now, |state| state.visual_scale = next);
    }

    pub fn reset_visual_scale(&mut self, now: Instant) {
        self.update(now, |state| state.visual_scale = VisualScale::DEFAULT);
    }

    /// Negative or non-finite offsets become zero.
    pub fn set_scroll_position(&mut self, scroll_position: f64, now: Instant) {
        let scroll_position = if scroll_position.is_finite() {
            scroll_position.max(0.0)
        } else {
            0.0
        };
        self.update(now, |state| state.scroll_position = scroll_position);
    }

    pub fn reset(&mut self, now: Instant) {
        self.state = TimelineViewState::default();
        self.schedule(now);
    }

    /// Performs the debounced write once its quiet period has elapsed.
    pub fn poll(&mut self, now: Instant) -> Option<WriteOutcome> {
        let state = self.writes.poll(now)?;
        self.write(state)
    }

    /// Writes any pending change immediately.
    pub fn flush(&mut self) -> Option<WriteOutcome> {
        let state = self.writes.take_now()?;
        self.write(state)
    }

    /// Cancels the pending write; later changes stay in memory only.
    pub fn teardown(&mut self) -> bool {
        self.torn_down = true;
        let cancelled = self.writes.cancel();
        if cancelled {
            debug!("pending view state write cancelled on teardown");
        }
        cancelled
    }

    fn update(&mut self, now: Instant, apply: impl FnOnce(&mut TimelineViewState)) {
        apply(&mut self.state);
        self.state.timestamp = (self.wall_clock)();
        self.schedule(now);
    }

    fn schedule(&mut self, now: Instant) {
        if self.torn_down {
            return;
        }
        self.writes.schedule(self.state, now);
    }

    fn write(&mut self, state: TimelineViewState) -> Option<WriteOutcome> {
        let json = match state.to_json() {
            Ok(json) => json,
            Err(err) => {
                warn!(error = %err, "view state not written");
                return None;
            }
        };
        Some(write_with_quota_recovery(
            &mut self.store,
            &self.config.view_state_key,
            &json,
            &self.config.prunable_key_marker,
            self.config.retain_recent_keys,
        ))
    }
}
