use chrono::NaiveDate;
use tracing::debug;

use crate::core::{Category, DateWindow, Event, TimelineScale};
use crate::error::TimelineResult;
use crate::interaction::{HoverStack, NowMarkerObserver, NowVisibility};
use crate::persistence::{TimelineViewState, ViewMode};
use crate::render::Renderer;

use super::axis_ticks::AxisTicks;
use super::frame::TimelineFrame;
use super::now_marker::NowMarker;
use super::swimlane::{build_swimlanes, build_timeline_lane};
use super::LayoutConfig;

/// Read-only snapshot handed to one layout pass.
#[derive(Debug, Clone, Copy)]
pub struct FrameInput<'a> {
    pub events: &'a [Event],
    pub categories: &'a [Category],
    pub window: DateWindow,
    pub view: TimelineViewState,
    /// Caller-supplied "now" as a local calendar day.
    pub today: NaiveDate,
}

impl<'a> FrameInput<'a> {
    /// Snapshot over the default window around `today` with default view settings.
    #[must_use]
    pub fn new(events: &'a [Event], categories: &'a [Category], today: NaiveDate) -> Self {
        Self {
            events,
            categories,
            window: DateWindow::default_for(today),
            view: TimelineViewState::default(),
            today,
        }
    }

    #[must_use]
    pub fn with_window(mut self, window: DateWindow) -> Self {
        self.window = window;
        self
    }

    /// Fits the window to the events, keeping the current one when none parse.
    #[must_use]
    pub fn with_fitted_window(mut self) -> Self {
        if let Some(window) = DateWindow::fit_events(self.events) {
            self.window = window;
        }
        self
    }

    #[must_use]
    pub fn with_view(mut self, view: TimelineViewState) -> Self {
        self.view = view;
        self
    }
}

/// Orchestrates layout passes and hands frames to a renderer.
///
/// Layout itself is pure; the engine only adds hover ordering and the
/// now-marker observer on top.
pub struct TimelineEngine<R: Renderer> {
    renderer: R,
    config: LayoutConfig,
    hover: HoverStack,
    now_observer: NowMarkerObserver,
}

impl<R: Renderer> TimelineEngine<R> {
    pub fn new(renderer: R, config: LayoutConfig) -> TimelineResult<Self> {
        let config = config.validate()?;
        Ok(Self {
            renderer,
            now_observer: NowMarkerObserver::new(config.now_visibility_margin_px),
            config,
            hover: HoverStack::default(),
        })
    }

    #[must_use]
    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    #[must_use]
    pub fn hover(&self) -> &HoverStack {
        &self.hover
    }

    pub fn on_pointer_enter(&mut self, event_id: impl Into<String>) {
        self.hover.on_pointer_enter(event_id);
    }

    pub fn on_pointer_leave(&mut self, event_id: &str) {
        self.hover.on_pointer_leave(event_id);
    }

    /// Full layout pass. Identical inputs and hover state yield identical frames.
    #[must_use]
    pub fn build_frame(&self, input: &FrameInput<'_>) -> TimelineFrame {
        let window = input.window;
        let scale = TimelineScale::resolve(input.view.zoom_level, input.view.visual_scale, window);

        let mut layout = match input.view.view_mode {
            ViewMode::Category => {
                build_swimlanes(input.events, input.categories, window, scale, &self.config)
            }
            ViewMode::Timeline => build_timeline_lane(input.events, window, scale, &self.config),
        };
        for lane in &mut layout.lanes {
            self.hover.apply(&mut lane.positions);
        }

        let ticks: Vec<_> =
            AxisTicks::new(window, scale, self.config.hour_tick_reduce_threshold).collect();
        let now_marker = NowMarker::locate(input.today, window, scale);
        let total_height = layout.total_height();

        debug!(
            lanes = layout.lanes.len(),
            ticks = ticks.len(),
            skipped = layout.skipped.len(),
            total_width = scale.total_width,
            total_height,
            "timeline frame built"
        );

        TimelineFrame {
            window,
            scale,
            view_mode: input.view.view_mode,
            lanes: layout.lanes,
            ticks,
            now_marker,
            skipped: layout.skipped,
            total_width: scale.total_width,
            total_height,
        }
    }

    /// Builds a frame and passes it to the renderer.
    pub fn render(&mut self, input: &FrameInput<'_>) -> TimelineResult<TimelineFrame> {
        let frame = self.build_frame(input);
        self.renderer.render(&frame)?;
        Ok(frame)
    }

    /// Feeds the viewport to the now-marker observer; returns transitions only.
    pub fn observe_now_marker(
        &mut self,
        frame: &TimelineFrame,
        scroll_left: f64,
        viewport_width: f64,
    ) -> Option<NowVisibility> {
        self.now_observer
            .observe(frame.now_marker.x, scroll_left, viewport_width)
    }

    #[must_use]
    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    #[must_use]
    pub fn into_renderer(self) -> R {
        self.renderer
    }
}
