use crate::api::TimelineFrame;
use crate::error::TimelineResult;
use crate::render::Renderer;

/// No-op renderer used by tests and headless layout runs.
///
/// It still validates frame content so invalid geometry is caught before a
/// real surface draws it.
#[derive(Debug, Default)]
pub struct NullRenderer {
    pub frames_rendered: usize,
    pub last_marker_count: usize,
    pub last_tick_count: usize,
}

impl Renderer for NullRenderer {
    fn render(&mut self, frame: &TimelineFrame) -> TimelineResult<()> {
        frame.validate()?;
        self.frames_rendered += 1;
        self.last_marker_count = frame.positions().count();
        self.last_tick_count = frame.ticks.len();
        Ok(())
    }
}
