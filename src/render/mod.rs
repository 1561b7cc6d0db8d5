mod null_renderer;

pub use null_renderer::NullRenderer;

use crate::api::TimelineFrame;
use crate::error::TimelineResult;

/// Contract implemented by any rendering surface.
///
/// Surfaces receive a fully computed, deterministic `TimelineFrame` so
/// drawing code stays isolated from layout and persistence logic.
pub trait Renderer {
    fn render(&mut self, frame: &TimelineFrame) -> TimelineResult<()>;
}
