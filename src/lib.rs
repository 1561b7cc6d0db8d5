//! timeline-layout: chronological timeline layout engine.
//!
//! Turns dated events and a zoom/scale selection into an exact 2-D
//! arrangement (day-aligned x positions, same-day stacking, zoom-dependent
//! card variants, clusters, ruler ticks and a now marker) and persists the
//! user's view settings across sessions.

pub mod api;
pub mod core;
pub mod error;
pub mod interaction;
pub mod persistence;
pub mod render;
pub mod telemetry;

pub use api::{FrameInput, LayoutConfig, TimelineEngine, TimelineFrame};
pub use error::{StorageError, TimelineError, TimelineResult};
