//! Layout pipeline: ruler, cards, stacking, clustering, lanes and frames.

mod axis_ticks;
mod card_variant;
mod cluster;
mod engine;
mod engine_config;
mod event_layout;
mod frame;
mod json_contract;
mod now_marker;
mod swimlane;

pub use axis_ticks::{
    AlignmentDrift, AxisTick, AxisTicks, DEFAULT_ALIGNMENT_TOLERANCE_PX, validate_axis_alignment,
};
pub use card_variant::{
    CLUSTER_MARKER_PX, CardContent, DEFAULT_FULL_CARD_WIDTH_PX, DOT_MARKER_PX,
    MIN_FULL_CARD_WIDTH_PX, card_width, format_duration, select_card_variant, truncate_title,
};
pub use cluster::ClusteredEvent;
pub use engine::{FrameInput, TimelineEngine};
pub use engine_config::LayoutConfig;
pub use event_layout::{
    EventLayout, EventPosition, Placement, SkipReason, SkippedEvent, StackSide, Z_INDEX_BASE,
    layout_event_refs, layout_events,
};
pub use frame::TimelineFrame;
pub use json_contract::{TIMELINE_FRAME_JSON_SCHEMA_V1, TimelineFrameJsonContractV1};
pub use now_marker::NowMarker;
pub use swimlane::{
    Swimlane, SwimlaneLayout, TIMELINE_LANE_ID, build_swimlanes, build_timeline_lane, lane_height,
};
