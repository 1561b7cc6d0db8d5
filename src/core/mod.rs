pub mod primitives;
pub mod scale;
pub mod time_scale;
pub mod types;
pub mod zoom;

pub use scale::{CoordinateMapper, TimelineScale};
pub use time_scale::DateWindow;
pub use types::{Category, Event, EventStatus, Priority};
pub use zoom::{CardGeometry, CardVariant, Granularity, VisualScale, ZoomLevel, ZoomProfile};
