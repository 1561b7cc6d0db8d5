use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::TimelineError;

/// Discrete time resolution selected by the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ZoomLevel {
    Day,
    Week,
    Month,
    Quarter,
}

impl ZoomLevel {
    pub const ALL: [Self; 4] = [Self::Day, Self::Week, Self::Month, Self::Quarter];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Day => "day",
            Self::Week => "week",
            Self::Month => "month",
            Self::Quarter => "quarter",
        }
    }

    /// Lookup row tying scale, ruler granularity and card variant together.
    #[must_use]
    pub fn profile(self) -> &'static ZoomProfile {
        match self {
            Self::Day => &ZOOM_PROFILES[0],
            Self::Week => &ZOOM_PROFILES[1],
            Self::Month => &ZOOM_PROFILES[2],
            Self::Quarter => &ZOOM_PROFILES[3],
        }
    }

    /// Parses a zoom level, falling back to `fallback` on unknown input.
    #[must_use]
    pub fn parse_or(raw: &str, fallback: Self) -> Self {
        raw.parse().unwrap_or_else(|err: TimelineError| {
            warn!(error = %err, fallback = fallback.as_str(), "rejecting zoom level");
            fallback
        })
    }
}

impl Default for ZoomLevel {
    fn default() -> Self {
        Self::Month
    }
}

impl fmt::Display for ZoomLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ZoomLevel {
    type Err = TimelineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "day" => Ok(Self::Day),
            "week" => Ok(Self::Week),
            "month" => Ok(Self::Month),
            "quarter" => Ok(Self::Quarter),
            _ => Err(TimelineError::UnknownZoomLevel(s.to_owned())),
        }
    }
}

/// Step between consecutive ruler ticks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    Hour,
    Day,
    Week,
    Month,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CardVariant {
    Full,
    Mini,
    Dot,
}

impl CardVariant {
    #[must_use]
    pub fn geometry(self) -> CardGeometry {
        match self {
            Self::Full => CardGeometry {
                width: 120.0,
                height: 80.0,
                stack_offset_x: 15.0,
                stack_offset_y: 30.0,
            },
            Self::Mini => CardGeometry {
                width: 80.0,
                height: 40.0,
                stack_offset_x: 10.0,
                stack_offset_y: 20.0,
            },
            Self::Dot => CardGeometry {
                width: 24.0,
                height: 24.0,
                stack_offset_x: 10.0,
                stack_offset_y: 12.0,
            },
        }
    }

    /// Whether same-day events collapse into a single cluster marker.
    #[must_use]
    pub fn clusters(self) -> bool {
        matches!(self, Self::Dot)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CardGeometry {
    pub width: f64,
    pub height: f64,
    pub stack_offset_x: f64,
    pub stack_offset_y: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ZoomProfile {
    pub level: ZoomLevel,
    pub base_pixels_per_day: f64,
    pub granularity: Granularity,
    pub variant: CardVariant,
    /// Minimum swimlane height for a lane holding at least one event.
    pub min_lane_height_px: f64,
}

impl ZoomProfile {
    #[must_use]
    pub fn geometry(&self) -> CardGeometry {
        self.variant.geometry()
    }
}

const ZOOM_PROFILES: [ZoomProfile; 4] = [
    ZoomProfile {
        level: ZoomLevel::Day,
        base_pixels_per_day: 100.0,
        granularity: Granularity::Hour,
        variant: CardVariant::Full,
        min_lane_height_px: 192.0,
    },
    ZoomProfile {
        level: ZoomLevel::Week,
        base_pixels_per_day: 20.0,
        granularity: Granularity::Day,
        variant: CardVariant::Mini,
        min_lane_height_px: 128.0,
    },
    ZoomProfile {
        level: ZoomLevel::Month,
        base_pixels_per_day: 5.0,
        granularity: Granularity::Week,
        variant: CardVariant::Dot,
        min_lane_height_px: 96.0,
    },
    ZoomProfile {
        level: ZoomLevel::Quarter,
        base_pixels_per_day: 2.0,
        granularity: Granularity::Month,
        variant: CardVariant::Dot,
        min_lane_height_px: 96.0,
    },
];

/// Continuous multiplier applied on top of a zoom level's base density.
///
/// Construction clamps into `[MIN, MAX]`; the UI controls step inside the
/// narrower `[MIN, UI_MAX]` band.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(from = "f64", into = "f64")]
pub struct VisualScale(f64);

impl VisualScale {
    pub const MIN: f64 = 0.5;
    pub const UI_MAX: f64 = 2.0;
    pub const MAX: f64 = 10.0;
    pub const STEP: f64 = 0.25;
    pub const DEFAULT: f64 = 1.0;

    /// Clamps `value` into the tolerated range; non-finite input resets to 1.0.
    #[must_use]
    pub fn new(value: f64) -> Self {
        if !value.is_finite() {
            warn!(value, "non-finite visual scale, using default");
            return Self(Self::DEFAULT);
        }
        let clamped = value.clamp(Self::MIN, Self::MAX);
        if clamped != value {
            warn!(value, clamped, "visual scale clamped");
        }
        Self(clamped)
    }

    /// Strict check used when validating persisted payloads.
    #[must_use]
    pub fn is_valid(value: f64) -> bool {
        value.is_finite() && (Self::MIN..=Self::MAX).contains(&value)
    }

    #[must_use]
    pub fn get(self) -> f64 {
        self.0
    }

    #[must_use]
    pub fn step_in(self) -> Self {
        Self((self.0 + Self::STEP).min(Self::UI_MAX.max(self.0)))
    }

    #[must_use]
    pub fn step_out(self) -> Self {
        Self((self.0 - Self::STEP).max(Self::MIN))
    }

    #[must_use]
    pub fn can_step_in(self) -> bool {
        self.0 < Self::UI_MAX
    }

    #[must_use]
    pub fn can_step_out(self) -> bool {
        self.0 > Self::MIN
    }

    /// Rounded percentage shown on the reset control.
    #[must_use]
    pub fn percent_label(self) -> String {
        format!("{:.0}%", self.0 * 100.0)
    }
}

impl From<f64> for VisualScale {
    fn from(value: f64) -> Self {
        Self::new(value)
    }
}

impl From<VisualScale> for f64 {
    fn from(scale: VisualScale) -> Self {
        scale.0
    }
}

impl Default for VisualScale {
    fn default() -> Self {
        Self(Self::DEFAULT)
    }
}
