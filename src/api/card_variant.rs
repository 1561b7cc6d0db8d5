use serde::Serialize;

use crate::core::{CardGeometry, CardVariant, Event, Priority, ZoomLevel};

use super::LayoutConfig;

/// Width of a full card whose event has no usable time range.
pub const DEFAULT_FULL_CARD_WIDTH_PX: f64 = 120.0;
/// Narrowest duration-sized full card that still fits a readable title.
pub const MIN_FULL_CARD_WIDTH_PX: f64 = 80.0;
pub const DOT_MARKER_PX: f64 = 12.0;
pub const CLUSTER_MARKER_PX: f64 = 20.0;

/// Variant and geometry for a zoom level.
#[must_use]
pub fn select_card_variant(zoom_level: ZoomLevel) -> (CardVariant, CardGeometry) {
    let variant = zoom_level.profile().variant;
    (variant, variant.geometry())
}

/// Card width at the current density.
///
/// Full cards grow with the event's duration; other variants keep their
/// fixed footprint.
#[must_use]
pub fn card_width(event: &Event, variant: CardVariant, pixels_per_day: f64) -> f64 {
    match variant {
        CardVariant::Full => match event.duration_minutes() {
            Some(minutes) => {
                let pixels_per_hour = pixels_per_day / 24.0;
                (minutes as f64 / 60.0 * pixels_per_hour).max(MIN_FULL_CARD_WIDTH_PX)
            }
            None => DEFAULT_FULL_CARD_WIDTH_PX,
        },
        CardVariant::Mini | CardVariant::Dot => variant.geometry().width,
    }
}

/// Duration badge text: `45m`, `2h`, `1h 30m`.
#[must_use]
pub fn format_duration(total_minutes: i64) -> String {
    let total_minutes = total_minutes.max(0);
    if total_minutes < 60 {
        return format!("{total_minutes}m");
    }
    let hours = total_minutes / 60;
    let minutes = total_minutes % 60;
    if minutes == 0 {
        format!("{hours}h")
    } else {
        format!("{hours}h {minutes}m")
    }
}

/// Truncates to `max_chars` characters, marking the cut with an ellipsis.
#[must_use]
pub fn truncate_title(title: &str, max_chars: usize) -> String {
    if title.chars().count() <= max_chars {
        return title.to_owned();
    }
    let kept: String = title.chars().take(max_chars.saturating_sub(1)).collect();
    format!("{}…", kept.trim_end())
}

/// What a card shows for its variant.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CardContent {
    pub variant: CardVariant,
    pub title: Option<String>,
    pub time_range: Option<String>,
    pub duration_badge: Option<String>,
    pub priority_label: Option<&'static str>,
    pub priority_color: &'static str,
    pub status_label: Option<&'static str>,
    pub status_glyph: Option<char>,
    pub marker_size_px: Option<f64>,
    pub counter_badge: Option<usize>,
}

impl CardContent {
    #[must_use]
    pub fn for_event(event: &Event, variant: CardVariant, config: &LayoutConfig) -> Self {
        let duration_badge = event.duration_minutes().map(format_duration);
        match variant {
            CardVariant::Full => Self {
                variant,
                title: Some(truncate_title(&event.title, config.title_max_chars)),
                time_range: time_range(event),
                duration_badge,
                priority_label: Some(event.priority.label()),
                priority_color: event.priority.color(),
                status_label: Some(event.status.label()),
                status_glyph: Some(event.status.glyph()),
                marker_size_px: None,
                counter_badge: None,
            },
            CardVariant::Mini => Self {
                variant,
                title: Some(truncate_title(&event.title, config.mini_title_max_chars)),
                time_range: None,
                duration_badge,
                priority_label: None,
                priority_color: event.priority.color(),
                status_label: None,
                status_glyph: Some(event.status.glyph()),
                marker_size_px: None,
                counter_badge: None,
            },
            CardVariant::Dot => Self::marker(event.priority, None),
        }
    }

    /// Enlarged, counter-badged marker standing in for `count` events.
    #[must_use]
    pub fn for_cluster(count: usize, priority: Priority) -> Self {
        Self::marker(priority, Some(count))
    }

    fn marker(priority: Priority, counter_badge: Option<usize>) -> Self {
        let marker_size_px = if counter_badge.is_some() {
            CLUSTER_MARKER_PX
        } else {
            DOT_MARKER_PX
        };
        Self {
            variant: CardVariant::Dot,
            title: None,
            time_range: None,
            duration_badge: None,
            priority_label: None,
            priority_color: priority.color(),
            status_label: None,
            status_glyph: None,
            marker_size_px: Some(marker_size_px),
            counter_badge,
        }
    }
}

fn time_range(event: &Event) -> Option<String> {
    let start = event.start_time()?.format("%H:%M").to_string();
    match event.finish_time() {
        Some(end) if event.duration_minutes().is_some() => {
            Some(format!("{start}–{}", end.format("%H:%M")))
        }
        _ => Some(start),
    }
}
