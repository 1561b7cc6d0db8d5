use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::core::{Category, DateWindow, Event, TimelineScale, ZoomLevel};

use super::LayoutConfig;
use super::event_layout::{EventPosition, SkipReason, SkippedEvent, layout_event_refs};

/// One category row and the markers positioned on it.
///
/// `event_count` counts placed events only; skipped ones are reported by
/// [`SwimlaneLayout::skipped`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Swimlane {
    pub category: Category,
    pub event_count: usize,
    pub positions: Vec<EventPosition>,
    /// Deepest same-day stack in this lane.
    pub stack_depth: usize,
    pub height: f64,
}

impl Swimlane {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.event_count == 0
    }
}

/// Closed-form lane height for the deepest stack at `zoom_level`.
///
/// `max(min_height, (min(depth, cap) - 1) * stack_offset_y + card_height + padding)`;
/// a lane without events collapses to `config.empty_lane_height_px`.
#[must_use]
pub fn lane_height(zoom_level: ZoomLevel, stack_depth: usize, config: &LayoutConfig) -> f64 {
    if stack_depth == 0 {
        return config.empty_lane_height_px;
    }
    let profile = zoom_level.profile();
    let geometry = profile.geometry();
    let visible_depth = stack_depth.min(config.max_stack_count.max(1));
    let stacked = visible_depth.saturating_sub(1) as f64 * geometry.stack_offset_y
        + geometry.height
        + config.lane_padding_px;
    stacked.max(profile.min_lane_height_px)
}

/// Lanes built for one pass plus every event that could not be placed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SwimlaneLayout {
    pub lanes: Vec<Swimlane>,
    pub skipped: Vec<SkippedEvent>,
}

impl SwimlaneLayout {
    #[must_use]
    pub fn total_height(&self) -> f64 {
        self.lanes.iter().map(|lane| lane.height).sum()
    }
}

/// Id of the synthetic lane used by the single-lane chronological view.
pub const TIMELINE_LANE_ID: &str = "timeline";
const TIMELINE_LANE_COLOR: &str = "#6B7280";

/// Puts every event on one chronological lane, ignoring categories.
#[must_use]
pub fn build_timeline_lane(
    events: &[Event],
    window: DateWindow,
    scale: TimelineScale,
    config: &LayoutConfig,
) -> SwimlaneLayout {
    let refs: Vec<&Event> = events.iter().collect();
    let layout = layout_event_refs(&refs, window, scale, config);
    let lane = Swimlane {
        category: Category::new(TIMELINE_LANE_ID, "Timeline", TIMELINE_LANE_COLOR),
        event_count: events.len() - layout.skipped.len(),
        height: lane_height(scale.zoom_level, layout.max_stack_depth, config),
        stack_depth: layout.max_stack_depth,
        positions: layout.positions,
    };
    SwimlaneLayout {
        lanes: vec![lane],
        skipped: layout.skipped,
    }
}

/// Groups `events` into per-category lanes and lays each lane out.
///
/// Lanes are ordered by category name (case-insensitive, ties by id). Events
/// whose category is not in `categories` are skipped.
#[must_use]
pub fn build_swimlanes(
    events: &[Event],
    categories: &[Category],
    window: DateWindow,
    scale: TimelineScale,
    config: &LayoutConfig,
) -> SwimlaneLayout {
    let mut ordered: Vec<&Category> = categories.iter().collect();
    ordered.sort_by(|a, b| {
        a.name
            .to_lowercase()
            .cmp(&b.name.to_lowercase())
            .then_with(|| a.id.cmp(&b.id))
    });

    let mut groups: IndexMap<&str, Vec<&Event>> = IndexMap::with_capacity(ordered.len());
    for category in &ordered {
        groups.entry(category.id.as_str()).or_default();
    }

    let mut skipped = Vec::new();
    for event in events {
        match groups.get_mut(event.category_id.as_str()) {
            Some(group) => group.push(event),
            None => {
                warn!(
                    event_id = %event.id,
                    category_id = %event.category_id,
                    "skipping event with unknown category"
                );
                skipped.push(SkippedEvent {
                    event_id: event.id.clone(),
                    reason: SkipReason::UnknownCategory {
                        category_id: event.category_id.clone(),
                    },
                });
            }
        }
    }

    let mut lanes = Vec::with_capacity(ordered.len());
    for category in ordered {
        let group = groups
            .get(category.id.as_str())
            .map(Vec::as_slice)
            .unwrap_or_default();
        let layout = layout_event_refs(group, window, scale, config);
        let event_count = group.len() - layout.skipped.len();
        skipped.extend(layout.skipped);

        let height = lane_height(scale.zoom_level, layout.max_stack_depth, config);
        debug!(
            category_id = %category.id,
            events = event_count,
            stack_depth = layout.max_stack_depth,
            height,
            "swimlane laid out"
        );
        lanes.push(Swimlane {
            category: category.clone(),
            event_count,
            positions: layout.positions,
            stack_depth: layout.max_stack_depth,
            height,
        });
    }

    SwimlaneLayout { lanes, skipped }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::{TIMELINE_LANE_ID, build_swimlanes, build_timeline_lane, lane_height};
    use crate::api::{LayoutConfig, SkipReason};
    use crate::core::{Category, DateWindow, Event, TimelineScale, ZoomLevel};

    fn window() -> DateWindow {
        let parse = |raw: &str| NaiveDate::parse_from_str(raw, "%Y-%m-%d").expect("test date");
        DateWindow::new(parse("2025-06-01"), parse("2025-07-01")).expect("window")
    }

    #[test]
    fn lane_height_follows_closed_form() {
        let config = LayoutConfig::default();
        assert_eq!(lane_height(ZoomLevel::Day, 0, &config), 64.0);
        assert_eq!(lane_height(ZoomLevel::Day, 1, &config), 192.0);
        assert_eq!(lane_height(ZoomLevel::Day, 10, &config), 9.0 * 30.0 + 80.0 + 32.0);
        assert_eq!(
            lane_height(ZoomLevel::Day, 15, &config),
            lane_height(ZoomLevel::Day, 10, &config)
        );
        assert_eq!(lane_height(ZoomLevel::Week, 6, &config), 5.0 * 20.0 + 40.0 + 32.0);
        assert_eq!(lane_height(ZoomLevel::Quarter, 1, &config), 96.0);
    }

    #[test]
    fn zero_stack_cap_is_treated_as_one() {
        let config = LayoutConfig {
            max_stack_count: 0,
            ..LayoutConfig::default()
        };
        let one = LayoutConfig {
            max_stack_count: 1,
            ..LayoutConfig::default()
        };
        assert_eq!(
            lane_height(ZoomLevel::Day, 3, &config),
            lane_height(ZoomLevel::Day, 3, &one)
        );

        let categories = vec![Category::new("c-stage", "Stage", "#111111")];
        let events: Vec<Event> = (0..3)
            .map(|i| Event::new(format!("e{i}"), "Set", "2025-06-10", "c-stage"))
            .collect();
        let scale = TimelineScale::resolve(ZoomLevel::Day, 1.0, window());
        let layout = build_swimlanes(&events, &categories, window(), scale, &config);
        assert_eq!(layout.lanes[0].height, 192.0);
        assert!(layout.lanes[0].positions.iter().all(|p| p.is_overflow()));
    }

    #[test]
    fn lanes_are_sorted_by_name_and_unknown_categories_skipped() {
        let categories = vec![
            Category::new("c-stage", "stage", "#111111"),
            Category::new("c-art", "Art", "#222222"),
            Category::new("c-food", "Food", "#333333"),
        ];
        let events = vec![
            Event::new("e1", "Soundcheck", "2025-06-10", "c-stage"),
            Event::new("e2", "Mural", "2025-06-11", "c-art"),
            Event::new("e3", "Ghost", "2025-06-11", "c-missing"),
        ];
        let scale = TimelineScale::resolve(ZoomLevel::Week, 1.0, window());
        let layout = build_swimlanes(&events, &categories, window(), scale, &LayoutConfig::default());

        let names: Vec<&str> = layout.lanes.iter().map(|l| l.category.name.as_str()).collect();
        assert_eq!(names, vec!["Art", "Food", "stage"]);
        assert!(layout.lanes[1].is_empty());
        assert_eq!(layout.lanes[1].height, 64.0);
        assert_eq!(layout.lanes[2].positions[0].event_id, "e1");

        assert_eq!(layout.skipped.len(), 1);
        assert_eq!(
            layout.skipped[0].reason,
            SkipReason::UnknownCategory {
                category_id: "c-missing".to_owned()
            }
        );
        assert_eq!(layout.total_height(), 128.0 + 64.0 + 128.0);
    }

    #[test]
    fn timeline_lane_ignores_categories() {
        let events = vec![
            Event::new("e1", "Soundcheck", "2025-06-10", "c-stage"),
            Event::new("e2", "Ghost", "2025-06-11", "c-missing"),
            Event::new("e3", "Broken", "June 12", "c-stage"),
        ];
        let scale = TimelineScale::resolve(ZoomLevel::Day, 1.0, window());
        let layout = build_timeline_lane(&events, window(), scale, &LayoutConfig::default());
        assert_eq!(layout.lanes.len(), 1);
        assert_eq!(layout.lanes[0].category.id, TIMELINE_LANE_ID);
        assert_eq!(layout.lanes[0].event_count, 2);
        assert_eq!(layout.lanes[0].positions.len(), 2);
        assert_eq!(layout.skipped.len(), 1);
    }
}
