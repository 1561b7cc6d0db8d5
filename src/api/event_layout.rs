use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use tracing::{debug, warn};

use crate::core::{CardVariant, DateWindow, Event, EventStatus, Priority, TimelineScale};

use super::LayoutConfig;
use super::card_variant::{card_width, truncate_title};
use super::cluster::{ClusterAnchor, ClusteredEvent, aggregate_day};

/// Base z-order for positioned markers.
pub const Z_INDEX_BASE: i64 = 10;

/// Which side of the lane centerline a marker grows towards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StackSide {
    Above,
    Below,
}

impl StackSide {
    /// Even within-day indices go above, odd ones below.
    #[must_use]
    pub fn for_index(index: usize) -> Self {
        if index % 2 == 0 { Self::Above } else { Self::Below }
    }
}

/// What a positioned record stands for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum Placement {
    /// One event drawn as its own card.
    Card,
    /// Events beyond the per-day stack cap.
    Overflow { hidden_event_ids: Vec<String> },
    /// Several same-day events collapsed into a single marker.
    Cluster {
        cluster_count: usize,
        clustered_events: Vec<ClusteredEvent>,
    },
}

/// Visual descriptor for one marker on a swimlane.
///
/// `y_position` is the distance from the centerline to the marker's nearest
/// edge, measured towards `side`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventPosition {
    pub event_id: String,
    pub category_id: String,
    pub day: NaiveDate,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,
    pub priority: Priority,
    pub status: EventStatus,
    pub x_position: f64,
    pub y_position: f64,
    pub side: StackSide,
    pub stack_index: usize,
    pub z_index: i64,
    pub width: f64,
    pub height: f64,
    pub variant: CardVariant,
    #[serde(flatten)]
    pub placement: Placement,
}

impl EventPosition {
    #[must_use]
    pub fn is_cluster(&self) -> bool {
        matches!(self.placement, Placement::Cluster { .. })
    }

    #[must_use]
    pub fn is_overflow(&self) -> bool {
        matches!(self.placement, Placement::Overflow { .. })
    }

    #[must_use]
    pub fn cluster_members(&self) -> &[ClusteredEvent] {
        match &self.placement {
            Placement::Cluster {
                clustered_events, ..
            } => clustered_events,
            _ => &[],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "reason", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum SkipReason {
    InvalidDate { input: String },
    UnknownCategory { category_id: String },
}

/// Event left out of a layout pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkippedEvent {
    pub event_id: String,
    #[serde(flatten)]
    pub reason: SkipReason,
}

/// Result of positioning one set of events.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventLayout {
    pub positions: Vec<EventPosition>,
    pub skipped: Vec<SkippedEvent>,
    /// Deepest same-day stack, counting a cluster as one.
    pub max_stack_depth: usize,
}

type DayBucket<'a> = SmallVec<[&'a Event; 4]>;

/// Positions `events` for one pass.
///
/// Events are bucketed by calendar day, ordered by start time within the day
/// (missing times first, ties by id) and alternate above/below the
/// centerline. Unparseable dates are reported in [`EventLayout::skipped`].
#[must_use]
pub fn layout_events(
    events: &[Event],
    window: DateWindow,
    scale: TimelineScale,
    config: &LayoutConfig,
) -> EventLayout {
    let refs: Vec<&Event> = events.iter().collect();
    layout_event_refs(&refs, window, scale, config)
}

/// Borrowing form of [`layout_events`] used when events are pre-grouped.
#[must_use]
pub fn layout_event_refs(
    events: &[&Event],
    window: DateWindow,
    scale: TimelineScale,
    config: &LayoutConfig,
) -> EventLayout {
    let mut buckets: BTreeMap<NaiveDate, DayBucket<'_>> = BTreeMap::new();
    let mut skipped = Vec::new();

    for &event in events {
        match event.day() {
            Ok(day) => buckets.entry(day).or_default().push(event),
            Err(err) => {
                warn!(event_id = %event.id, error = %err, "skipping event with unparseable date");
                skipped.push(SkippedEvent {
                    event_id: event.id.clone(),
                    reason: SkipReason::InvalidDate {
                        input: event.date.clone(),
                    },
                });
            }
        }
    }

    let variant = scale.zoom_level.profile().variant;
    let mapper = scale.mapper(window);
    let z_stride = z_stride(config);

    let mut positions = Vec::with_capacity(events.len());
    let mut max_stack_depth = 0;

    for (day, mut bucket) in buckets {
        bucket.sort_by(|a, b| {
            a.time_sort_key()
                .cmp(b.time_sort_key())
                .then_with(|| a.id.cmp(&b.id))
        });

        let x = mapper.day_to_x(day);
        let day_z = Z_INDEX_BASE.saturating_add(window.day_offset(day).saturating_mul(z_stride));

        if variant.clusters() {
            let anchor = ClusterAnchor {
                day,
                x,
                z_index: day_z + z_stride - 1,
            };
            if let Some(cluster) = aggregate_day(&bucket, anchor) {
                max_stack_depth = max_stack_depth.max(1);
                positions.push(cluster);
                continue;
            }
        }

        max_stack_depth = max_stack_depth.max(bucket.len());
        stack_day(
            &bucket,
            DayStack {
                day,
                x,
                day_z,
                variant,
                pixels_per_day: scale.pixels_per_day,
            },
            config,
            &mut positions,
        );
    }

    debug!(
        input_count = events.len(),
        positioned = positions.len(),
        skipped = skipped.len(),
        zoom = %scale.zoom_level,
        "event layout pass"
    );

    EventLayout {
        positions,
        skipped,
        max_stack_depth,
    }
}

/// z-units reserved per day: one per card slot, the overflow and a cluster.
fn z_stride(config: &LayoutConfig) -> i64 {
    i64::try_from(config.max_stack_count)
        .unwrap_or(i64::from(u16::MAX))
        .saturating_add(2)
}

#[derive(Debug, Clone, Copy)]
struct DayStack {
    day: NaiveDate,
    x: f64,
    day_z: i64,
    variant: CardVariant,
    pixels_per_day: f64,
}

fn stack_day(
    sorted: &[&Event],
    stack: DayStack,
    config: &LayoutConfig,
    positions: &mut Vec<EventPosition>,
) {
    let geometry = stack.variant.geometry();
    let slot_step = geometry.height + config.stack_spacing_px;
    let visible = sorted.len().min(config.max_stack_count);

    for (index, event) in sorted.iter().take(visible).enumerate() {
        let stack_index = index / 2;
        positions.push(EventPosition {
            event_id: event.id.clone(),
            category_id: event.category_id.clone(),
            day: stack.day,
            title: truncate_title(&event.title, config.title_max_chars),
            time: event.time.clone(),
            priority: event.priority,
            status: event.status,
            x_position: stack.x,
            y_position: stack_index as f64 * slot_step,
            side: StackSide::for_index(index),
            stack_index,
            z_index: stack.day_z + stack_index as i64,
            width: card_width(event, stack.variant, stack.pixels_per_day),
            height: geometry.height,
            variant: stack.variant,
            placement: Placement::Card,
        });
    }

    let hidden = &sorted[visible..];
    let Some(first_hidden) = hidden.first() else {
        return;
    };

    let stack_index = visible / 2;
    debug!(day = %stack.day, hidden = hidden.len(), "day stack overflow");
    positions.push(EventPosition {
        event_id: format!("overflow-{}-{}", first_hidden.category_id, stack.day),
        category_id: first_hidden.category_id.clone(),
        day: stack.day,
        title: format!("+{} more...", hidden.len()),
        time: None,
        priority: Priority::Low,
        status: EventStatus::NotStarted,
        x_position: stack.x,
        y_position: stack_index as f64 * slot_step,
        side: StackSide::for_index(visible),
        stack_index,
        z_index: stack.day_z + stack_index as i64,
        width: geometry.width,
        height: geometry.height,
        variant: stack.variant,
        placement: Placement::Overflow {
            hidden_event_ids: hidden.iter().map(|event| event.id.clone()).collect(),
        },
    });
}
