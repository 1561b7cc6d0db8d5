use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::core::{CardVariant, Event, EventStatus, Priority};

use super::event_layout::{EventPosition, Placement, StackSide};

/// Summary of one event folded into a cluster marker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusteredEvent {
    pub event_id: String,
    pub title: String,
    pub priority: Priority,
    pub status: EventStatus,
}

impl From<&Event> for ClusteredEvent {
    fn from(event: &Event) -> Self {
        Self {
            event_id: event.id.clone(),
            title: event.title.clone(),
            priority: event.priority,
            status: event.status,
        }
    }
}

/// Inputs shared by every cluster marker of a day bucket.
#[derive(Debug, Clone, Copy)]
pub(super) struct ClusterAnchor {
    pub(super) day: NaiveDate,
    pub(super) x: f64,
    pub(super) z_index: i64,
}

/// Collapses a sorted day bucket into one marker.
///
/// Returns `None` for single-event buckets, which always render as plain
/// positions. Member order follows `sorted`.
pub(super) fn aggregate_day(sorted: &[&Event], anchor: ClusterAnchor) -> Option<EventPosition> {
    let (first, rest) = sorted.split_first()?;
    if rest.is_empty() {
        return None;
    }

    let priority = rest.iter().fold(first.priority, |highest, event| {
        if event.priority.rank() > highest.rank() {
            event.priority
        } else {
            highest
        }
    });
    let clustered_events: Vec<ClusteredEvent> =
        sorted.iter().map(|event| ClusteredEvent::from(*event)).collect();
    let geometry = CardVariant::Dot.geometry();

    Some(EventPosition {
        event_id: format!("cluster-{}-{}", first.category_id, anchor.day),
        category_id: first.category_id.clone(),
        day: anchor.day,
        title: first.title.clone(),
        time: first.time.clone(),
        priority,
        status: first.status,
        x_position: anchor.x,
        y_position: 0.0,
        side: StackSide::Above,
        stack_index: 0,
        z_index: anchor.z_index,
        width: geometry.width,
        height: geometry.height,
        variant: CardVariant::Dot,
        placement: Placement::Cluster {
            cluster_count: clustered_events.len(),
            clustered_events,
        },
    })
}
