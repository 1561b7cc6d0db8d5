use std::time::{Duration, Instant};

use timeline_layout::StorageError;
use timeline_layout::core::ZoomLevel;
use timeline_layout::persistence::{
    KeyValueStore, MemoryStore, PersistenceConfig, TimelineViewState, ViewMode,
    ViewStatePersistence, WriteOutcome,
};

const KEY: &str = "timeline-view-state";

fn fixed_clock() -> i64 {
    1_750_000_000_000
}

fn load(store: MemoryStore) -> ViewStatePersistence<MemoryStore> {
    ViewStatePersistence::load_with_clock(store, PersistenceConfig::default(), fixed_clock)
}

#[test]
fn first_use_starts_from_defaults() {
    let persistence = load(MemoryStore::new());
    assert_eq!(*persistence.state(), TimelineViewState::default());
    assert_eq!(persistence.state().view_mode, ViewMode::Category);
    assert_eq!(persistence.state().zoom_level, ZoomLevel::Month);
    assert!(!persistence.has_pending_write());
}

#[test]
fn valid_saved_state_is_restored() {
    let mut store = MemoryStore::new();
    store
        .set(
            KEY,
            r#"{"viewMode":"timeline","zoomLevel":"day","visualScale":1.5,"scrollPosition":320,"timestamp":1}"#,
        )
        .expect("seed");
    let persistence = load(store);
    let state = persistence.state();
    assert_eq!(state.view_mode, ViewMode::Timeline);
    assert_eq!(state.zoom_level, ZoomLevel::Day);
    assert_eq!(state.visual_scale, 1.5);
    assert_eq!(state.scroll_position, 320.0);
    assert_eq!(state.timestamp, fixed_clock());
}

#[test]
fn invalid_zoom_level_discards_whole_payload() {
    let mut store = MemoryStore::new();
    store.set(KEY, r#"{"zoomLevel":"century"}"#).expect("seed");
    assert_eq!(*load(store).state(), TimelineViewState::default());

    let mut store = MemoryStore::new();
    store
        .set(
            KEY,
            r#"{"viewMode":"timeline","zoomLevel":"century","visualScale":1.5,"scrollPosition":10}"#,
        )
        .expect("seed");
    assert_eq!(*load(store).state(), TimelineViewState::default());
}

#[test]
fn unavailable_storage_falls_back_without_error() {
    let mut persistence = load(MemoryStore::unavailable());
    assert_eq!(*persistence.state(), TimelineViewState::default());

    let start = Instant::now();
    persistence.set_zoom_level(ZoomLevel::Week, start);
    let outcome = persistence.poll(start + Duration::from_millis(150));
    assert!(matches!(
        outcome,
        Some(WriteOutcome::Dropped(StorageError::Unavailable(_)))
    ));
    assert_eq!(persistence.state().zoom_level, ZoomLevel::Week);
}

#[test]
fn rapid_changes_coalesce_into_one_debounced_write() {
    let start = Instant::now();
    let mut persistence = load(MemoryStore::new());

    persistence.set_zoom_level(ZoomLevel::Day, start);
    persistence.set_visual_scale(1.25, start + Duration::from_millis(60));
    persistence.set_view_mode(ViewMode::Timeline, start + Duration::from_millis(120));

    assert!(persistence.poll(start + Duration::from_millis(200)).is_none());
    assert!(persistence.store().get(KEY).expect("get").is_none());

    let outcome = persistence.poll(start + Duration::from_millis(270));
    assert_eq!(outcome, Some(WriteOutcome::Written));

    let saved = persistence.store().get(KEY).expect("get").expect("written");
    let restored = TimelineViewState::from_json_str(&saved).expect("valid payload");
    assert_eq!(restored, *persistence.state());
    assert_eq!(restored.zoom_level, ZoomLevel::Day);
    assert_eq!(restored.visual_scale, 1.25);
    assert_eq!(restored.view_mode, ViewMode::Timeline);
}

#[test]
fn setters_clamp_out_of_range_values() {
    let start = Instant::now();
    let mut persistence = load(MemoryStore::new());
    persistence.set_visual_scale(40.0, start);
    assert_eq!(persistence.state().visual_scale, 10.0);
    persistence.set_visual_scale(0.0, start);
    assert_eq!(persistence.state().visual_scale, 0.5);
    persistence.set_scroll_position(-250.0, start);
    assert_eq!(persistence.state().scroll_position, 0.0);

    persistence.set_visual_scale(1.0, start);
    persistence.step_visual_scale_in(start);
    persistence.step_visual_scale_in(start);
    assert_eq!(persistence.state().visual_scale, 1.5);
    persistence.step_visual_scale_out(start);
    assert_eq!(persistence.state().visual_scale, 1.25);
    persistence.reset_visual_scale(start);
    assert_eq!(persistence.state().visual_scale, 1.0);
}

#[test]
fn teardown_cancels_pending_write() {
    let start = Instant::now();
    let mut persistence = load(MemoryStore::new());
    persistence.set_zoom_level(ZoomLevel::Quarter, start);

    assert!(persistence.teardown());
    assert!(persistence.poll(start + Duration::from_secs(1)).is_none());
    persistence.set_zoom_level(ZoomLevel::Day, start + Duration::from_secs(2));
    assert!(!persistence.has_pending_write());
    assert!(persistence.into_store().get(KEY).expect("get").is_none());
}

#[test]
fn flush_writes_immediately() {
    let start = Instant::now();
    let mut persistence = load(MemoryStore::new());
    persistence.set_scroll_position(88.0, start);
    assert_eq!(persistence.flush(), Some(WriteOutcome::Written));
    assert!(persistence.flush().is_none());
}

#[test]
fn quota_failure_prunes_scroll_keys_once_and_retries() {
    let mut store = MemoryStore::with_quota(270);
    for i in 0..7 {
        store
            .set(&format!("timeline-scroll-{i}"), "1234567890")
            .expect("seed scroll keys");
    }
    let before = store.len();

    let start = Instant::now();
    let mut persistence = load(store);
    persistence.set_zoom_level(ZoomLevel::Week, start);
    let outcome = persistence.poll(start + Duration::from_millis(150));

    assert_eq!(outcome, Some(WriteOutcome::WrittenAfterPrune { pruned: 2 }));
    let store = persistence.into_store();
    assert_eq!(store.len(), before - 2 + 1);
    assert!(store.get(KEY).expect("get").is_some());
}

#[test]
fn quota_failure_after_pruning_is_swallowed() {
    let start = Instant::now();
    let mut persistence = load(MemoryStore::with_quota(16));
    persistence.set_zoom_level(ZoomLevel::Week, start);

    let outcome = persistence.poll(start + Duration::from_millis(150));
    let Some(WriteOutcome::Dropped(err)) = outcome else {
        panic!("expected dropped write, got {outcome:?}");
    };
    assert!(err.is_quota_exceeded());
    assert_eq!(persistence.state().zoom_level, ZoomLevel::Week);
}
