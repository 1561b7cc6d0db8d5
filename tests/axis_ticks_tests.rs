use chrono::NaiveDate;
use timeline_layout::api::{
    AxisTicks, DEFAULT_ALIGNMENT_TOLERANCE_PX, LayoutConfig, layout_events,
    validate_axis_alignment,
};
use timeline_layout::core::{DateWindow, Event, Granularity, TimelineScale, ZoomLevel};

fn day(raw: &str) -> NaiveDate {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").expect("valid test date")
}

fn ticks_for(window: DateWindow, zoom: ZoomLevel, visual_scale: f64) -> AxisTicks {
    let scale = TimelineScale::resolve(zoom, visual_scale, window);
    AxisTicks::new(window, scale, LayoutConfig::default().hour_tick_reduce_threshold)
}

#[test]
fn granularity_follows_zoom_level() {
    let window = DateWindow::new(day("2025-01-01"), day("2025-02-01")).expect("window");
    assert_eq!(ticks_for(window, ZoomLevel::Day, 8.0).granularity(), Granularity::Hour);
    assert_eq!(ticks_for(window, ZoomLevel::Week, 1.0).granularity(), Granularity::Day);
    assert_eq!(ticks_for(window, ZoomLevel::Month, 1.0).granularity(), Granularity::Week);
    assert_eq!(ticks_for(window, ZoomLevel::Quarter, 1.0).granularity(), Granularity::Month);
}

#[test]
fn tick_counts_match_window_length() {
    let window = DateWindow::new(day("2025-01-01"), day("2025-01-29")).expect("window");
    assert_eq!(ticks_for(window, ZoomLevel::Week, 1.0).count(), 29);
    assert_eq!(ticks_for(window, ZoomLevel::Month, 1.0).count(), 5);
    assert_eq!(ticks_for(window, ZoomLevel::Quarter, 1.0).count(), 1);
    assert_eq!(ticks_for(window, ZoomLevel::Day, 1.0).count(), 28 * 4 + 1);
}

#[test]
fn every_sequence_terminates_and_is_monotonic() {
    let windows = [
        DateWindow::new(day("2025-05-05"), day("2025-05-05")).expect("zero length"),
        DateWindow::new(day("2024-02-28"), day("2024-03-02")).expect("leap"),
        DateWindow::new(day("2024-01-31"), day("2025-12-31")).expect("long"),
    ];
    for window in windows {
        for zoom in ZoomLevel::ALL {
            let ticks: Vec<_> = ticks_for(window, zoom, 1.0).collect();
            assert!(!ticks.is_empty());
            assert!(ticks.windows(2).all(|pair| pair[0].date < pair[1].date));
            assert!(ticks.windows(2).all(|pair| pair[0].x <= pair[1].x));
            let width = TimelineScale::resolve(zoom, 1.0, window).total_width;
            assert!(ticks.iter().all(|tick| (0.0..=width).contains(&tick.x)));
        }
    }
}

#[test]
fn monthly_ruler_marks_quarter_starts() {
    let window = DateWindow::new(day("2025-01-01"), day("2025-12-01")).expect("window");
    let primary: Vec<String> = ticks_for(window, ZoomLevel::Quarter, 1.0)
        .filter(|tick| tick.is_primary)
        .map(|tick| tick.label)
        .collect();
    assert_eq!(primary, vec!["Jan", "Apr", "Jul", "Oct"]);
}

#[test]
fn generator_is_restartable() {
    let window = DateWindow::new(day("2025-01-01"), day("2025-01-03")).expect("window");
    let mut ticks = ticks_for(window, ZoomLevel::Day, 8.0);
    let first: Vec<_> = ticks.by_ref().take(3).collect();
    let replay: Vec<_> = ticks.restart().take(3).collect();
    assert_eq!(first, replay);
    assert_eq!(first[1].label, "1 AM");
}

#[test]
fn ruler_and_cards_share_the_coordinate_mapper() {
    let window = DateWindow::new(day("2025-06-01"), day("2025-08-31")).expect("window");
    let events: Vec<Event> = (0..40)
        .map(|i| {
            let date = day("2025-06-01") + chrono::Days::new(i * 2);
            Event::new(format!("e{i}"), "Set", date.format("%Y-%m-%d").to_string(), "c")
        })
        .collect();

    for zoom in [ZoomLevel::Day, ZoomLevel::Week] {
        for visual_scale in [0.5, 1.0, 1.75] {
            let scale = TimelineScale::resolve(zoom, visual_scale, window);
            let ticks: Vec<_> = AxisTicks::new(window, scale, 7.5).collect();
            let layout = layout_events(&events, window, scale, &LayoutConfig::default());
            let drift =
                validate_axis_alignment(&ticks, &layout.positions, DEFAULT_ALIGNMENT_TOLERANCE_PX);
            assert!(drift.is_empty(), "{zoom} at {visual_scale}: {drift:?}");
        }
    }
}
