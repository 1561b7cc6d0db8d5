use approx::assert_relative_eq;
use chrono::{NaiveDate, NaiveTime};
use timeline_layout::core::{DateWindow, Event, TimelineScale, VisualScale, ZoomLevel};

fn day(raw: &str) -> NaiveDate {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").expect("valid test date")
}

#[test]
fn month_zoom_places_february_first_at_155px() {
    let window = DateWindow::new(day("2025-01-01"), day("2025-03-01")).expect("window");
    let scale = TimelineScale::resolve(ZoomLevel::Month, 1.0, window);

    assert_eq!(scale.pixels_per_day, 5.0);
    assert_relative_eq!(
        scale.mapper(window).day_to_x(day("2025-02-01")),
        155.0,
        epsilon = 1e-9
    );
}

#[test]
fn pixels_per_day_tracks_visual_scale_for_every_zoom() {
    let window = DateWindow::new(day("2025-01-01"), day("2025-01-11")).expect("window");
    for (zoom, base) in [
        (ZoomLevel::Day, 100.0),
        (ZoomLevel::Week, 20.0),
        (ZoomLevel::Month, 5.0),
        (ZoomLevel::Quarter, 2.0),
    ] {
        let scale = TimelineScale::resolve(zoom, 1.5, window);
        assert_relative_eq!(scale.pixels_per_day, base * 1.5);
        assert_relative_eq!(scale.total_width, 10.0 * base * 1.5);
    }
}

#[test]
fn out_of_range_visual_scale_is_clamped_not_degenerate() {
    let window = DateWindow::new(day("2025-01-01"), day("2025-02-01")).expect("window");
    let low = TimelineScale::resolve(ZoomLevel::Week, 0.01, window);
    let high = TimelineScale::resolve(ZoomLevel::Week, 500.0, window);

    assert_eq!(low.visual_scale.get(), VisualScale::MIN);
    assert_eq!(high.visual_scale.get(), VisualScale::MAX);
    assert!(low.total_width > 0.0);
}

#[test]
fn time_of_day_interpolates_within_the_day() {
    let window = DateWindow::new(day("2025-01-01"), day("2025-01-03")).expect("window");
    let scale = TimelineScale::resolve(ZoomLevel::Day, 1.0, window);
    let mapper = scale.mapper(window);

    let noon = day("2025-01-02").and_time(NaiveTime::from_hms_opt(12, 0, 0).expect("noon"));
    assert_relative_eq!(mapper.datetime_to_x(noon), 150.0, epsilon = 1e-9);
}

#[test]
fn dates_outside_window_clamp_to_exact_edges() {
    let window = DateWindow::new(day("2025-03-01"), day("2025-04-01")).expect("window");
    let scale = TimelineScale::resolve(ZoomLevel::Quarter, 2.0, window);
    let mapper = scale.mapper(window);

    assert_eq!(mapper.day_to_x(day("1999-12-31")), 0.0);
    assert_eq!(mapper.day_to_x(day("2025-02-28")), 0.0);
    assert_eq!(mapper.day_to_x(day("2025-04-02")), scale.total_width);
    assert_eq!(mapper.day_to_x(day("2100-01-01")), scale.total_width);
}

#[test]
fn fitted_window_pads_around_events() {
    let events = vec![
        Event::new("a", "Gates open", "2025-07-04", "ops"),
        Event::new("b", "Teardown", "2025-07-07", "ops"),
    ];
    let window = DateWindow::fit_events(&events).expect("window");
    assert_eq!(window.start_date(), day("2025-06-20"));
    assert_eq!(window.end_date(), day("2025-08-07"));
    assert!(DateWindow::fit_events(&[]).is_none());
}
