use proptest::prelude::*;
use timeline_layout::core::{VisualScale, ZoomLevel};
use timeline_layout::persistence::{TimelineViewState, ViewMode};

fn zoom_strategy() -> impl Strategy<Value = ZoomLevel> {
    prop_oneof![
        Just(ZoomLevel::Day),
        Just(ZoomLevel::Week),
        Just(ZoomLevel::Month),
        Just(ZoomLevel::Quarter),
    ]
}

proptest! {
    #[test]
    fn valid_state_survives_persistence(
        timeline in any::<bool>(),
        zoom in zoom_strategy(),
        scale_steps in 2u32..=40,
        scroll in 0u32..5_000_000,
        timestamp in 0i64..4_000_000_000_000
    ) {
        let state = TimelineViewState {
            view_mode: if timeline { ViewMode::Timeline } else { ViewMode::Category },
            zoom_level: zoom,
            visual_scale: f64::from(scale_steps) * VisualScale::STEP,
            scroll_position: f64::from(scroll),
            timestamp,
        };
        let json = state.to_json().expect("serialize");
        prop_assert_eq!(TimelineViewState::from_json_or_default(&json), state);
    }

    #[test]
    fn unknown_zoom_discards_the_whole_payload(
        zoom in "[a-z]{1,12}".prop_filter("not a zoom level", |raw| raw.parse::<ZoomLevel>().is_err()),
        scroll in 0u32..10_000
    ) {
        let json = format!(
            r#"{{"viewMode":"timeline","zoomLevel":"{zoom}","visualScale":1.5,"scrollPosition":{scroll}}}"#
        );
        prop_assert_eq!(TimelineViewState::from_json_or_default(&json), TimelineViewState::default());
    }

    #[test]
    fn out_of_range_scale_discards_the_whole_payload(
        visual_scale in prop_oneof![-100.0f64..0.49, 10.01f64..1_000.0],
        zoom in zoom_strategy()
    ) {
        let json = format!(
            r#"{{"viewMode":"timeline","zoomLevel":"{zoom}","visualScale":{visual_scale},"scrollPosition":0}}"#
        );
        prop_assert_eq!(TimelineViewState::from_json_or_default(&json), TimelineViewState::default());
    }
}
