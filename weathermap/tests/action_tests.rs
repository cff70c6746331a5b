//! Reducer and component tests through the store and TestHarness

use tui_dispatch::testing::*;
use tui_dispatch::{EffectStore, NumericComponentId, assert_emitted, assert_not_emitted};
use weathermap::{
    action::Action,
    components::{AppView, AppViewProps, Component},
    effect::Effect,
    reducer::reducer,
    state::{
        AppState, DEFAULT_CENTER, LOOKUP_FAILED_ALERT, LookupReport, MapCenter, WeatherRecord,
    },
};

fn london() -> LookupReport {
    LookupReport {
        record: WeatherRecord {
            city_name: "London".into(),
            condition_main: "Rain".into(),
            condition_description: "light rain".into(),
            temperature_celsius: 15.2,
        },
        center: MapCenter::new(51.5074, -0.1278).expect("valid"),
    }
}

#[test]
fn test_reducer_submit_issues_lookup() {
    let mut store = EffectStore::new(AppState::default(), reducer);

    store.dispatch(Action::SearchQueryChange("London".into()));
    let result = store.dispatch(Action::SearchSubmit);

    assert!(result.changed, "State should change");
    assert!(store.state().is_searching());
    assert_eq!(result.effects.len(), 1);
    assert!(matches!(
        &result.effects[0],
        Effect::LookupWeather { seq: 1, city } if city == "London"
    ));
}

#[test]
fn test_reducer_lookup_success() {
    let mut store = EffectStore::new(AppState::default(), reducer);

    store.dispatch(Action::SearchQueryChange("London".into()));
    store.dispatch(Action::SearchSubmit);
    store.dispatch(Action::WeatherDidLoad {
        seq: 1,
        report: london(),
    });

    let state = store.state();
    assert_eq!(state.weather.as_ref(), Some(&london().record));
    assert_eq!(state.map_center.lat(), 51.5074);
    assert_eq!(state.map_center.lon(), -0.1278);
    assert_eq!(state.alert, None);
    assert_eq!(state.search_query, "London");
}

#[test]
fn test_reducer_lookup_failure_alerts() {
    let mut store = EffectStore::new(AppState::default(), reducer);

    store.dispatch(Action::SearchQueryChange("Zzzzznotacity".into()));
    store.dispatch(Action::SearchSubmit);
    store.dispatch(Action::WeatherDidError {
        seq: 1,
        reason: "weather service answered HTTP 404".into(),
    });

    let state = store.state();
    assert_eq!(state.alert.as_deref(), Some(LOOKUP_FAILED_ALERT));
    assert_eq!(state.weather, None);
    assert_eq!(state.map_center, DEFAULT_CENTER);

    store.dispatch(Action::AlertClose);
    assert_eq!(store.state().alert, None);
}

#[test]
fn test_failure_after_success_keeps_previous_city() {
    let mut store = EffectStore::new(AppState::default(), reducer);

    store.dispatch(Action::SearchQueryChange("London".into()));
    store.dispatch(Action::SearchSubmit);
    store.dispatch(Action::WeatherDidLoad {
        seq: 1,
        report: london(),
    });

    store.dispatch(Action::SearchQueryChange("Zzzzznotacity".into()));
    store.dispatch(Action::SearchSubmit);
    store.dispatch(Action::WeatherDidError {
        seq: 2,
        reason: "weather service answered HTTP 404".into(),
    });

    let state = store.state();
    assert_eq!(state.weather.as_ref(), Some(&london().record));
    assert_eq!(state.map_center, london().center);
    assert!(state.alert.is_some());
}

#[test]
fn test_component_keyboard_events() {
    let mut harness = TestHarness::<AppState, Action>::new(AppState {
        search_query: "London".into(),
        ..Default::default()
    });
    let mut component = AppView::default();

    let actions = harness.send_keys::<NumericComponentId, _, _>("enter", |state, event| {
        let props = AppViewProps {
            state,
            is_focused: true,
        };
        component
            .handle_event(&event.kind, props)
            .into_iter()
            .collect::<Vec<_>>()
    });

    actions.assert_count(1);
    actions.assert_first(Action::SearchSubmit);
}

#[test]
fn test_component_zoom_and_quit_keys() {
    let mut harness = TestHarness::<AppState, Action>::default();
    let mut component = AppView::default();

    let keys = "pageup pagedown f5 esc";
    let actions = harness.send_keys::<NumericComponentId, _, _>(keys, |state, event| {
        let props = AppViewProps {
            state,
            is_focused: true,
        };
        component
            .handle_event(&event.kind, props)
            .into_iter()
            .collect::<Vec<_>>()
    });

    assert_eq!(
        actions,
        vec![
            Action::MapZoomIn,
            Action::MapZoomOut,
            Action::MapRefreshTiles,
            Action::Quit,
        ]
    );
}

#[test]
fn test_component_ignores_when_unfocused() {
    let mut harness = TestHarness::<AppState, Action>::default();
    let mut component = AppView::default();

    let actions = harness.send_keys::<NumericComponentId, _, _>("enter a esc", |state, event| {
        let props = AppViewProps {
            state,
            is_focused: false,
        };
        component
            .handle_event(&event.kind, props)
            .into_iter()
            .collect::<Vec<_>>()
    });

    actions.assert_empty();
}

#[test]
fn test_action_categories() {
    let did_load = Action::WeatherDidLoad {
        seq: 1,
        report: london(),
    };
    let submit = Action::SearchSubmit;
    let close = Action::AlertClose;
    let tick = Action::Tick;

    assert_eq!(did_load.category(), Some("weather_did"));
    assert_eq!(submit.category(), Some("search"));
    assert_eq!(close.category(), Some("alert"));
    assert_eq!(tick.category(), None);

    assert!(did_load.is_weather_did());
    assert!(submit.is_search());
    assert!(close.is_alert());
}

#[test]
fn test_harness_emit_and_drain() {
    let mut harness = TestHarness::<(), Action>::new(());

    harness.emit(Action::SearchSubmit);
    harness.emit(Action::MapZoomIn);
    harness.emit(Action::WeatherDidError {
        seq: 1,
        reason: "oops".into(),
    });

    let actions = harness.drain_emitted();
    actions.assert_count(3);
}

#[test]
fn test_assert_emitted_macro() {
    let actions = vec![
        Action::SearchSubmit,
        Action::WeatherDidLoad {
            seq: 1,
            report: london(),
        },
    ];

    assert_emitted!(actions, Action::SearchSubmit);
    assert_emitted!(actions, Action::WeatherDidLoad { .. });
    assert_not_emitted!(actions, Action::Quit);
    assert_not_emitted!(actions, Action::WeatherDidError { .. });
}
