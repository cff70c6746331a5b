//! Render snapshot tests using RenderHarness

use tui_dispatch::testing::*;
use weathermap::{
    components::{
        AlertModal, AlertModalProps, AppView, AppViewProps, Component, EMPTY_POPUP, MARKER,
    },
    map_view::MapViewport,
    state::{AppState, LOOKUP_FAILED_ALERT, MapCenter, TILE_PIXELS, TileImage, WeatherRecord},
};

fn render_app(state: &AppState, width: u16, height: u16) -> String {
    let mut render = RenderHarness::new(width, height);
    let mut component = AppView::default();
    render.render_to_string_plain(|frame| {
        let props = AppViewProps {
            state,
            is_focused: true,
        };
        component.render(frame, frame.area(), props);
    })
}

fn with_weather(main: &str, description: &str, temp: f64) -> AppState {
    AppState {
        weather: Some(WeatherRecord {
            city_name: "London".into(),
            condition_main: main.into(),
            condition_description: description.into(),
            temperature_celsius: temp,
        }),
        ..Default::default()
    }
}

#[test]
fn test_render_initial_screen() {
    let output = render_app(&AppState::default(), 100, 32);

    assert!(output.contains("Enter city name..."), "{output}");
    assert!(output.contains("[ Search ]"));
    assert!(output.contains(MARKER));
    assert!(output.contains(EMPTY_POPUP));
    assert!(output.contains("28.6139"), "default marker coordinates:\n{output}");
    assert!(output.contains("OpenStreetMap contributors"));
}

#[test]
fn test_render_rain_card() {
    let output = render_app(&with_weather("Rain", "light rain", 15.2), 100, 32);

    assert!(output.contains("London"));
    assert!(output.contains("Light Rain"));
    assert!(output.contains("15.2°C"));
    assert!(output.contains("Temp: 15.2 °C"), "popup text:\n{output}");
}

#[test]
fn test_render_whole_degrees_without_decimal() {
    let output = render_app(&with_weather("Clear", "clear sky", 15.0), 100, 32);

    assert!(output.contains("15°C"));
    assert!(!output.contains("15.0"));
    assert!(output.contains("Clear Sky"));
}

#[test]
fn test_render_searching_spinner() {
    let mut state = AppState::default();
    state.search_query = "London".into();
    state.lookup.issue();

    let output = render_app(&state, 100, 32);
    assert!(output.contains("searching"), "{output}");
}

#[test]
fn test_render_loaded_tiles_fill_the_map() {
    let mut state = AppState {
        map_view: MapViewport::new(MapCenter::new(0.0, 0.0).expect("valid")),
        ..Default::default()
    };
    state.map_center = state.map_view.center;
    let keys: Vec<_> = {
        let view = state.map_view;
        tui_map::core::tiles_around(view.center.to_geo(), view.zoom, TILE_PIXELS, 2, 1)
            .into_iter()
            .map(weathermap::state::TileKey::from)
            .collect()
    };
    let requested = state.tiles.request(keys.iter().copied(), false);
    assert_eq!(requested.len(), keys.len());
    for key in keys {
        state.tiles.resolve(
            key,
            tui_dispatch::DataResource::Loaded(TileImage::solid(TILE_PIXELS, (170, 211, 223))),
        );
    }

    let output = render_app(&state, 100, 32);
    assert!(output.contains('▀'));
}

#[test]
fn test_render_alert_over_app() {
    let mut render = RenderHarness::new(100, 32);
    let mut app = AppView::default();
    let mut alert = AlertModal::default();
    let state = AppState {
        alert: Some(LOOKUP_FAILED_ALERT.into()),
        ..Default::default()
    };

    let output = render.render_to_string_plain(|frame| {
        let area = frame.area();
        app.render(
            frame,
            area,
            AppViewProps {
                state: &state,
                is_focused: false,
            },
        );
        alert.render(
            frame,
            area,
            AlertModalProps {
                message: LOOKUP_FAILED_ALERT,
                is_focused: true,
            },
        );
    });

    assert!(output.contains(LOOKUP_FAILED_ALERT));
}
