//! Reducer - pure function: (state, action) -> DispatchResult

use std::collections::BTreeSet;

use tui_dispatch::{DataResource, DispatchResult};
use tui_map::core::tiles_around;

use crate::action::Action;
use crate::effect::Effect;
use crate::map_view::{self, MapViewport};
use crate::state::{
    AppState, TileKey, LOADING_ANIM_CYCLE_TICKS, LOOKUP_FAILED_ALERT, TILE_PIXELS, TILE_RADIUS_X,
    TILE_RADIUS_Y,
};

/// The reducer handles all state transitions
pub fn reducer(state: &mut AppState, action: Action) -> DispatchResult<Effect> {
    match action {
        // ===== Search actions =====
        Action::SearchQueryChange(query) => {
            if state.search_query == query {
                return DispatchResult::unchanged();
            }
            state.search_query = query;
            DispatchResult::changed()
        }

        Action::SearchSubmit => {
            let city = state.search_query.trim();
            if city.is_empty() {
                return DispatchResult::unchanged();
            }
            let city = city.to_string();
            let seq = state.lookup.issue();
            state.tick_count = 0;
            state.loading_anim_ticks_remaining = 0;
            DispatchResult::changed_with(Effect::LookupWeather { seq, city })
        }

        // ===== Weather results =====
        Action::WeatherDidLoad { seq, report } => {
            if !state.lookup.settle(seq) {
                return DispatchResult::unchanged();
            }
            state.loading_anim_ticks_remaining = ticks_to_phase_zero(state.tick_count);
            state.lookup_error = None;

            state.weather = Some(report.record);
            state.map_center = report.center;
            state.map_view.apply(map_view::observe(state.map_center));
            DispatchResult::changed_with_many(request_tiles(state, false))
        }

        Action::WeatherDidError { seq, reason } => {
            if !state.lookup.settle(seq) {
                return DispatchResult::unchanged();
            }
            state.loading_anim_ticks_remaining = ticks_to_phase_zero(state.tick_count);
            state.lookup_error = Some(reason);
            state.alert = Some(LOOKUP_FAILED_ALERT.to_string());
            DispatchResult::changed()
        }

        // ===== Alert actions =====
        Action::AlertClose => {
            if state.alert.take().is_some() {
                DispatchResult::changed()
            } else {
                DispatchResult::unchanged()
            }
        }

        // ===== Map actions =====
        Action::MapZoomIn => zoom(state, 1),
        Action::MapZoomOut => zoom(state, -1),

        Action::MapRefreshTiles => {
            let effects = request_tiles(state, true);
            if effects.is_empty() {
                DispatchResult::unchanged()
            } else {
                DispatchResult::changed_with_many(effects)
            }
        }

        Action::MapTileDidLoad { key, tile } => {
            if state.tiles.resolve(key, DataResource::Loaded(tile)) {
                DispatchResult::changed()
            } else {
                DispatchResult::unchanged()
            }
        }

        Action::MapTileDidError { key, reason } => {
            if state.tiles.resolve(key, DataResource::Failed(reason)) {
                DispatchResult::changed()
            } else {
                DispatchResult::unchanged()
            }
        }

        Action::Render => DispatchResult::changed(),

        // ===== Global actions =====
        Action::Tick => {
            let mut changed = state.map_view.advance();
            if state.loading_anim_active() {
                state.tick_count = state.tick_count.wrapping_add(1);
                if state.loading_anim_ticks_remaining > 0 {
                    state.loading_anim_ticks_remaining -= 1;
                }
                changed = true;
            }
            if changed {
                DispatchResult::changed()
            } else {
                DispatchResult::unchanged()
            }
        }

        Action::Quit => DispatchResult::unchanged(),
    }
}

fn zoom(state: &mut AppState, delta: i8) -> DispatchResult<Effect> {
    if !state.map_view.zoom_by(delta) {
        return DispatchResult::unchanged();
    }
    DispatchResult::changed_with_many(request_tiles(state, false))
}

/// Tiles around where the camera is and where it is heading.
fn wanted_tiles(view: &MapViewport) -> BTreeSet<TileKey> {
    [view.center, view.target()]
        .into_iter()
        .flat_map(|center| {
            tiles_around(
                center.to_geo(),
                view.zoom,
                TILE_PIXELS,
                TILE_RADIUS_X,
                TILE_RADIUS_Y,
            )
        })
        .map(TileKey::from)
        .collect()
}

/// Prunes tiles that left the view and issues fetches for new ones.
fn request_tiles(state: &mut AppState, retry_failed: bool) -> Vec<Effect> {
    let wanted = wanted_tiles(&state.map_view);
    state.tiles.retain(&wanted);
    state
        .tiles
        .request(wanted, retry_failed)
        .into_iter()
        .map(|key| Effect::LoadTile { key })
        .collect()
}

fn ticks_to_phase_zero(tick_count: u32) -> u32 {
    let cycle = LOADING_ANIM_CYCLE_TICKS.max(1);
    if tick_count == 0 {
        return cycle;
    }
    let remainder = tick_count % cycle;
    if remainder == 0 {
        0
    } else {
        cycle - remainder
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::map_view::{PAN_ANIMATION_TICKS, RECENTER_ZOOM};
    use crate::state::{LookupReport, MapCenter, TileImage, WeatherRecord, DEFAULT_CENTER};
    use pretty_assertions::assert_eq;

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

    fn submitted(state: &mut AppState, query: &str) -> u64 {
        reducer(state, Action::SearchQueryChange(query.into()));
        let result = reducer(state, Action::SearchSubmit);
        match result.effects.first() {
            Some(Effect::LookupWeather { seq, .. }) => *seq,
            other => panic!("expected lookup effect, got {:?}", other),
        }
    }

    #[test]
    fn test_submit_trims_query() {
        let mut state = AppState::default();
        reducer(&mut state, Action::SearchQueryChange("  London ".into()));

        let result = reducer(&mut state, Action::SearchSubmit);

        assert!(result.changed);
        assert!(state.is_searching());
        assert_eq!(
            result.effects,
            vec![Effect::LookupWeather {
                seq: 1,
                city: "London".into()
            }]
        );
        assert_eq!(state.search_query, "  London ");
    }

    #[test]
    fn test_blank_submit_is_noop() {
        let mut state = AppState::default();
        for query in ["", "   ", "\t"] {
            reducer(&mut state, Action::SearchQueryChange(query.into()));
            let result = reducer(&mut state, Action::SearchSubmit);
            assert!(!result.changed);
            assert!(result.effects.is_empty());
        }
        assert!(!state.is_searching());
    }

    #[test]
    fn test_load_sets_record_and_center_together() {
        let mut state = AppState::default();
        let seq = submitted(&mut state, "London");

        let result = reducer(
            &mut state,
            Action::WeatherDidLoad {
                seq,
                report: london(),
            },
        );

        assert!(result.changed);
        assert_eq!(state.weather, Some(london().record));
        assert_eq!(state.map_center, london().center);
        assert_eq!(state.map_view.center, london().center);
        assert_eq!(state.map_view.zoom, RECENTER_ZOOM);
        assert!(!state.is_searching());
        assert_eq!(result.effects.len(), 15);
        assert!(result
            .effects
            .iter()
            .all(|e| matches!(e, Effect::LoadTile { key } if key.z == RECENTER_ZOOM)));
    }

    #[test]
    fn test_error_keeps_previous_state_and_alerts() {
        let mut state = AppState::default();
        let seq = submitted(&mut state, "Zzzzznotacity");

        let result = reducer(
            &mut state,
            Action::WeatherDidError {
                seq,
                reason: "weather service answered HTTP 404".into(),
            },
        );

        assert!(result.changed);
        assert!(result.effects.is_empty());
        assert_eq!(state.weather, None);
        assert_eq!(state.map_center, DEFAULT_CENTER);
        assert_eq!(state.alert.as_deref(), Some(LOOKUP_FAILED_ALERT));

        assert!(reducer(&mut state, Action::AlertClose).changed);
        assert_eq!(state.alert, None);
        assert!(!reducer(&mut state, Action::AlertClose).changed);
    }

    #[test]
    fn test_stale_response_is_ignored() {
        let mut state = AppState::default();
        let first = submitted(&mut state, "London");
        let second = submitted(&mut state, "Paris");

        let result = reducer(
            &mut state,
            Action::WeatherDidLoad {
                seq: first,
                report: london(),
            },
        );
        assert!(!result.changed);
        assert_eq!(state.weather, None);
        assert!(state.is_searching());

        let result = reducer(
            &mut state,
            Action::WeatherDidError {
                seq: second,
                reason: "boom".into(),
            },
        );
        assert!(result.changed);
        assert_eq!(state.map_center, DEFAULT_CENTER);
    }

    #[test]
    fn test_same_city_again_restores_recenter_zoom() {
        let mut state = AppState::default();
        let seq = submitted(&mut state, "London");
        reducer(
            &mut state,
            Action::WeatherDidLoad {
                seq,
                report: london(),
            },
        );
        for _ in 0..4 {
            reducer(&mut state, Action::MapZoomOut);
        }
        assert_eq!(state.map_view.zoom, RECENTER_ZOOM - 4);

        let seq = submitted(&mut state, "London");
        let result = reducer(
            &mut state,
            Action::WeatherDidLoad {
                seq,
                report: london(),
            },
        );

        assert_eq!(state.map_view.zoom, RECENTER_ZOOM);
        assert_eq!(state.map_view.center, london().center);
        assert_eq!(state.weather, Some(london().record));
        assert_eq!(result.effects.len(), 15);
        assert!(result
            .effects
            .iter()
            .all(|e| matches!(e, Effect::LoadTile { key } if key.z == RECENTER_ZOOM)));
    }

    #[test]
    fn test_zoom_requests_tiles_and_clamps() {
        let mut state = AppState::default();
        let result = reducer(&mut state, Action::MapZoomIn);
        assert!(result.changed);
        assert_eq!(state.map_view.zoom, 11);
        assert!(!result.effects.is_empty());

        state.map_view.zoom = map_view::MIN_ZOOM;
        assert!(!reducer(&mut state, Action::MapZoomOut).changed);
    }

    #[test]
    fn test_tile_results_fill_the_store() {
        let mut state = AppState::default();
        let result = reducer(&mut state, Action::MapRefreshTiles);
        let Some(Effect::LoadTile { key }) = result.effects.first().cloned() else {
            panic!("expected a tile request");
        };

        let tile = TileImage::solid(TILE_PIXELS, (10, 20, 30));
        assert!(reducer(&mut state, Action::MapTileDidLoad { key, tile }).changed);
        assert!(state.tiles.get(&key).is_some_and(|t| t.is_loaded()));

        let unknown = TileKey { z: 1, x: 0, y: 0 };
        let result = reducer(
            &mut state,
            Action::MapTileDidError {
                key: unknown,
                reason: "gone".into(),
            },
        );
        assert!(!result.changed);
    }

    #[test]
    fn test_tick_drives_pan_and_banner() {
        let mut state = AppState::default();
        assert!(!reducer(&mut state, Action::Tick).changed);

        state.loading_anim_ticks_remaining = 1;
        assert!(reducer(&mut state, Action::Tick).changed);
        assert_eq!(state.loading_anim_ticks_remaining, 0);

        let start = MapCenter::new(51.5074, -0.1278).expect("valid");
        let near = MapCenter::new(51.51, -0.12).expect("valid");
        state.map_view = MapViewport {
            center: start,
            zoom: RECENTER_ZOOM,
            pan: None,
        };
        state.map_view.apply(map_view::observe(near));
        for _ in 0..PAN_ANIMATION_TICKS {
            assert!(reducer(&mut state, Action::Tick).changed);
        }
        assert_eq!(state.map_view.center, near);
        assert!(!reducer(&mut state, Action::Tick).changed);
    }
}
