use ratatui::layout::{Constraint, Layout};
use ratatui::prelude::{Frame, Rect};
use tui_dispatch::EventKind;
use tui_dispatch_components::{
    StatusBar, StatusBarHint, StatusBarProps, StatusBarSection, StatusBarStyle,
};
use tui_map::source::OSM_ATTRIBUTION;

use super::{
    Banner, BannerProps, Component, MapPanel, MapPanelProps, SearchBar, SearchBarProps,
    WeatherCard, WeatherCardProps,
};
use crate::action::Action;
use crate::state::AppState;

const CARD_WIDTH: u16 = 32;

/// Props for AppView - read-only view of state
pub struct AppViewProps<'a> {
    pub state: &'a AppState,
    pub is_focused: bool,
}

/// Banner, search row, weather card beside the map, and the key hints.
pub struct AppView {
    search: SearchBar,
    map: MapPanel,
}

impl Default for AppView {
    fn default() -> Self {
        Self::with_attribution(OSM_ATTRIBUTION)
    }
}

impl AppView {
    pub fn with_attribution(attribution: impl Into<String>) -> Self {
        Self {
            search: SearchBar::new(),
            map: MapPanel::new(attribution),
        }
    }

    fn search_props<'a>(props: &AppViewProps<'a>) -> SearchBarProps<'a> {
        SearchBarProps {
            query: &props.state.search_query,
            is_searching: props.state.is_searching(),
            is_focused: props.is_focused,
            tick_count: props.state.tick_count,
            on_query_change: Action::SearchQueryChange,
            on_submit: || Action::SearchSubmit,
        }
    }
}

impl Component<Action> for AppView {
    type Props<'a> = AppViewProps<'a>;

    fn handle_event(
        &mut self,
        event: &EventKind,
        props: Self::Props<'_>,
    ) -> impl IntoIterator<Item = Action> {
        let search_props = Self::search_props(&props);
        self.search
            .handle_event(event, search_props)
            .into_iter()
            .collect::<Vec<_>>()
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, props: AppViewProps<'_>) {
        let state = props.state;
        let chunks = Layout::vertical([
            Constraint::Length(7), // Banner
            Constraint::Length(1), // Search row
            Constraint::Length(1), // Spacer
            Constraint::Min(6),    // Card + map
            Constraint::Length(1), // Help bar
        ])
        .split(area);

        let mut banner = Banner;
        banner.render(
            frame,
            chunks[0],
            BannerProps {
                center: state.map_center,
                temperature: state.weather.as_ref().map(|w| w.temperature_celsius),
                is_animating: state.loading_anim_active(),
                tick_count: state.tick_count,
            },
        );

        let search_props = Self::search_props(&props);
        self.search.render(frame, chunks[1], search_props);

        let map_area = match &state.weather {
            Some(record) => {
                let [card_area, map_area] =
                    Layout::horizontal([Constraint::Length(CARD_WIDTH), Constraint::Min(10)])
                        .areas(chunks[3]);
                let mut card = WeatherCard;
                card.render(frame, card_area, WeatherCardProps { record });
                map_area
            }
            None => chunks[3],
        };

        self.map.render(
            frame,
            map_area,
            MapPanelProps {
                tiles: &state.tiles,
                view: state.map_view,
                marker: state.map_center,
                weather: state.weather.as_ref(),
            },
        );

        let mut status_bar = StatusBar::new();
        <StatusBar as Component<Action>>::render(
            &mut status_bar,
            frame,
            chunks[4],
            StatusBarProps {
                left: StatusBarSection::empty(),
                center: StatusBarSection::hints(&[
                    StatusBarHint::new("enter", "search"),
                    StatusBarHint::new("pgup/pgdn", "zoom"),
                    StatusBarHint::new("f5", "reload tiles"),
                    StatusBarHint::new("esc", "quit"),
                ]),
                right: StatusBarSection::empty(),
                style: StatusBarStyle::default(),
                is_focused: false,
            },
        );
    }
}
