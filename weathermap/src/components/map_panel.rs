use ratatui::{
    Frame,
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph},
};
use tui_map::render::{MapRenderResult, MapRenderer};

use super::Component;
use crate::action::Action;
use crate::map_view::MapViewport;
use crate::state::{MapCenter, TileStore, WeatherRecord, format_temperature};

pub const MARKER: char = '●';
pub const EMPTY_POPUP: &str = "Search a city";

/// Tile map with a marker at the searched city and a popup next to it.
pub struct MapPanel {
    renderer: MapRenderer,
    attribution: String,
}

pub struct MapPanelProps<'a> {
    pub tiles: &'a TileStore,
    pub view: MapViewport,
    pub marker: MapCenter,
    pub weather: Option<&'a WeatherRecord>,
}

impl MapPanel {
    pub fn new(attribution: impl Into<String>) -> Self {
        Self {
            renderer: MapRenderer::builder().build(),
            attribution: attribution.into(),
        }
    }

    fn popup_lines(weather: Option<&WeatherRecord>) -> Vec<Line<'static>> {
        match weather {
            Some(record) => vec![
                Line::from(Span::styled(
                    record.city_name.clone(),
                    Style::default().add_modifier(Modifier::BOLD),
                )),
                Line::from(format!(
                    "Temp: {} °C",
                    format_temperature(record.temperature_celsius)
                )),
            ],
            None => vec![Line::from(EMPTY_POPUP)],
        }
    }

    fn render_marker(frame: &mut Frame, cell: (u16, u16)) {
        if let Some(target) = frame.buffer_mut().cell_mut(cell) {
            target.set_char(MARKER);
            target.set_fg(Color::Rgb(239, 68, 68));
        }
    }

    /// Popup sits above the marker, shifted to stay inside `bounds`.
    fn popup_area(bounds: Rect, marker: (u16, u16), lines: &[Line<'_>]) -> Rect {
        let text_width = lines.iter().map(|l| l.width()).max().unwrap_or(0) as u16;
        let width = (text_width + 4).min(bounds.width);
        let height = (lines.len() as u16 + 2).min(bounds.height);

        let max_x = bounds.x + bounds.width.saturating_sub(width);
        let x = marker.0.saturating_sub(width / 2).clamp(bounds.x, max_x);
        let y = if marker.1 >= bounds.y + height {
            marker.1 - height
        } else {
            (marker.1 + 1).min(bounds.y + bounds.height.saturating_sub(height))
        };
        Rect::new(x, y, width, height)
    }

    fn render_popup(
        frame: &mut Frame,
        bounds: Rect,
        marker: (u16, u16),
        weather: Option<&WeatherRecord>,
    ) {
        let lines = Self::popup_lines(weather);
        let area = Self::popup_area(bounds, marker, &lines);
        if area.width < 3 || area.height < 3 {
            return;
        }
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(Color::Rgb(148, 163, 184)))
            .style(Style::default().bg(Color::Rgb(15, 23, 42)).fg(Color::White));
        frame.render_widget(Clear, area);
        frame.render_widget(
            Paragraph::new(lines)
                .alignment(Alignment::Center)
                .block(block),
            area,
        );
    }

    fn render_attribution(&self, frame: &mut Frame, inner: Rect) {
        if inner.height == 0 || self.attribution.is_empty() {
            return;
        }
        let width = (self.attribution.chars().count() as u16 + 2).min(inner.width);
        let row = Rect::new(
            inner.x + inner.width - width,
            inner.y + inner.height - 1,
            width,
            1,
        );
        frame.render_widget(
            Paragraph::new(Line::from(Span::styled(
                format!(" {} ", self.attribution),
                Style::default()
                    .fg(Color::Rgb(203, 213, 225))
                    .bg(Color::Rgb(30, 41, 59)),
            )))
            .alignment(Alignment::Right),
            row,
        );
    }
}

impl Component<Action> for MapPanel {
    type Props<'a> = MapPanelProps<'a>;

    fn render(&mut self, frame: &mut Frame, area: Rect, props: Self::Props<'_>) {
        let block = Block::default()
            .title(" Map ")
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(Color::Rgb(71, 85, 105)));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let result: MapRenderResult = self
            .renderer
            .render(frame, inner, props.tiles, props.view.camera());

        if let Some(cell) = result.project(props.marker.to_geo()) {
            Self::render_popup(frame, inner, cell, props.weather);
            Self::render_marker(frame, cell);
        }
        self.render_attribution(frame, inner);
    }
}
