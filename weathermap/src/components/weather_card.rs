use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Flex, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
};

use super::Component;
use super::banner::temperature_band;
use crate::action::Action;
use crate::icon::map_icon;
use crate::state::WeatherRecord;

/// Icon, city, description and temperature of the last found city.
pub struct WeatherCard;

pub struct WeatherCardProps<'a> {
    pub record: &'a WeatherRecord,
}

/// Upper-cases the first letter of every word: "light rain" -> "Light Rain".
pub fn capitalize_words(text: &str) -> String {
    text.split(' ')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Start color of the banner's band for this temperature.
fn temperature_color(celsius: f64) -> Color {
    let ((r, g, b), _) = temperature_band(celsius);
    Color::Rgb(r, g, b)
}

impl Component<Action> for WeatherCard {
    type Props<'a> = WeatherCardProps<'a>;

    fn render(&mut self, frame: &mut Frame, area: Rect, props: Self::Props<'_>) {
        let record = props.record;
        let icon = map_icon(Some(&record.condition_main));
        let title = Line::from(Span::styled(
            format!(" {} {} ", icon.glyph(), icon.name()),
            Style::default().fg(icon.color()),
        ));
        let block = Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(Color::Rgb(71, 85, 105)))
            .style(Style::default().bg(Color::Rgb(30, 41, 59)));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let chunks = Layout::vertical([
            Constraint::Length(5), // icon art
            Constraint::Length(1), // blank
            Constraint::Length(1), // city
            Constraint::Length(1), // description
            Constraint::Length(1), // blank
            Constraint::Length(1), // temperature
        ])
        .flex(Flex::Center)
        .split(inner);

        frame.render_widget(
            Paragraph::new(icon.art()).alignment(Alignment::Center),
            chunks[0],
        );

        let city = Line::from(vec![Span::styled(
            record.city_name.clone(),
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        )])
        .centered();
        frame.render_widget(Paragraph::new(city), chunks[2]);

        let desc = Line::from(vec![Span::styled(
            capitalize_words(&record.condition_description),
            Style::default().fg(Color::Gray),
        )])
        .centered();
        frame.render_widget(Paragraph::new(desc), chunks[3]);

        let temp = Line::from(vec![Span::styled(
            record.temperature_label(),
            Style::default()
                .fg(temperature_color(record.temperature_celsius))
                .add_modifier(Modifier::BOLD),
        )])
        .centered();
        frame.render_widget(Paragraph::new(temp), chunks[5]);
    }
}
