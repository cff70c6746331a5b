use artbox::{
    Alignment as ArtAlignment, Color as ArtColor, Fill, LinearGradient, Renderer, fonts,
    integrations::ratatui::ArtBox,
};
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::Paragraph,
};
use std::cmp::Ordering;

use super::Component;
use crate::action::Action;
use crate::state::{LOADING_ANIM_CYCLE_TICKS, MapCenter};

pub const TITLE: &str = "Weather Map";

/// FIGlet title tinted by the current temperature, with the marker position below.
pub struct Banner;

pub struct BannerProps {
    pub center: MapCenter,
    pub temperature: Option<f64>,
    pub is_animating: bool,
    pub tick_count: u32,
}

type Rgb = (u8, u8, u8);

/// Upper bound in °C, then the gradient's start and end color.
const TEMPERATURE_BANDS: [(f64, Rgb, Rgb); 5] = [
    (0.0, (150, 200, 255), (200, 230, 255)),  // frost
    (15.0, (100, 180, 255), (150, 220, 200)), // cool, into teal
    (25.0, (100, 200, 150), (255, 220, 100)), // mild, green to yellow
    (35.0, (255, 180, 80), (255, 120, 80)),   // warm
    (f64::INFINITY, (255, 100, 80), (255, 60, 60)),
];

/// Cyan title before the first lookup.
const IDLE_BAND: (Rgb, Rgb) = ((103, 232, 249), (59, 130, 246));

/// Start and end color of the band `celsius` falls in.
pub(crate) fn temperature_band(celsius: f64) -> (Rgb, Rgb) {
    let last = TEMPERATURE_BANDS[TEMPERATURE_BANDS.len() - 1];
    let (_, start, end) = TEMPERATURE_BANDS
        .into_iter()
        .find(|(upper, _, _)| celsius < *upper)
        .unwrap_or(last);
    (start, end)
}

fn gradient_colors(temp: Option<f64>) -> (ArtColor, ArtColor) {
    let ((r0, g0, b0), (r1, g1, b1)) = temp.map_or(IDLE_BAND, temperature_band);
    (ArtColor::rgb(r0, g0, b0), ArtColor::rgb(r1, g1, b1))
}

fn make_gradient(colors: (ArtColor, ArtColor), angle: f32, phase: f32) -> Fill {
    let phase = phase.rem_euclid(1.0);
    let mid = colors.0.interpolate(colors.1, 0.5);
    let edge = colors.0.interpolate(colors.1, 0.08);
    let base_stops = [
        (0.0, edge),
        (0.35, colors.0),
        (0.5, mid),
        (0.65, colors.1),
        (1.0, edge),
    ];

    let edge_color = sample_color(&base_stops, (1.0 - phase).rem_euclid(1.0));
    let mut shifted = Vec::with_capacity(base_stops.len() + 2);
    shifted.push((0.0, edge_color));
    shifted.push((1.0, edge_color));
    for (pos, color) in base_stops {
        shifted.push(((pos + phase) % 1.0, color));
    }
    shifted.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(Ordering::Equal));
    let stops = shifted
        .into_iter()
        .map(|(pos, color)| artbox::ColorStop::new(pos, color))
        .collect();

    Fill::Linear(LinearGradient::new(angle, stops))
}

fn animated_phase(tick_count: u32) -> f32 {
    let steps = LOADING_ANIM_CYCLE_TICKS.max(1);
    (tick_count % steps) as f32 / steps as f32
}

fn sample_color(stops: &[(f32, ArtColor)], position: f32) -> ArtColor {
    let pos = position.clamp(0.0, 1.0);
    let Some(&first) = stops.first() else {
        return ArtColor::rgb(255, 255, 255);
    };
    let mut prev = first;
    for &stop in stops {
        if stop.0 >= pos {
            if (stop.0 - prev.0).abs() < f32::EPSILON {
                return stop.1;
            }
            let t = (pos - prev.0) / (stop.0 - prev.0);
            return prev.1.interpolate(stop.1, t);
        }
        prev = stop;
    }
    prev.1
}

impl Component<Action> for Banner {
    type Props<'a> = BannerProps;

    fn render(&mut self, frame: &mut Frame, area: Rect, props: Self::Props<'_>) {
        let chunks = Layout::vertical([
            Constraint::Fill(1),   // FIGlet title, artbox picks the font
            Constraint::Length(1), // Coordinates
        ])
        .split(area);

        let phase = if props.is_animating {
            animated_phase(props.tick_count)
        } else {
            0.0
        };
        let fill = make_gradient(gradient_colors(props.temperature), 5.0, phase);

        let renderer = Renderer::new(fonts::stack(&["terminus", "miniwi"]))
            .with_plain_fallback()
            .with_alignment(ArtAlignment::Center)
            .with_fill(fill);
        frame.render_widget(ArtBox::new(&renderer, TITLE), chunks[0]);

        let coords = Line::from(vec![Span::styled(
            format!(
                "{:.4}°, {:.4}°",
                props.center.lat(),
                props.center.lon()
            ),
            Style::default().fg(Color::DarkGray),
        )])
        .centered();
        frame.render_widget(Paragraph::new(coords), chunks[1]);
    }
}
