//! Condition-to-icon mapping with small layered ASCII art.

use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span, Text};

// ============================================================================
// Art - one entry per row, spaces are transparent
// ============================================================================

mod art {
    pub const SUN: [&str; 5] = [
        "    \\   /    ",
        "     .-.     ",
        "  ― (   ) ―  ",
        "     `-'     ",
        "    /   \\    ",
    ];
    pub const CLOUD_BACK: [&str; 5] = [
        "             ",
        "     .--.    ",
        "  .-(    ).  ",
        "             ",
        "             ",
    ];
    pub const CLOUD_FRONT: [&str; 5] = [
        "             ",
        "             ",
        "             ",
        " (___.__)__) ",
        "             ",
    ];
    pub const SMALL_CLOUD: [&str; 5] = [
        "     .-.     ",
        "    (   ).   ",
        "   (___(__)  ",
        "             ",
        "             ",
    ];
    pub const RAIN: [&str; 5] = [
        "             ",
        "             ",
        "             ",
        "    ʻ ʻ ʻ ʻ  ",
        "   ʻ ʻ ʻ ʻ   ",
    ];
    pub const SNOW: [&str; 5] = [
        "             ",
        "             ",
        "             ",
        "    *  *  *  ",
        "   *  *  *   ",
    ];
    pub const BOLT: [&str; 5] = [
        "             ",
        "             ",
        "             ",
        "    _/  _/   ",
        "    /   /    ",
    ];
}

struct IconLayer {
    rows: &'static [&'static str],
    color: Color,
}

/// Composite layers into Text; later layers draw over earlier ones.
fn composite_layers(layers: &[IconLayer]) -> Text<'static> {
    let height = layers.iter().map(|l| l.rows.len()).max().unwrap_or(0);
    let width = layers
        .iter()
        .flat_map(|l| l.rows.iter())
        .map(|row| row.chars().count())
        .max()
        .unwrap_or(0);

    let mut lines = Vec::with_capacity(height);
    for row in 0..height {
        let mut spans = Vec::with_capacity(width);
        for col in 0..width {
            let mut cell = (' ', Color::Reset);
            for layer in layers.iter().rev() {
                let ch = layer
                    .rows
                    .get(row)
                    .and_then(|line| line.chars().nth(col))
                    .unwrap_or(' ');
                if ch != ' ' {
                    cell = (ch, layer.color);
                    break;
                }
            }
            spans.push(Span::styled(cell.0.to_string(), Style::default().fg(cell.1)));
        }
        lines.push(Line::from(spans));
    }
    Text::from(lines)
}

// ============================================================================
// Types
// ============================================================================

/// Condition labels as reported in `weather[0].main`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Condition {
    Clear,
    Clouds,
    Rain,
    Snow,
    Thunderstorm,
    /// Drizzle, Mist, Fog, Haze and anything else.
    Other,
}

impl Condition {
    /// Exact, case-sensitive match on the label.
    pub fn from_label(label: &str) -> Self {
        match label {
            "Clear" => Condition::Clear,
            "Clouds" => Condition::Clouds,
            "Rain" => Condition::Rain,
            "Snow" => Condition::Snow,
            "Thunderstorm" => Condition::Thunderstorm,
            _ => Condition::Other,
        }
    }

    pub fn icon(self) -> ConditionIcon {
        match self {
            Condition::Clear => ConditionIcon::Sun,
            Condition::Rain => ConditionIcon::Rain,
            Condition::Snow => ConditionIcon::Snow,
            Condition::Thunderstorm => ConditionIcon::Storm,
            Condition::Clouds | Condition::Other => ConditionIcon::Cloud,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConditionIcon {
    Sun,
    Cloud,
    Rain,
    Snow,
    Storm,
}

impl ConditionIcon {
    pub fn name(self) -> &'static str {
        match self {
            ConditionIcon::Sun => "sun",
            ConditionIcon::Cloud => "cloud",
            ConditionIcon::Rain => "rain",
            ConditionIcon::Snow => "snow",
            ConditionIcon::Storm => "storm",
        }
    }

    pub fn glyph(self) -> &'static str {
        match self {
            ConditionIcon::Sun => "\u{2600}",
            ConditionIcon::Cloud => "\u{2601}",
            ConditionIcon::Rain => "\u{26c6}",
            ConditionIcon::Snow => "\u{2744}",
            ConditionIcon::Storm => "\u{26c8}",
        }
    }

    pub fn color(self) -> Color {
        match self {
            ConditionIcon::Sun => Color::Rgb(250, 204, 21),
            ConditionIcon::Cloud => Color::Rgb(229, 231, 235),
            ConditionIcon::Rain => Color::Rgb(147, 197, 253),
            ConditionIcon::Snow => Color::White,
            ConditionIcon::Storm => Color::Rgb(192, 132, 252),
        }
    }

    /// Five-row art in the icon's colors.
    pub fn art(self) -> Text<'static> {
        let cloud = Color::Rgb(156, 163, 175);
        let layers = match self {
            ConditionIcon::Sun => vec![IconLayer {
                rows: &art::SUN,
                color: self.color(),
            }],
            ConditionIcon::Cloud => vec![
                IconLayer {
                    rows: &art::CLOUD_BACK,
                    color: cloud,
                },
                IconLayer {
                    rows: &art::CLOUD_FRONT,
                    color: self.color(),
                },
            ],
            ConditionIcon::Rain => vec![
                IconLayer {
                    rows: &art::SMALL_CLOUD,
                    color: cloud,
                },
                IconLayer {
                    rows: &art::RAIN,
                    color: self.color(),
                },
            ],
            ConditionIcon::Snow => vec![
                IconLayer {
                    rows: &art::SMALL_CLOUD,
                    color: cloud,
                },
                IconLayer {
                    rows: &art::SNOW,
                    color: self.color(),
                },
            ],
            ConditionIcon::Storm => vec![
                IconLayer {
                    rows: &art::SMALL_CLOUD,
                    color: cloud,
                },
                IconLayer {
                    rows: &art::BOLT,
                    color: self.color(),
                },
            ],
        };
        composite_layers(&layers)
    }
}

/// Icon for a condition label; unknown or missing labels get the cloud.
pub fn map_icon(label: Option<&str>) -> ConditionIcon {
    label.map(Condition::from_label).unwrap_or(Condition::Other).icon()
}
