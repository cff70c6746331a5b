use crossterm::event::{KeyCode, MouseButton, MouseEventKind};
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
};
use tui_dispatch::EventKind;
use tui_dispatch_components::{BaseStyle, Padding, TextInput, TextInputProps, TextInputStyle};

use super::Component;
use crate::action::Action;

pub const PLACEHOLDER: &str = "Enter city name...";
pub const BUTTON_LABEL: &str = "[ Search ]";

const SPINNER: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];
const INPUT_BG: Color = Color::Rgb(226, 232, 240);

/// City text field with a Search button and a pending-lookup spinner.
pub struct SearchBar {
    input: TextInput,
    /// Button hit box from the last render.
    button_area: Option<Rect>,
}

pub struct SearchBarProps<'a> {
    pub query: &'a str,
    pub is_searching: bool,
    pub is_focused: bool,
    pub tick_count: u32,
    // Action constructors
    pub on_query_change: fn(String) -> Action,
    pub on_submit: fn() -> Action,
}

impl Default for SearchBar {
    fn default() -> Self {
        Self {
            input: TextInput::new(),
            button_area: None,
        }
    }
}

impl SearchBar {
    pub fn new() -> Self {
        Self::default()
    }

    fn input_props<'a>(props: &SearchBarProps<'a>, focused: bool) -> TextInputProps<'a, Action> {
        TextInputProps {
            value: props.query,
            placeholder: PLACEHOLDER,
            is_focused: focused,
            style: TextInputStyle {
                base: BaseStyle {
                    border: None,
                    padding: Padding::xy(1, 0),
                    bg: Some(INPUT_BG),
                    fg: Some(Color::Rgb(31, 41, 55)),
                },
                placeholder_style: Some(Style::default().fg(Color::Rgb(100, 116, 139))),
                cursor_style: None,
            },
            on_change: props.on_query_change,
            on_submit: |_| Action::SearchSubmit,
            on_cursor_move: Some(|_| Action::Render),
        }
    }

    fn hits_button(&self, column: u16, row: u16) -> bool {
        self.button_area.is_some_and(|area| {
            column >= area.x
                && column < area.x + area.width
                && row >= area.y
                && row < area.y + area.height
        })
    }
}

impl Component<Action> for SearchBar {
    type Props<'a> = SearchBarProps<'a>;

    fn handle_event(
        &mut self,
        event: &EventKind,
        props: Self::Props<'_>,
    ) -> impl IntoIterator<Item = Action> {
        if !props.is_focused {
            return Vec::new();
        }

        match event {
            EventKind::Mouse(mouse) => {
                if matches!(mouse.kind, MouseEventKind::Down(MouseButton::Left))
                    && self.hits_button(mouse.column, mouse.row)
                {
                    return vec![(props.on_submit)()];
                }
                Vec::new()
            }
            EventKind::Key(key) => match key.code {
                KeyCode::Enter => vec![(props.on_submit)()],
                KeyCode::Esc => vec![Action::Quit],
                KeyCode::PageUp => vec![Action::MapZoomIn],
                KeyCode::PageDown => vec![Action::MapZoomOut],
                KeyCode::F(5) => vec![Action::MapRefreshTiles],
                _ => {
                    let input_props = Self::input_props(&props, true);
                    self.input
                        .handle_event(event, input_props)
                        .into_iter()
                        .collect()
                }
            },
            _ => Vec::new(),
        }
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, props: Self::Props<'_>) {
        let [input_area, _, button_area, _, status_area] = Layout::horizontal([
            Constraint::Min(10),
            Constraint::Length(1),
            Constraint::Length(BUTTON_LABEL.chars().count() as u16),
            Constraint::Length(1),
            Constraint::Length(14),
        ])
        .areas(area);

        let input_props = Self::input_props(&props, props.is_focused);
        self.input.render(frame, input_area, input_props);

        self.button_area = Some(button_area);
        let button_style = Style::default()
            .fg(Color::White)
            .bg(Color::Rgb(14, 165, 233))
            .add_modifier(Modifier::BOLD);
        frame.render_widget(
            Paragraph::new(Line::from(Span::styled(BUTTON_LABEL, button_style))),
            button_area,
        );

        if props.is_searching {
            let frame_idx = (props.tick_count as usize / 4) % SPINNER.len();
            let spinner = Line::from(vec![
                Span::styled(SPINNER[frame_idx], Style::default().fg(Color::Cyan)),
                Span::styled(" searching…", Style::default().fg(Color::DarkGray)),
            ]);
            frame.render_widget(Paragraph::new(spinner), status_area);
        }
    }
}
