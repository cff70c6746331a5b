use crossterm::event::KeyCode;
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Flex, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
};
use tui_dispatch::EventKind;
use tui_dispatch_components::{
    BaseStyle, Modal, ModalBehavior, ModalProps, ModalStyle, Padding, centered_rect,
};

use super::Component;
use crate::action::Action;

const DISMISS_HINT: &str = "enter / esc to dismiss";

/// Blocking notification; every other key is swallowed until it is dismissed.
pub struct AlertModal {
    modal: Modal,
}

impl Default for AlertModal {
    fn default() -> Self {
        Self {
            modal: Modal::new(),
        }
    }
}

pub struct AlertModalProps<'a> {
    pub message: &'a str,
    pub is_focused: bool,
}

impl AlertModal {
    pub fn area(screen: Rect) -> Rect {
        centered_rect(40, 7, screen)
    }
}

impl Component<Action> for AlertModal {
    type Props<'a> = AlertModalProps<'a>;

    fn handle_event(
        &mut self,
        event: &EventKind,
        props: Self::Props<'_>,
    ) -> impl IntoIterator<Item = Action> {
        if !props.is_focused {
            return None;
        }
        match event {
            EventKind::Key(key) => match key.code {
                KeyCode::Enter | KeyCode::Esc | KeyCode::Char(' ') => Some(Action::AlertClose),
                _ => None,
            },
            _ => None,
        }
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, props: Self::Props<'_>) {
        let modal_area = Self::area(area);
        let mut render_content = |frame: &mut Frame, content_area: Rect| {
            let [message_area, hint_area] =
                Layout::vertical([Constraint::Length(1), Constraint::Length(1)])
                    .flex(Flex::SpaceAround)
                    .areas(content_area);
            let message = Line::from(Span::styled(
                props.message,
                Style::default()
                    .fg(Color::Rgb(252, 165, 165))
                    .add_modifier(Modifier::BOLD),
            ));
            frame.render_widget(
                Paragraph::new(message).alignment(Alignment::Center),
                message_area,
            );
            frame.render_widget(
                Paragraph::new(Line::from(Span::styled(
                    DISMISS_HINT,
                    Style::default().fg(Color::DarkGray),
                )))
                .alignment(Alignment::Center),
                hint_area,
            );
        };

        self.modal.render(
            frame,
            area,
            ModalProps {
                is_open: true,
                is_focused: props.is_focused,
                area: modal_area,
                style: ModalStyle {
                    base: BaseStyle {
                        bg: Some(Color::Rgb(45, 25, 30)),
                        padding: Padding::all(1),
                        border: None,
                        fg: None,
                    },
                    ..Default::default()
                },
                behavior: ModalBehavior::default(),
                on_close: || Action::AlertClose,
                render_content: &mut render_content,
            },
        );
    }
}
