/*
[INPUT]:  Modal state, fields, and key events
[OUTPUT]: Modal rendering output and modal action results
[POS]:    TUI UI modal module root
[UPDATE]: When adding field kinds or modal key bindings
*/

mod create_task;

pub(in crate::tui) use create_task::CreateTaskModal;

use crossterm::event::{Event as CrosstermEvent, KeyCode, KeyEvent};
use ratatui::layout::{Position, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};
use tui_input::Input;
use tui_input::backend::crossterm::EventHandler;
use unicode_width::UnicodeWidthStr;

use crate::tui::runtime::border_style;

pub(in crate::tui) struct Modal {
    pub(super) title: String,
    pub(super) focus_index: usize,
    pub(super) fields: Vec<Field>,
}

pub(in crate::tui) enum Field {
    TextInput {
        label: String,
        input: Input,
    },
    Select {
        label: String,
        options: Vec<String>,
        selected: usize,
    },
    Button {
        label: String,
        action: ModalAction,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(in crate::tui) enum ModalAction {
    Submit,
    Cancel,
    None,
}

impl Modal {
    pub(super) fn text(&self, index: usize) -> &str {
        match self.fields.get(index) {
            Some(Field::TextInput { input, .. }) => input.value(),
            _ => "",
        }
    }

    pub(super) fn selection(&self, index: usize) -> &str {
        match self.fields.get(index) {
            Some(Field::Select {
                options, selected, ..
            }) => options.get(*selected).map(String::as_str).unwrap_or(""),
            _ => "",
        }
    }

    fn focus_next(&mut self) {
        if !self.fields.is_empty() {
            self.focus_index = (self.focus_index + 1) % self.fields.len();
        }
    }

    fn focus_previous(&mut self) {
        if !self.fields.is_empty() {
            self.focus_index = (self.focus_index + self.fields.len() - 1) % self.fields.len();
        }
    }
}

/// Render `modal` with optional status lines below its fields.
pub(in crate::tui) fn draw_modal(
    frame: &mut ratatui::Frame,
    area: Rect,
    modal: &Modal,
    status: Vec<Line<'static>>,
) {
    frame.render_widget(Clear, area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style())
        .title(modal.title.as_str());
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let mut cursor = None;
    let mut lines: Vec<Line> = modal
        .fields
        .iter()
        .enumerate()
        .map(|(index, field)| {
            let focused = index == modal.focus_index;
            let content = match field {
                Field::TextInput { label, input } => {
                    let prefix = format!("{label}: ");
                    if focused {
                        let x = inner.x as usize + prefix.width() + input.visual_cursor();
                        let max_x = inner.right().saturating_sub(1) as usize;
                        cursor = Some(Position::new(x.min(max_x) as u16, inner.y + index as u16));
                    }
                    format!("{prefix}{}", input.value())
                }
                Field::Select {
                    label,
                    options,
                    selected,
                } => {
                    let selected_value = options.get(*selected).map(String::as_str).unwrap_or("-");
                    format!("{label}: < {selected_value} >")
                }
                Field::Button { label, .. } => format!("[{label}]"),
            };
            let style = if focused {
                Style::default().add_modifier(Modifier::REVERSED)
            } else {
                Style::default()
            };
            Line::from(Span::styled(content, style))
        })
        .collect();
    lines.push(Line::default());
    lines.extend(status);

    frame.render_widget(Paragraph::new(lines), inner);
    if let Some(position) = cursor {
        frame.set_cursor_position(position);
    }
}

pub(in crate::tui) fn handle_modal_key(modal: &mut Modal, key: KeyEvent) -> ModalAction {
    let focus = modal.focus_index;
    match key.code {
        KeyCode::Esc => ModalAction::Cancel,
        KeyCode::Tab => {
            modal.focus_next();
            ModalAction::None
        }
        KeyCode::BackTab => {
            modal.focus_previous();
            ModalAction::None
        }
        KeyCode::Enter => match modal.fields.get(focus) {
            Some(Field::Button { action, .. }) => *action,
            _ => {
                modal.focus_next();
                ModalAction::None
            }
        },
        KeyCode::Up | KeyCode::Left | KeyCode::Down | KeyCode::Right
            if matches!(modal.fields.get(focus), Some(Field::Select { .. })) =>
        {
            if let Some(Field::Select {
                options, selected, ..
            }) = modal.fields.get_mut(focus)
            {
                let backwards = matches!(key.code, KeyCode::Up | KeyCode::Left);
                if backwards {
                    *selected = selected.saturating_sub(1);
                } else if *selected + 1 < options.len() {
                    *selected += 1;
                }
            }
            ModalAction::None
        }
        KeyCode::Up => {
            modal.focus_previous();
            ModalAction::None
        }
        KeyCode::Down => {
            modal.focus_next();
            ModalAction::None
        }
        _ => {
            if let Some(Field::TextInput { input, .. }) = modal.fields.get_mut(focus) {
                input.handle_event(&CrosstermEvent::Key(key));
            }
            ModalAction::None
        }
    }
}
