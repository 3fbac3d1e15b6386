/*
[INPUT]:  Create form contents and workflow phase
[OUTPUT]: Task creation modal with editable fields
[POS]:    TUI UI modal for submitting a task
[UPDATE]: When the create form gains fields
*/

use crossterm::event::KeyEvent;
use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use taskdeck_adapter::KNOWN_TASK_TYPES;
use taskdeck_console::create::{CreateForm, CreateWorkflow};
use tui_input::Input;

use super::{Field, Modal, ModalAction, draw_modal, handle_modal_key};

const NAME: usize = 0;
const TASK_TYPE: usize = 1;
const DESCRIPTION: usize = 2;
const PARAMETERS: usize = 3;

pub(in crate::tui) struct CreateTaskModal {
    modal: Modal,
}

impl CreateTaskModal {
    pub(in crate::tui) fn from_form(form: &CreateForm) -> Self {
        let mut options: Vec<String> = KNOWN_TASK_TYPES.iter().map(|t| t.to_string()).collect();
        let selected = match options.iter().position(|t| *t == form.task_type) {
            Some(index) => index,
            None => {
                options.push(form.task_type.clone());
                options.len() - 1
            }
        };

        let modal = Modal {
            title: String::from("Create Task"),
            focus_index: NAME,
            fields: vec![
                Field::TextInput {
                    label: String::from("Name"),
                    input: Input::new(form.name.clone()),
                },
                Field::Select {
                    label: String::from("Type"),
                    options,
                    selected,
                },
                Field::TextInput {
                    label: String::from("Description"),
                    input: Input::new(form.description.clone()),
                },
                Field::TextInput {
                    label: String::from("Parameters (JSON)"),
                    input: Input::new(form.parameters_text.clone()),
                },
                Field::Button {
                    label: String::from("Create"),
                    action: ModalAction::Submit,
                },
                Field::Button {
                    label: String::from("Cancel"),
                    action: ModalAction::Cancel,
                },
            ],
        };
        Self { modal }
    }

    pub(in crate::tui) fn handle_key(&mut self, key: KeyEvent) -> ModalAction {
        handle_modal_key(&mut self.modal, key)
    }

    /// Copy the entered values verbatim into `form`.
    pub(in crate::tui) fn write_form(&self, form: &mut CreateForm) {
        form.name = self.modal.text(NAME).to_string();
        form.task_type = self.modal.selection(TASK_TYPE).to_string();
        form.description = self.modal.text(DESCRIPTION).to_string();
        form.parameters_text = self.modal.text(PARAMETERS).to_string();
    }

    pub(in crate::tui) fn draw(
        &self,
        frame: &mut ratatui::Frame,
        area: Rect,
        workflow: &CreateWorkflow,
    ) {
        let status = if workflow.is_submitting() {
            Line::from(Span::styled(
                "Submitting...",
                Style::default().fg(Color::Yellow),
            ))
        } else if let Some(error) = workflow.last_error() {
            Line::from(Span::styled(
                error.to_string(),
                Style::default().fg(Color::LightRed),
            ))
        } else {
            Line::from("[Tab] Next field  [Up/Down] Choose type  [Esc] Cancel")
        };
        draw_modal(frame, area, &self.modal, vec![status]);
    }
}
