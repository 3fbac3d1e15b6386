/*
[INPUT]:  Console handle, log buffer, and operator selections
[OUTPUT]: AppState holding tab, row selection, and the create modal
[POS]:    TUI app state and console glue
[UPDATE]: When adding tabs, overlays, or selection behavior
*/

use ratatui::widgets::TableState;
use taskdeck_adapter::Task;
use taskdeck_console::Console;

use crate::tui::LogBufferHandle;
use crate::tui::ui::modal::CreateTaskModal;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum Tab {
    Dashboard,
    Logs,
}

pub(super) struct AppState {
    pub(super) console: Console,
    pub(super) log_buffer: LogBufferHandle,
    pub(super) table_state: TableState,
    pub(super) current_tab: Tab,
    pub(super) create_modal: Option<CreateTaskModal>,
}

impl AppState {
    pub(super) fn new(console: Console, log_buffer: LogBufferHandle) -> Self {
        Self {
            console,
            log_buffer,
            table_state: TableState::default(),
            current_tab: Tab::Dashboard,
            create_modal: None,
        }
    }

    pub(super) fn next_tab(&mut self) {
        self.current_tab = match self.current_tab {
            Tab::Dashboard => Tab::Logs,
            Tab::Logs => Tab::Dashboard,
        };
    }

    pub(super) fn set_tab(&mut self, tab: Tab) {
        self.current_tab = tab;
    }

    pub(super) fn selected_task(&self) -> Option<&Task> {
        let index = self.table_state.selected()?;
        self.console.tasks().get(index)
    }

    pub(super) fn move_selection(&mut self, delta: isize) {
        let len = self.console.tasks().len();
        if len == 0 {
            self.table_state.select(None);
            return;
        }
        let current = self.table_state.selected().unwrap_or(0) as isize;
        let next = (current + delta).clamp(0, len as isize - 1);
        self.table_state.select(Some(next as usize));
    }

    /// Reconcile UI-only state with the console after an event was applied.
    pub(super) fn sync_after_event(&mut self) {
        let len = self.console.tasks().len();
        match self.table_state.selected() {
            _ if len == 0 => self.table_state.select(None),
            None => self.table_state.select(Some(0)),
            Some(selected) if selected >= len => self.table_state.select(Some(len - 1)),
            Some(_) => {}
        }

        if self.create_modal.is_some() && !self.console.create().is_open() {
            self.create_modal = None;
        }
    }

    pub(super) fn open_selected_history(&mut self) {
        if let Some(task_id) = self.selected_task().map(|task| task.id) {
            self.console.open_history(task_id);
        }
    }

    pub(super) fn open_create_modal(&mut self) {
        self.console.open_create();
        self.create_modal = Some(CreateTaskModal::from_form(self.console.create().form()));
    }

    pub(super) fn close_create_modal(&mut self) {
        self.console.close_create();
        self.create_modal = None;
    }

    /// Copy the modal fields into the console form and submit them.
    pub(super) fn submit_create_modal(&mut self) {
        let Some(modal) = self.create_modal.as_ref() else {
            return;
        };
        modal.write_form(self.console.create_form_mut());
        self.console.submit_create();
    }
}
