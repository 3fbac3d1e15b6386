/*
[INPUT]:  Crossterm key events
[OUTPUT]: Console operations and UI state changes
[POS]:    TUI key routing
[UPDATE]: When adding or remapping hotkeys
*/

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use super::app::{AppState, Tab};
use super::ui::modal::ModalAction;

/// Handles key events for the TUI.
///
/// Returns `true` if quit is requested, `false` otherwise.
pub(super) fn handle_key_event(app: &mut AppState, key: KeyEvent) -> bool {
    // Raw mode swallows SIGINT, so Ctrl+C arrives as a key.
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return true;
    }

    if app.create_modal.is_some() {
        handle_modal_key_event(app, key);
        return false;
    }

    if app.console.history().is_open() {
        match key.code {
            KeyCode::Char('q') => return true,
            KeyCode::Esc | KeyCode::Enter | KeyCode::Backspace => app.console.close_history(),
            _ => {}
        }
        return false;
    }

    match key.code {
        KeyCode::Char('q') => return true,
        KeyCode::Char('r') => app.console.refresh(),
        KeyCode::Char('s') => app.console.cycle_status_filter(),
        KeyCode::Char('t') => app.console.cycle_type_filter(),
        KeyCode::Char('z') => app.console.cycle_page_size(),
        KeyCode::Char('n') | KeyCode::Right => app.console.next_page(),
        KeyCode::Char('p') | KeyCode::Left => app.console.previous_page(),
        KeyCode::Char('c') => app.open_create_modal(),
        KeyCode::Enter => app.open_selected_history(),
        KeyCode::Up => app.move_selection(-1),
        KeyCode::Down => app.move_selection(1),
        KeyCode::Tab => app.next_tab(),
        KeyCode::Char('1') => app.set_tab(Tab::Dashboard),
        KeyCode::Char('2') => app.set_tab(Tab::Logs),
        _ => {}
    }
    false
}

fn handle_modal_key_event(app: &mut AppState, key: KeyEvent) {
    let Some(modal) = app.create_modal.as_mut() else {
        return;
    };
    match modal.handle_key(key) {
        ModalAction::Cancel => app.close_create_modal(),
        ModalAction::Submit => app.submit_create_modal(),
        ModalAction::None => {}
    }
}
