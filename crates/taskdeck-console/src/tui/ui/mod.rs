/*
[INPUT]:  Console state and TUI app state
[OUTPUT]: UI component render functions and module exports
[POS]:    TUI UI module root
[UPDATE]: When adding panels or overlays
*/

mod counts;
mod history;
mod layout;
mod logs;
mod task_table;

pub mod modal;

pub(in crate::tui) use counts::draw_status_counts;
pub(in crate::tui) use history::draw_history;
pub(in crate::tui) use layout::draw_tabs;
pub(in crate::tui) use logs::draw_logs;
pub(in crate::tui) use task_table::draw_task_table;
