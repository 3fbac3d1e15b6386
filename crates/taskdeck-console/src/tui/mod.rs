/*
[INPUT]:  A Console, its event receiver, and the shared log buffer
[OUTPUT]: Ratatui-based terminal console for tasks, counts, history, and logs
[POS]:    TUI module for the taskdeck binary
[UPDATE]: When changing TUI layout, keybindings, or runtime controls
*/

mod app;
mod events;
mod runtime;
mod terminal;
mod ui;

pub use runtime::{LOG_BUFFER_CAPACITY, LogBuffer, LogBufferHandle, LogWriterFactory, run_tui};
