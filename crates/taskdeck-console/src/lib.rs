/*
[INPUT]:  Public API exports for taskdeck-console crate
[OUTPUT]: Module declarations and public re-exports
[POS]:    Crate root - library entry point
[UPDATE]: When adding new modules or public exports
*/

pub mod config;
pub mod console;
pub mod counts;
pub mod create;
pub mod error;
pub mod history;
pub mod list_sync;
pub mod notify;
pub mod poller;
pub mod status;
pub mod view;

// Re-export main types for convenience
pub use config::{ConsoleConfig, SyncSettings};
pub use console::{Console, ConsoleEvent};
pub use error::ConsoleError;
pub use view::{StatusFilter, TypeFilter, ViewState};
