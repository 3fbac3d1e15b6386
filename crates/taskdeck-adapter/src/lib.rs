/*
[INPUT]:  Crate modules and public type definitions
[OUTPUT]: Public task service adapter crate surface
[POS]:    Crate root - module wiring
[UPDATE]: When public modules or exports change
*/

pub mod http;
pub mod service;
pub mod types;

// Re-export commonly used types from http
pub use http::{ClientConfig, Result, TaskServiceClient, TaskdeckError};

pub use service::TaskService;

// Re-export all types
pub use types::*;
