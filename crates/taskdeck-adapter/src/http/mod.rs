/*
[INPUT]:  HTTP client configuration and RPC procedures
[OUTPUT]: HTTP responses and typed API results
[POS]:    HTTP layer - Connect JSON RPC communication
[UPDATE]: When adding new procedures or changing client behavior
*/

pub mod client;
pub mod error;
pub mod tasks;

pub use error::{Result, TaskdeckError};

pub use client::{ClientConfig, TaskServiceClient};
