/*
[INPUT]:  Error sources (HTTP, RPC error replies, serialization, configuration)
[OUTPUT]: Structured error types with context and retry hints
[POS]:    Error handling layer - unified error types for entire crate
[UPDATE]: When adding new error sources or improving error messages
*/

use reqwest::StatusCode;
use thiserror::Error;

/// Main error type for the task service adapter
#[derive(Error, Debug)]
pub enum TaskdeckError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Service returned an error reply
    #[error("API error (status {status}, code {code}): {message}")]
    Api {
        status: u16,
        code: String,
        message: String,
    },

    /// Serialization/deserialization failed
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// URL parsing failed
    #[error("Invalid URL: {0}")]
    UrlParse(#[from] url::ParseError),

    /// Reply was well-formed JSON but structurally incomplete
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl TaskdeckError {
    /// Check if the error is transient from the caller's point of view
    pub fn is_retryable(&self) -> bool {
        match self {
            TaskdeckError::Http(err) => err.is_timeout() || err.is_connect(),
            TaskdeckError::Api { status, .. } => *status >= 500 || *status == 429,
            _ => false,
        }
    }

    /// Check if the service reported a missing resource
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            TaskdeckError::Api { status: 404, .. }
        ) || matches!(self, TaskdeckError::Api { code, .. } if code == "not_found")
    }

    /// Create an API error from status code, Connect code and message
    pub fn api_error(
        status: StatusCode,
        code: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        TaskdeckError::Api {
            status: status.as_u16(),
            code: code.into(),
            message: message.into(),
        }
    }
}

/// Result type alias for task service operations
pub type Result<T> = std::result::Result<T, TaskdeckError>;
