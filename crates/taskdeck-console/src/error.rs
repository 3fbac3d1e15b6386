/*
[INPUT]:  Adapter errors, malformed replies and rejected user input
[OUTPUT]: ConsoleError with the three failure kinds surfaced to the operator
[POS]:    Error handling layer for the console engine
[UPDATE]: When a flow gains a new failure mode
*/

use taskdeck_adapter::TaskdeckError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConsoleError {
    /// The remote call itself failed
    #[error("request failed: {0}")]
    Transport(#[source] TaskdeckError),

    /// The call succeeded but the reply is structurally incomplete
    #[error("malformed response: {0}")]
    MalformedResponse(String),

    /// Input rejected before any request was made
    #[error("invalid input: {0}")]
    Validation(String),
}

impl ConsoleError {
    pub fn is_validation(&self) -> bool {
        matches!(self, ConsoleError::Validation(_))
    }
}

impl From<TaskdeckError> for ConsoleError {
    fn from(err: TaskdeckError) -> Self {
        match err {
            TaskdeckError::Serialization(inner) => ConsoleError::MalformedResponse(inner.to_string()),
            TaskdeckError::InvalidResponse(message) => ConsoleError::MalformedResponse(message),
            other => ConsoleError::Transport(other),
        }
    }
}

pub type Result<T> = std::result::Result<T, ConsoleError>;
