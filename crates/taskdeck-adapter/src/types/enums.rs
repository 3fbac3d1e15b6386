/*
[INPUT]:  Service status vocabulary and task type names
[OUTPUT]: Typed Rust enums with serialization support
[POS]:    Data layer - type definitions for API communication
[UPDATE]: When API schema changes or new types added
*/

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Wire value meaning "no status constraint" in list requests.
///
/// The service treats an absent status as `QUEUED`, so the list request
/// always carries a status and uses this value for "all".
pub const ALL_STATUS_CODE: i32 = 5;

pub const TASK_TYPE_RUN_QUERY: &str = "run_query";
pub const TASK_TYPE_SEND_EMAIL: &str = "send_email";

/// Task types the service ships handlers for
pub const KNOWN_TASK_TYPES: [&str; 2] = [TASK_TYPE_RUN_QUERY, TASK_TYPE_SEND_EMAIL];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TaskStatus {
    Queued,
    Running,
    Failed,
    Succeeded,
    Unknown,
}

impl TaskStatus {
    /// Every status in taxonomy order
    pub const ALL: [TaskStatus; 5] = [
        TaskStatus::Queued,
        TaskStatus::Running,
        TaskStatus::Failed,
        TaskStatus::Succeeded,
        TaskStatus::Unknown,
    ];

    /// Map a wire status code; anything outside the known codes is `Unknown`
    pub fn from_code(code: i32) -> Self {
        match code {
            0 => TaskStatus::Queued,
            1 => TaskStatus::Running,
            2 => TaskStatus::Failed,
            3 => TaskStatus::Succeeded,
            _ => TaskStatus::Unknown,
        }
    }

    pub fn code(self) -> i32 {
        match self {
            TaskStatus::Queued => 0,
            TaskStatus::Running => 1,
            TaskStatus::Failed => 2,
            TaskStatus::Succeeded => 3,
            TaskStatus::Unknown => 4,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TaskStatus::Queued => "QUEUED",
            TaskStatus::Running => "RUNNING",
            TaskStatus::Failed => "FAILED",
            TaskStatus::Succeeded => "SUCCEEDED",
            TaskStatus::Unknown => "UNKNOWN",
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown task status: {0}")]
pub struct ParseStatusError(pub String);

impl FromStr for TaskStatus {
    type Err = ParseStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "QUEUED" => Ok(TaskStatus::Queued),
            "RUNNING" => Ok(TaskStatus::Running),
            "FAILED" => Ok(TaskStatus::Failed),
            "SUCCEEDED" => Ok(TaskStatus::Succeeded),
            "UNKNOWN" => Ok(TaskStatus::Unknown),
            _ => Err(ParseStatusError(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(0, TaskStatus::Queued)]
    #[case(1, TaskStatus::Running)]
    #[case(2, TaskStatus::Failed)]
    #[case(3, TaskStatus::Succeeded)]
    #[case(4, TaskStatus::Unknown)]
    #[case(5, TaskStatus::Unknown)]
    #[case(-1, TaskStatus::Unknown)]
    fn test_from_code(#[case] code: i32, #[case] expected: TaskStatus) {
        assert_eq!(TaskStatus::from_code(code), expected);
    }

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!("running".parse::<TaskStatus>(), Ok(TaskStatus::Running));
        assert_eq!(" Failed ".parse::<TaskStatus>(), Ok(TaskStatus::Failed));
        assert!("ALL".parse::<TaskStatus>().is_err());
    }

    #[test]
    fn test_serde_uses_upper_case_names() {
        let json = serde_json::to_string(&TaskStatus::Succeeded).expect("serialize");
        assert_eq!(json, "\"SUCCEEDED\"");
    }
}
