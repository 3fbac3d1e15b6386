/*
[INPUT]:  JSON reply bodies from the task service
[OUTPUT]: Typed response wrappers tolerant of omitted zero values
[POS]:    Data layer - response types for RPC calls
[UPDATE]: When procedure outputs change
*/

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::models::{HistoryEntry, Task, serde_helpers};

/// Reply of `CreateTask`; the service only echoes the assigned id
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateTaskResponse {
    #[serde(default, deserialize_with = "serde_helpers::deserialize_opt_i64")]
    pub id: Option<i64>,
}

/// Reply of `ListTasks`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TaskList {
    #[serde(default)]
    pub tasks: Vec<Task>,
}

/// Reply of `GetStatus`, keyed by raw status code
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetStatusResponse {
    #[serde(default, deserialize_with = "serde_helpers::deserialize_status_counts")]
    pub status_counts: HashMap<i32, u64>,
}

/// Reply of `GetTaskHistory`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GetTaskHistoryResponse {
    #[serde(default)]
    pub history: Vec<HistoryEntry>,
}

/// Connect error envelope returned with non-2xx statuses
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectErrorBody {
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_create_response_missing_id() {
        let response: CreateTaskResponse = serde_json::from_value(json!({})).expect("parse");
        assert_eq!(response.id, None);

        let response: CreateTaskResponse =
            serde_json::from_value(json!({ "id": "42" })).expect("parse");
        assert_eq!(response.id, Some(42));
    }

    #[test]
    fn test_status_counts_accept_string_values_and_names() {
        let response: GetStatusResponse = serde_json::from_value(json!({
            "statusCounts": { "0": "4", "1": 2, "FAILED": 1 }
        }))
        .expect("parse");

        assert_eq!(response.status_counts.get(&0), Some(&4));
        assert_eq!(response.status_counts.get(&1), Some(&2));
        assert_eq!(response.status_counts.get(&2), Some(&1));
    }

    #[test]
    fn test_empty_list_reply() {
        let list: TaskList = serde_json::from_value(json!({})).expect("parse");
        assert!(list.tasks.is_empty());
    }
}
