/*
[INPUT]:  Caller parameters for each task service procedure
[OUTPUT]: Serializable request bodies in the service's camelCase shape
[POS]:    Data layer - request types for RPC calls
[UPDATE]: When procedure inputs change
*/

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::enums::{ALL_STATUS_CODE, TaskStatus};
use super::models::Payload;

/// Body of `CreateTask`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTaskRequest {
    pub name: String,
    #[serde(rename = "type")]
    pub task_type: String,
    pub description: String,
    pub payload: Payload,
}

impl CreateTaskRequest {
    pub fn new(
        name: impl Into<String>,
        task_type: impl Into<String>,
        description: impl Into<String>,
        parameters: Value,
    ) -> Self {
        Self {
            name: name.into(),
            task_type: task_type.into(),
            description: description.into(),
            payload: Payload { parameters },
        }
    }
}

/// Body of `ListTasks`
///
/// `status` is always present on the wire; `ALL_STATUS_CODE` lifts the
/// constraint. `type` is omitted when unfiltered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListTasksRequest {
    pub limit: u32,
    pub offset: u64,
    pub status: i32,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub task_type: Option<String>,
}

impl ListTasksRequest {
    pub fn new(
        limit: u32,
        offset: u64,
        status: Option<TaskStatus>,
        task_type: Option<&str>,
    ) -> Self {
        Self {
            limit,
            offset,
            status: status.map(TaskStatus::code).unwrap_or(ALL_STATUS_CODE),
            task_type: task_type.map(str::to_string),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GetTaskRequest {
    pub id: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GetTaskHistoryRequest {
    pub id: i64,
}

/// `GetStatus` takes an empty message
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GetStatusRequest {}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_list_request_sends_all_when_unfiltered() {
        let request = ListTasksRequest::new(10, 20, None, None);
        let body = serde_json::to_value(&request).expect("serialize");
        assert_eq!(body, json!({ "limit": 10, "offset": 20, "status": 5 }));
    }

    #[test]
    fn test_list_request_with_filters() {
        let request = ListTasksRequest::new(50, 0, Some(TaskStatus::Failed), Some("send_email"));
        let body = serde_json::to_value(&request).expect("serialize");
        assert_eq!(
            body,
            json!({ "limit": 50, "offset": 0, "status": 2, "type": "send_email" })
        );
    }

    #[test]
    fn test_create_request_shape() {
        let request = CreateTaskRequest::new("report", "run_query", "", json!({ "q": 1 }));
        let body = serde_json::to_value(&request).expect("serialize");
        assert_eq!(
            body,
            json!({
                "name": "report",
                "type": "run_query",
                "description": "",
                "payload": { "parameters": { "q": 1 } }
            })
        );
    }
}
