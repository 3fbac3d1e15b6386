/*
[INPUT]:  Task specifications, list queries and task ids
[OUTPUT]: Typed task service replies (tasks, counts, history)
[POS]:    HTTP layer - TaskManagementService procedures
[UPDATE]: When adding new procedures or changing request shapes
*/

// ### Task Management Procedures

use crate::http::{Result, TaskServiceClient};
use crate::types::{
    CreateTaskRequest, CreateTaskResponse, GetStatusRequest, GetStatusResponse,
    GetTaskHistoryRequest, GetTaskHistoryResponse, GetTaskRequest, ListTasksRequest, Task,
    TaskList,
};

impl TaskServiceClient {
    /// Submit a new task
    ///
    /// POST /cloud.v1.TaskManagementService/CreateTask
    pub async fn create_task(&self, request: &CreateTaskRequest) -> Result<CreateTaskResponse> {
        self.send_rpc("CreateTask", request).await
    }

    /// Fetch one page of tasks
    ///
    /// POST /cloud.v1.TaskManagementService/ListTasks
    pub async fn list_tasks(&self, request: &ListTasksRequest) -> Result<TaskList> {
        self.send_rpc("ListTasks", request).await
    }

    /// Fetch global per-status counts
    ///
    /// POST /cloud.v1.TaskManagementService/GetStatus
    pub async fn get_status(&self) -> Result<GetStatusResponse> {
        self.send_rpc("GetStatus", &GetStatusRequest::default()).await
    }

    /// Fetch the status-change history of a task
    ///
    /// POST /cloud.v1.TaskManagementService/GetTaskHistory
    pub async fn get_task_history(&self, id: i64) -> Result<GetTaskHistoryResponse> {
        self.send_rpc("GetTaskHistory", &GetTaskHistoryRequest { id })
            .await
    }

    /// Fetch a single task
    ///
    /// POST /cloud.v1.TaskManagementService/GetTask
    pub async fn get_task(&self, id: i64) -> Result<Task> {
        self.send_rpc("GetTask", &GetTaskRequest { id }).await
    }
}
