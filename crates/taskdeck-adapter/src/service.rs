/*
[INPUT]:  Task service operations needed by consumers
[OUTPUT]: Object-safe async trait implemented by the HTTP client
[POS]:    Seam between the wire client and the console engine
[UPDATE]: When a procedure is added to TaskServiceClient
*/

use async_trait::async_trait;

use crate::http::{Result, TaskServiceClient};
use crate::types::{
    CreateTaskRequest, CreateTaskResponse, GetStatusResponse, GetTaskHistoryResponse,
    ListTasksRequest, Task, TaskList,
};

/// Remote task service operations
#[async_trait]
pub trait TaskService: Send + Sync {
    async fn create_task(&self, request: CreateTaskRequest) -> Result<CreateTaskResponse>;

    async fn list_tasks(&self, request: ListTasksRequest) -> Result<TaskList>;

    async fn get_status(&self) -> Result<GetStatusResponse>;

    async fn get_task_history(&self, id: i64) -> Result<GetTaskHistoryResponse>;

    async fn get_task(&self, id: i64) -> Result<Task>;
}

#[async_trait]
impl TaskService for TaskServiceClient {
    async fn create_task(&self, request: CreateTaskRequest) -> Result<CreateTaskResponse> {
        TaskServiceClient::create_task(self, &request).await
    }

    async fn list_tasks(&self, request: ListTasksRequest) -> Result<TaskList> {
        TaskServiceClient::list_tasks(self, &request).await
    }

    async fn get_status(&self) -> Result<GetStatusResponse> {
        TaskServiceClient::get_status(self).await
    }

    async fn get_task_history(&self, id: i64) -> Result<GetTaskHistoryResponse> {
        TaskServiceClient::get_task_history(self, id).await
    }

    async fn get_task(&self, id: i64) -> Result<Task> {
        TaskServiceClient::get_task(self, id).await
    }
}
