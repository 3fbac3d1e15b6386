/*
[INPUT]:  Test configuration and mock server requirements
[OUTPUT]: Shared test utilities, fixtures, and mock helpers
[POS]:    Test infrastructure - shared across all test modules
[UPDATE]: When adding new test patterns or fixtures
*/

//! Common test utilities for taskdeck-adapter tests

use serde_json::{Value, json};
use taskdeck_adapter::{ClientConfig, TaskServiceClient};
use wiremock::MockServer;

/// Setup a mock HTTP server for testing
pub async fn setup_mock_server() -> MockServer {
    MockServer::start().await
}

/// Client pointed at a mock server
pub fn client_for(server: &MockServer) -> TaskServiceClient {
    TaskServiceClient::with_config_and_base_url(ClientConfig::default(), &server.uri())
        .expect("client should build")
}

/// Procedure path for a TaskManagementService method
pub fn procedure(method: &str) -> String {
    format!("/cloud.v1.TaskManagementService/{method}")
}

/// Task JSON as the service emits it, with zero values omitted
pub fn task_json(id: i64, name: &str, status: i32) -> Value {
    let mut task = json!({
        "id": id.to_string(),
        "name": name,
        "type": "run_query",
        "description": format!("{name} description"),
        "payload": { "parameters": { "query": "SELECT 1" } }
    });
    if status != 0 {
        task["status"] = json!(status);
    }
    task
}
