/*
[INPUT]:  Test scenarios needing a controllable task service
[OUTPUT]: FakeService with hand-resolved list calls and scripted replies
[POS]:    Test infrastructure - shared across console integration tests
[UPDATE]: When TaskService gains a procedure
*/

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use taskdeck_adapter::{
    CreateTaskRequest, CreateTaskResponse, GetStatusResponse, GetTaskHistoryResponse,
    ListTasksRequest, Payload, Result as AdapterResult, Task, TaskList, TaskService, TaskStatus,
    TaskdeckError,
};
use taskdeck_console::{Console, ConsoleEvent, SyncSettings};
use tokio::sync::{Notify, mpsc::UnboundedReceiver, oneshot};

/// One `ListTasks` call waiting for the test to resolve it
struct PendingList {
    request: ListTasksRequest,
    reply: Option<oneshot::Sender<AdapterResult<TaskList>>>,
}

#[derive(Default)]
struct FakeState {
    lists: Vec<PendingList>,
    status_replies: VecDeque<AdapterResult<GetStatusResponse>>,
    status_calls: usize,
    create_replies: VecDeque<AdapterResult<CreateTaskResponse>>,
    create_requests: Vec<CreateTaskRequest>,
    history_replies: VecDeque<AdapterResult<GetTaskHistoryResponse>>,
    history_requests: Vec<i64>,
}

/// In-memory task service.
///
/// List calls stay pending until resolved, so tests decide the settle order.
/// Other procedures pop scripted replies and fall back to empty successes.
#[derive(Default)]
pub struct FakeService {
    state: Mutex<FakeState>,
    list_called: Notify,
}

impl FakeService {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn list_requests(&self) -> Vec<ListTasksRequest> {
        let state = self.state.lock().expect("fake state");
        state.lists.iter().map(|call| call.request.clone()).collect()
    }

    pub async fn wait_for_list_calls(&self, count: usize) {
        loop {
            if self.state.lock().expect("fake state").lists.len() >= count {
                return;
            }
            self.list_called.notified().await;
        }
    }

    /// Resolve the first unresolved list call matching `predicate`.
    pub fn resolve_list<P>(&self, predicate: P, result: AdapterResult<Vec<Task>>)
    where
        P: Fn(&ListTasksRequest) -> bool,
    {
        let mut state = self.state.lock().expect("fake state");
        let call = state
            .lists
            .iter_mut()
            .find(|call| call.reply.is_some() && predicate(&call.request))
            .expect("no pending list call matches");
        let reply = call.reply.take().expect("pending reply");
        let _ = reply.send(result.map(|tasks| TaskList { tasks }));
    }

    pub fn push_status(&self, reply: AdapterResult<GetStatusResponse>) {
        self.state.lock().expect("fake state").status_replies.push_back(reply);
    }

    pub fn status_calls(&self) -> usize {
        self.state.lock().expect("fake state").status_calls
    }

    pub fn push_create(&self, reply: AdapterResult<CreateTaskResponse>) {
        self.state.lock().expect("fake state").create_replies.push_back(reply);
    }

    pub fn create_requests(&self) -> Vec<CreateTaskRequest> {
        self.state.lock().expect("fake state").create_requests.clone()
    }

    pub fn push_history(&self, reply: AdapterResult<GetTaskHistoryResponse>) {
        self.state.lock().expect("fake state").history_replies.push_back(reply);
    }

    pub fn history_requests(&self) -> Vec<i64> {
        self.state.lock().expect("fake state").history_requests.clone()
    }
}

#[async_trait]
impl TaskService for FakeService {
    async fn create_task(&self, request: CreateTaskRequest) -> AdapterResult<CreateTaskResponse> {
        let mut state = self.state.lock().expect("fake state");
        state.create_requests.push(request);
        state
            .create_replies
            .pop_front()
            .unwrap_or_else(|| Ok(CreateTaskResponse::default()))
    }

    async fn list_tasks(&self, request: ListTasksRequest) -> AdapterResult<TaskList> {
        let (tx, rx) = oneshot::channel();
        {
            let mut state = self.state.lock().expect("fake state");
            state.lists.push(PendingList {
                request,
                reply: Some(tx),
            });
        }
        self.list_called.notify_one();
        rx.await
            .unwrap_or_else(|_| Err(TaskdeckError::InvalidResponse("list call dropped".into())))
    }

    async fn get_status(&self) -> AdapterResult<GetStatusResponse> {
        let mut state = self.state.lock().expect("fake state");
        state.status_calls += 1;
        state
            .status_replies
            .pop_front()
            .unwrap_or_else(|| Ok(GetStatusResponse::default()))
    }

    async fn get_task_history(&self, id: i64) -> AdapterResult<GetTaskHistoryResponse> {
        let mut state = self.state.lock().expect("fake state");
        state.history_requests.push(id);
        state
            .history_replies
            .pop_front()
            .unwrap_or_else(|| Ok(GetTaskHistoryResponse::default()))
    }

    async fn get_task(&self, id: i64) -> AdapterResult<Task> {
        Err(unavailable(&format!("task {id} not scripted")))
    }
}

pub fn unavailable(message: &str) -> TaskdeckError {
    TaskdeckError::Api {
        status: 503,
        code: "unavailable".to_string(),
        message: message.to_string(),
    }
}

pub fn task(id: i64, status: TaskStatus) -> Task {
    Task {
        id,
        name: format!("task-{id}"),
        task_type: "run_query".to_string(),
        description: String::new(),
        payload: Payload::default(),
        status: status.code(),
        retries: 0,
    }
}

pub fn tasks(ids: std::ops::RangeInclusive<i64>, status: TaskStatus) -> Vec<Task> {
    ids.map(|id| task(id, status)).collect()
}

/// Intervals long enough that no timer fires during a real-time test
pub fn quiet_settings() -> SyncSettings {
    SyncSettings {
        counts_interval: Duration::from_secs(3600),
        list_interval: Duration::from_secs(3600),
        ..SyncSettings::default()
    }
}

pub fn mounted_console(service: Arc<FakeService>) -> (Console, UnboundedReceiver<ConsoleEvent>) {
    let (mut console, events) = Console::new(service, quiet_settings());
    console.mount();
    (console, events)
}

/// Apply events until one matching `predicate` has been applied.
pub async fn pump_until<P>(
    console: &mut Console,
    events: &mut UnboundedReceiver<ConsoleEvent>,
    predicate: P,
) where
    P: Fn(&ConsoleEvent) -> bool,
{
    loop {
        let event = events.recv().await.expect("event channel open");
        let matched = predicate(&event);
        console.handle_event(event);
        if matched {
            return;
        }
    }
}

pub fn is_list_fetched(event: &ConsoleEvent) -> bool {
    matches!(event, ConsoleEvent::ListFetched { .. })
}

pub fn is_counts_fetched(event: &ConsoleEvent) -> bool {
    matches!(event, ConsoleEvent::CountsFetched(_))
}
