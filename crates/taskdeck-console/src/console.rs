/*
[INPUT]:  Operator actions, ConsoleEvents from background tasks, TaskService handle
[OUTPUT]: Live projection of remote task state (page, counts, history, notifications)
[POS]:    Console engine - the only place fetch results are applied
[UPDATE]: When adding operator actions or background streams
*/

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use taskdeck_adapter::{CreateTaskResponse, HistoryEntry, Task, TaskService};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::time::Instant;

use crate::config::SyncSettings;
use crate::counts::{StatusCounts, StatusCountsCache};
use crate::create::{CreateForm, CreateWorkflow};
use crate::error::ConsoleError;
use crate::history::{HistoryLoader, HistoryOutcome, HistoryTicket};
use crate::list_sync::{ApplyOutcome, FetchTicket, ListSync};
use crate::notify::Notifications;
use crate::poller::{self, PollerGuard};
use crate::view::{StatusFilter, Transition, TypeFilter, ViewState};

/// Invoked with every task the console creates
pub type TaskCreatedCallback = Box<dyn FnMut(&Task) + Send>;

/// Results and ticks delivered by background tasks
#[derive(Debug)]
pub enum ConsoleEvent {
    /// Recurring list refresh is due
    ListTick,
    ListFetched {
        ticket: FetchTicket,
        result: Result<Vec<Task>, ConsoleError>,
    },
    CountsFetched(Result<StatusCounts, ConsoleError>),
    TaskCreated(Result<CreateTaskResponse, ConsoleError>),
    HistoryFetched {
        ticket: HistoryTicket,
        result: Result<Vec<HistoryEntry>, ConsoleError>,
    },
}

pub struct Console {
    service: Arc<dyn TaskService>,
    settings: SyncSettings,
    events: UnboundedSender<ConsoleEvent>,
    view: ViewState,
    list: ListSync,
    counts: StatusCountsCache,
    create: CreateWorkflow,
    history: HistoryLoader,
    notifications: Notifications,
    pollers: Option<PollerGuard>,
    on_task_created: Option<TaskCreatedCallback>,
}

impl fmt::Debug for Console {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Console")
            .field("settings", &self.settings)
            .field("view", &self.view)
            .field("generation", &self.list.generation())
            .field("mounted", &self.is_mounted())
            .finish_non_exhaustive()
    }
}

impl Console {
    /// Build an unmounted console and the receiver its background tasks report to.
    pub fn new(
        service: Arc<dyn TaskService>,
        settings: SyncSettings,
    ) -> (Self, UnboundedReceiver<ConsoleEvent>) {
        let (events, receiver) = mpsc::unbounded_channel();
        let console = Self {
            service,
            settings,
            events,
            view: ViewState::new(settings.page_size),
            list: ListSync::new(),
            counts: StatusCountsCache::new(),
            create: CreateWorkflow::new(),
            history: HistoryLoader::new(),
            notifications: Notifications::default(),
            pollers: None,
            on_task_created: None,
        };
        (console, receiver)
    }

    /// Start both pollers and issue the initial list fetch.
    pub fn mount(&mut self) {
        if self.is_mounted() {
            return;
        }
        tracing::info!(
            counts_interval_ms = self.settings.counts_interval.as_millis() as u64,
            list_interval_ms = self.settings.list_interval.as_millis() as u64,
            "mounting console"
        );

        let mut guard = PollerGuard::new();
        guard.track(poller::spawn_counts_poller(
            self.service.clone(),
            self.settings.counts_interval,
            self.events.clone(),
            guard.token(),
        ));
        guard.track(poller::spawn_list_ticker(
            self.settings.list_interval,
            self.events.clone(),
            guard.token(),
        ));
        self.pollers = Some(guard);

        self.fetch_list();
    }

    /// Stop every background task and discard the caches.
    pub fn unmount(&mut self) {
        let Some(mut guard) = self.pollers.take() else {
            return;
        };
        guard.shutdown();
        self.create.abandon();
        self.list.reset();
        self.counts.reset();
        self.history.close();
        tracing::info!("console unmounted");
    }

    pub fn is_mounted(&self) -> bool {
        self.pollers.is_some()
    }

    pub fn set_on_task_created(&mut self, callback: TaskCreatedCallback) {
        self.on_task_created = Some(callback);
    }

    // ### View state

    pub fn view(&self) -> &ViewState {
        &self.view
    }

    pub fn set_status_filter(&mut self, status: StatusFilter) {
        let transition = self.view.set_status_filter(status);
        self.after_transition(transition);
    }

    pub fn set_type_filter(&mut self, task_type: TypeFilter) {
        let transition = self.view.set_type_filter(task_type);
        self.after_transition(transition);
    }

    pub fn set_page_size(&mut self, page_size: u32) {
        let transition = self.view.set_page_size(page_size);
        self.after_transition(transition);
    }

    pub fn cycle_status_filter(&mut self) {
        let transition = self.view.cycle_status_filter();
        self.after_transition(transition);
    }

    pub fn cycle_type_filter(&mut self) {
        let transition = self.view.cycle_type_filter();
        self.after_transition(transition);
    }

    pub fn cycle_page_size(&mut self) {
        let transition = self.view.cycle_page_size();
        self.after_transition(transition);
    }

    pub fn next_page(&mut self) {
        let transition = self.view.next_page();
        self.after_transition(transition);
    }

    pub fn previous_page(&mut self) {
        let transition = self.view.previous_page();
        self.after_transition(transition);
    }

    /// Re-fetch the current page under the current filter.
    pub fn refresh(&mut self) {
        self.fetch_list();
    }

    fn after_transition(&mut self, transition: Transition) {
        if transition.requires_fetch() {
            self.fetch_list();
        }
    }

    fn fetch_list(&mut self) {
        if !self.is_mounted() {
            return;
        }
        let ticket = self.list.begin(self.view.query());
        let service = self.service.clone();
        let events = self.events.clone();
        self.spawn_work(poller::fetch_list(service, ticket, events));
    }

    // ### Cached state

    pub fn tasks(&self) -> &[Task] {
        self.list.tasks()
    }

    pub fn list(&self) -> &ListSync {
        &self.list
    }

    pub fn counts(&self) -> &StatusCountsCache {
        &self.counts
    }

    pub fn notifications(&self) -> &Notifications {
        &self.notifications
    }

    pub fn prune_notifications(&mut self, now: Instant) {
        self.notifications.prune(now);
    }

    // ### Create workflow

    pub fn create(&self) -> &CreateWorkflow {
        &self.create
    }

    pub fn create_form_mut(&mut self) -> &mut CreateForm {
        self.create.form_mut()
    }

    pub fn open_create(&mut self) {
        self.create.open();
    }

    pub fn close_create(&mut self) {
        self.create.close();
    }

    /// Validate locally and, if valid, send the create request.
    pub fn submit_create(&mut self) {
        if !self.is_mounted() {
            tracing::debug!("console not mounted; ignoring submit");
            return;
        }
        let request = match self.create.begin_submit() {
            Ok(Some(request)) => request,
            Ok(None) => {
                tracing::debug!("create already in flight; ignoring submit");
                return;
            }
            Err(err) => {
                self.notifications.error(err.to_string());
                return;
            }
        };

        tracing::info!(name = %request.name, task_type = %request.task_type, "submitting task");
        let service = self.service.clone();
        let events = self.events.clone();
        self.spawn_work(async move {
            let result = service
                .create_task(request)
                .await
                .map_err(ConsoleError::from);
            let _ = events.send(ConsoleEvent::TaskCreated(result));
        });
    }

    // ### History

    pub fn history(&self) -> &HistoryLoader {
        &self.history
    }

    /// Open the history view and fetch it; every open fetches afresh.
    pub fn open_history(&mut self, task_id: i64) {
        if !self.is_mounted() {
            tracing::debug!(task_id, "console not mounted; ignoring history open");
            return;
        }
        let task = self.list.task(task_id).cloned();
        let ticket = self.history.open(task_id, task);
        let service = self.service.clone();
        let events = self.events.clone();
        self.spawn_work(async move {
            let result = service
                .get_task_history(task_id)
                .await
                .map(|response| response.history)
                .map_err(ConsoleError::from);
            let _ = events.send(ConsoleEvent::HistoryFetched { ticket, result });
        });
    }

    pub fn close_history(&mut self) {
        self.history.close();
    }

    // ### Event application

    pub fn handle_event(&mut self, event: ConsoleEvent) {
        match event {
            ConsoleEvent::ListTick => self.fetch_list(),
            ConsoleEvent::ListFetched { ticket, result } => {
                match self.list.apply(&ticket, result) {
                    ApplyOutcome::Applied { returned } => {
                        self.view.record_fetch(ticket.query(), returned);
                    }
                    ApplyOutcome::Failed(err) => {
                        self.notifications
                            .error(format!("failed to load tasks: {err}"));
                    }
                    ApplyOutcome::Stale => {}
                }
            }
            ConsoleEvent::CountsFetched(result) => {
                if !self.is_mounted() {
                    return;
                }
                if let Err(err) = self.counts.apply(result) {
                    self.notifications
                        .error(format!("failed to load status counts: {err}"));
                }
            }
            ConsoleEvent::TaskCreated(result) => {
                if !self.create.is_submitting() {
                    tracing::debug!("dropping create reply with nothing in flight");
                    return;
                }
                match self.create.complete(result) {
                    Ok(task) => {
                        tracing::debug!(task_id = task.id, "task created");
                        if let Some(callback) = self.on_task_created.as_mut() {
                            callback(&task);
                        }
                        self.notifications
                            .success(format!("task {} created", task.id));
                        self.fetch_list();
                    }
                    Err(err) => {
                        self.notifications
                            .error(format!("failed to create task: {err}"));
                    }
                }
                self.create.settle();
            }
            ConsoleEvent::HistoryFetched { ticket, result } => {
                if let HistoryOutcome::Failed(err) = self.history.apply(ticket, result) {
                    self.notifications.error(format!(
                        "failed to load history for task {}: {err}",
                        ticket.task_id()
                    ));
                }
            }
        }
    }

    fn spawn_work<F>(&mut self, future: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        match self.pollers.as_mut() {
            Some(guard) => guard.spawn(future),
            None => tracing::debug!("console not mounted; dropping background work"),
        }
    }
}

impl Drop for Console {
    fn drop(&mut self) {
        self.unmount();
    }
}
