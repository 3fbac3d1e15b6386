/*
[INPUT]:  TaskService handle, intervals, console event sender, CancellationToken
[OUTPUT]: Background tokio tasks feeding ConsoleEvents back to the engine
[POS]:    Execution layer - recurring pollers and one-off fetch tasks
[UPDATE]: When changing poll cadence semantics or shutdown guarantees
*/

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use taskdeck_adapter::TaskService;
use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use crate::console::ConsoleEvent;
use crate::counts::StatusCounts;
use crate::error::ConsoleError;
use crate::list_sync::FetchTicket;

/// Owns the background tasks of a mounted console.
///
/// Cancelling the token stops every task; dropping the guard also aborts them.
#[derive(Debug, Default)]
pub struct PollerGuard {
    shutdown: CancellationToken,
    handles: Vec<JoinHandle<()>>,
}

impl PollerGuard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn token(&self) -> CancellationToken {
        self.shutdown.clone()
    }

    pub fn track(&mut self, handle: JoinHandle<()>) {
        self.handles.retain(|existing| !existing.is_finished());
        self.handles.push(handle);
    }

    /// Spawn a one-off task that stops early on shutdown.
    pub fn spawn<F>(&mut self, future: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let shutdown = self.token();
        let handle = tokio::spawn(async move {
            tokio::select! {
                _ = shutdown.cancelled() => {}
                _ = future => {}
            }
        });
        self.track(handle);
    }

    pub fn is_cancelled(&self) -> bool {
        self.shutdown.is_cancelled()
    }

    pub fn shutdown(&mut self) {
        self.shutdown.cancel();
        for handle in self.handles.drain(..) {
            handle.abort();
        }
    }
}

impl Drop for PollerGuard {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// Poll global counts: once immediately, then every `period`.
///
/// Each fetch settles before the next tick, so replies arrive in issue order.
pub fn spawn_counts_poller(
    service: Arc<dyn TaskService>,
    period: Duration,
    events: UnboundedSender<ConsoleEvent>,
    shutdown: CancellationToken,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = shutdown.cancelled() => break,
                _ = ticker.tick() => {}
            }

            let result = tokio::select! {
                _ = shutdown.cancelled() => break,
                result = service.get_status() => result,
            };
            let result = result
                .map(|response| StatusCounts::from_codes(&response.status_counts))
                .map_err(ConsoleError::from);

            if events.send(ConsoleEvent::CountsFetched(result)).is_err() {
                break;
            }
        }
        tracing::debug!("counts poller stopped");
    })
}

/// Emit `ListTick` every `period`, starting one period from now.
pub fn spawn_list_ticker(
    period: Duration,
    events: UnboundedSender<ConsoleEvent>,
    shutdown: CancellationToken,
) -> JoinHandle<()> {
    let start = Instant::now() + period;
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval_at(start, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = shutdown.cancelled() => break,
                _ = ticker.tick() => {
                    if events.send(ConsoleEvent::ListTick).is_err() {
                        break;
                    }
                }
            }
        }
        tracing::debug!("list ticker stopped");
    })
}

/// Fetch one page and report it under its ticket.
pub async fn fetch_list(
    service: Arc<dyn TaskService>,
    ticket: FetchTicket,
    events: UnboundedSender<ConsoleEvent>,
) {
    let request = ticket.query().to_request();
    tracing::debug!(
        generation = ticket.generation(),
        limit = request.limit,
        offset = request.offset,
        status = request.status,
        "fetching task list"
    );
    let result = service
        .list_tasks(request)
        .await
        .map(|list| list.tasks)
        .map_err(ConsoleError::from);
    let _ = events.send(ConsoleEvent::ListFetched { ticket, result });
}
