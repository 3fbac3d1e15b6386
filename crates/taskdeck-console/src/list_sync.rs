/*
[INPUT]:  List queries from ViewState and settled list fetch results
[OUTPUT]: Cached task page, in-flight flag, and apply/discard decisions
[POS]:    Task list synchronization - generation-token race guard
[UPDATE]: When changing how list results are accepted or discarded
*/

use taskdeck_adapter::Task;

use crate::error::ConsoleError;
use crate::view::ListQuery;

/// Monotonic token identifying one issued list fetch
pub type Generation = u64;

/// Handle for an issued fetch; carried back with its result
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    generation: Generation,
    query: ListQuery,
}

impl FetchTicket {
    pub fn generation(&self) -> Generation {
        self.generation
    }

    pub fn query(&self) -> &ListQuery {
        &self.query
    }
}

#[derive(Debug)]
pub enum ApplyOutcome {
    /// The page replaced the cache
    Applied { returned: usize },
    /// The current fetch failed; the cache was kept
    Failed(ConsoleError),
    /// A newer fetch has been issued since; nothing changed
    Stale,
}

#[derive(Debug, Default)]
pub struct ListSync {
    generation: Generation,
    tasks: Vec<Task>,
    loading: bool,
    applied: Option<ListQuery>,
}

impl ListSync {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue a new fetch, superseding any still in flight.
    pub fn begin(&mut self, query: ListQuery) -> FetchTicket {
        self.generation += 1;
        self.loading = true;
        FetchTicket {
            generation: self.generation,
            query,
        }
    }

    pub fn is_current(&self, ticket: &FetchTicket) -> bool {
        ticket.generation == self.generation
    }

    /// Only the result of the most recently issued fetch is ever applied.
    pub fn apply(
        &mut self,
        ticket: &FetchTicket,
        result: Result<Vec<Task>, ConsoleError>,
    ) -> ApplyOutcome {
        if !self.is_current(ticket) {
            tracing::debug!(
                generation = ticket.generation,
                current = self.generation,
                "discarding stale list result"
            );
            return ApplyOutcome::Stale;
        }

        self.loading = false;
        match result {
            Ok(tasks) => {
                let returned = tasks.len();
                self.tasks = tasks;
                self.applied = Some(ticket.query.clone());
                ApplyOutcome::Applied { returned }
            }
            Err(err) => ApplyOutcome::Failed(err),
        }
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn task(&self, id: i64) -> Option<&Task> {
        self.tasks.iter().find(|task| task.id == id)
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn generation(&self) -> Generation {
        self.generation
    }

    /// Query whose result is currently cached
    pub fn applied_query(&self) -> Option<&ListQuery> {
        self.applied.as_ref()
    }

    /// Drop the cache; issued tickets become stale.
    pub fn reset(&mut self) {
        self.generation += 1;
        self.tasks.clear();
        self.loading = false;
        self.applied = None;
    }
}
