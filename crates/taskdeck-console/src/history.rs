/*
[INPUT]:  Task selection events and GetTaskHistory replies
[OUTPUT]: Per-open history view with loading/loaded/failed phases
[POS]:    Task detail loader - one fetch per open, no caching across opens
[UPDATE]: When history entries gain fields
*/

use chrono::{DateTime, Utc};
use serde::Serialize;
use taskdeck_adapter::{HistoryEntry, Task};

use crate::error::ConsoleError;
use crate::status::status_name;

/// History entry in display form
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaskHistoryEntry {
    pub id: i64,
    pub details: String,
    pub status: String,
    pub created_at: Option<DateTime<Utc>>,
}

impl From<HistoryEntry> for TaskHistoryEntry {
    fn from(entry: HistoryEntry) -> Self {
        Self {
            id: entry.id,
            details: entry.details,
            status: status_name(entry.status).to_string(),
            created_at: entry.created_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum HistoryPhase {
    Loading,
    Loaded(Vec<TaskHistoryEntry>),
    Failed(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct HistoryView {
    pub task_id: i64,
    /// Row the view was opened from, when it is on the current page
    pub task: Option<Task>,
    pub phase: HistoryPhase,
}

/// Identifies one open of the history view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HistoryTicket {
    seq: u64,
    task_id: i64,
}

impl HistoryTicket {
    pub fn task_id(&self) -> i64 {
        self.task_id
    }
}

#[derive(Debug)]
pub enum HistoryOutcome {
    Loaded(usize),
    Failed(ConsoleError),
    Stale,
}

#[derive(Debug, Default)]
pub struct HistoryLoader {
    view: Option<HistoryView>,
    seq: u64,
}

impl HistoryLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open (or re-open) the view; each open needs its own fetch.
    pub fn open(&mut self, task_id: i64, task: Option<Task>) -> HistoryTicket {
        self.seq += 1;
        self.view = Some(HistoryView {
            task_id,
            task,
            phase: HistoryPhase::Loading,
        });
        HistoryTicket {
            seq: self.seq,
            task_id,
        }
    }

    pub fn close(&mut self) {
        self.seq += 1;
        self.view = None;
    }

    pub fn view(&self) -> Option<&HistoryView> {
        self.view.as_ref()
    }

    pub fn is_open(&self) -> bool {
        self.view.is_some()
    }

    /// Results for a closed or superseded open are discarded.
    pub fn apply(
        &mut self,
        ticket: HistoryTicket,
        result: Result<Vec<HistoryEntry>, ConsoleError>,
    ) -> HistoryOutcome {
        if ticket.seq != self.seq {
            return HistoryOutcome::Stale;
        }
        let Some(view) = self.view.as_mut() else {
            return HistoryOutcome::Stale;
        };

        match result {
            Ok(entries) => {
                let entries: Vec<TaskHistoryEntry> =
                    entries.into_iter().map(TaskHistoryEntry::from).collect();
                let count = entries.len();
                view.phase = HistoryPhase::Loaded(entries);
                HistoryOutcome::Loaded(count)
            }
            Err(err) => {
                view.phase = HistoryPhase::Failed(err.to_string());
                HistoryOutcome::Failed(err)
            }
        }
    }
}
