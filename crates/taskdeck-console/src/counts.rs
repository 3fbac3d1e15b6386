/*
[INPUT]:  GetStatus replies keyed by raw status code
[OUTPUT]: Five-slot StatusCounts and a cache that survives failed polls
[POS]:    Aggregate counts - global per-status totals independent of filters
[UPDATE]: When the status taxonomy changes
*/

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::Serialize;
use taskdeck_adapter::TaskStatus;

use crate::error::ConsoleError;

/// Per-status totals covering the whole taxonomy; missing codes are zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatusCounts {
    slots: [u64; 5],
}

impl StatusCounts {
    /// Codes outside the known range are summed into `UNKNOWN`.
    pub fn from_codes(codes: &HashMap<i32, u64>) -> Self {
        let mut counts = Self::default();
        for (code, count) in codes {
            let slot = slot_index(TaskStatus::from_code(*code));
            counts.slots[slot] = counts.slots[slot].saturating_add(*count);
        }
        counts
    }

    pub fn get(&self, status: TaskStatus) -> u64 {
        self.slots[slot_index(status)]
    }

    pub fn iter(&self) -> impl Iterator<Item = (TaskStatus, u64)> + '_ {
        TaskStatus::ALL.iter().map(|status| (*status, self.get(*status)))
    }

    pub fn total(&self) -> u64 {
        self.slots.iter().sum()
    }
}

impl Serialize for StatusCounts {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeMap;

        let mut map = serializer.serialize_map(Some(TaskStatus::ALL.len()))?;
        for (status, count) in self.iter() {
            map.serialize_entry(status.as_str(), &count)?;
        }
        map.end()
    }
}

fn slot_index(status: TaskStatus) -> usize {
    status.code() as usize
}

/// Last good counts plus the outcome of the most recent poll
#[derive(Debug, Clone, Default)]
pub struct StatusCountsCache {
    counts: StatusCounts,
    updated_at: Option<DateTime<Utc>>,
    last_error: Option<String>,
}

impl StatusCountsCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the counts on success; on failure keep them and return the error.
    pub fn apply(&mut self, result: Result<StatusCounts, ConsoleError>) -> Result<(), ConsoleError> {
        match result {
            Ok(counts) => {
                self.counts = counts;
                self.updated_at = Some(Utc::now());
                self.last_error = None;
                Ok(())
            }
            Err(err) => {
                self.last_error = Some(err.to_string());
                Err(err)
            }
        }
    }

    pub fn counts(&self) -> &StatusCounts {
        &self.counts
    }

    /// `None` until the first successful poll
    pub fn updated_at(&self) -> Option<DateTime<Utc>> {
        self.updated_at
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn codes(entries: &[(i32, u64)]) -> HashMap<i32, u64> {
        entries.iter().copied().collect()
    }

    #[test]
    fn test_missing_codes_are_zero() {
        let counts = StatusCounts::from_codes(&codes(&[(0, 4), (3, 9)]));
        assert_eq!(counts.get(TaskStatus::Queued), 4);
        assert_eq!(counts.get(TaskStatus::Running), 0);
        assert_eq!(counts.get(TaskStatus::Succeeded), 9);
        assert_eq!(counts.iter().count(), 5);
        assert_eq!(counts.total(), 13);
    }

    #[test]
    fn test_unrecognised_codes_fold_into_unknown() {
        let counts = StatusCounts::from_codes(&codes(&[(4, 1), (5, 2), (17, 3)]));
        assert_eq!(counts.get(TaskStatus::Unknown), 6);
    }

    #[test]
    fn test_failure_keeps_last_good_counts() {
        let mut cache = StatusCountsCache::new();
        let good = StatusCounts::from_codes(&codes(&[(1, 2)]));
        assert!(cache.apply(Ok(good)).is_ok());

        let err = ConsoleError::MalformedResponse("truncated".into());
        assert!(cache.apply(Err(err)).is_err());
        assert_eq!(cache.counts(), &good);
        assert!(cache.last_error().is_some());
        assert!(cache.updated_at().is_some());
    }

    #[test]
    fn test_serializes_by_status_name() {
        let counts = StatusCounts::from_codes(&codes(&[(2, 1)]));
        let json = serde_json::to_value(counts).expect("serialize");
        assert_eq!(json["FAILED"], 1);
        assert_eq!(json["UNKNOWN"], 0);
    }
}
