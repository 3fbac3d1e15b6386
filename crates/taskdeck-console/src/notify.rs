/*
[INPUT]:  Outcomes reported by console flows
[OUTPUT]: Bounded queue of transient, expiring notifications
[POS]:    Notification layer - the single sink for user-visible errors
[UPDATE]: When changing notification lifetime or capacity
*/

use std::collections::VecDeque;
use std::time::Duration;

use tokio::time::Instant;

pub const NOTIFICATION_TTL: Duration = Duration::from_secs(4);
pub const MAX_NOTIFICATIONS: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Success,
    Error,
    Info,
}

#[derive(Debug, Clone)]
pub struct Notification {
    pub level: NotificationLevel,
    pub message: String,
    pub created_at: Instant,
}

#[derive(Debug)]
pub struct Notifications {
    items: VecDeque<Notification>,
    ttl: Duration,
    capacity: usize,
}

impl Default for Notifications {
    fn default() -> Self {
        Self::new(NOTIFICATION_TTL, MAX_NOTIFICATIONS)
    }
}

impl Notifications {
    pub fn new(ttl: Duration, capacity: usize) -> Self {
        Self {
            items: VecDeque::with_capacity(capacity),
            ttl,
            capacity: capacity.max(1),
        }
    }

    pub fn push(&mut self, level: NotificationLevel, message: impl Into<String>) {
        let message = message.into();
        match level {
            NotificationLevel::Error => tracing::warn!(%message, "notification"),
            _ => tracing::info!(%message, "notification"),
        }
        if self.items.len() >= self.capacity {
            self.items.pop_front();
        }
        self.items.push_back(Notification {
            level,
            message,
            created_at: Instant::now(),
        });
    }

    pub fn success(&mut self, message: impl Into<String>) {
        self.push(NotificationLevel::Success, message);
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.push(NotificationLevel::Error, message);
    }

    pub fn info(&mut self, message: impl Into<String>) {
        self.push(NotificationLevel::Info, message);
    }

    /// Drop expired notifications
    pub fn prune(&mut self, now: Instant) {
        let ttl = self.ttl;
        self.items
            .retain(|item| now.saturating_duration_since(item.created_at) < ttl);
    }

    pub fn iter(&self) -> impl Iterator<Item = &Notification> {
        self.items.iter()
    }

    pub fn latest(&self) -> Option<&Notification> {
        self.items.back()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }
}
