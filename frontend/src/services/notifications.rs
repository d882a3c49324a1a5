//! # Toast Notifications
//!
//! In-memory toast queue. The presentation layer drains it to display
//! toasts; every toast is also logged.

use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{DateTime, Utc};
use tracing::{info, warn};

use crate::services::traits::Notifier;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastLevel {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Toast {
    pub level: ToastLevel,
    pub message: String,
    pub title: String,
    pub shown_at: DateTime<Utc>,
}

/// Shared queue of toasts waiting to be displayed
#[derive(Debug, Clone, Default)]
pub struct ToastQueue {
    toasts: Arc<Mutex<Vec<Toast>>>,
}

impl ToastQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of every toast currently queued
    pub fn snapshot(&self) -> Vec<Toast> {
        self.lock().clone()
    }

    /// Take every queued toast, leaving the queue empty
    pub fn drain(&self) -> Vec<Toast> {
        std::mem::take(&mut *self.lock())
    }

    pub fn count(&self, level: ToastLevel) -> usize {
        self.lock().iter().filter(|t| t.level == level).count()
    }

    fn push(&self, level: ToastLevel, message: &str, title: &str) {
        self.lock().push(Toast {
            level,
            message: message.to_string(),
            title: title.to_string(),
            shown_at: Utc::now(),
        });
    }

    fn lock(&self) -> MutexGuard<'_, Vec<Toast>> {
        self.toasts.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Notifier for ToastQueue {
    fn success(&self, message: &str, title: &str) {
        info!("✅ {}: {}", title, message);
        self.push(ToastLevel::Success, message, title);
    }

    fn error(&self, message: &str, title: &str) {
        warn!("❌ {}: {}", title, message);
        self.push(ToastLevel::Error, message, title);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toasts_are_recorded_in_order() {
        let queue = ToastQueue::new();
        queue.success("The data have been saved successfully", "Data saved");
        queue.error("An error occurred while saving your data", "Network error");

        let toasts = queue.snapshot();
        assert_eq!(toasts.len(), 2);
        assert_eq!(toasts[0].level, ToastLevel::Success);
        assert_eq!(toasts[0].title, "Data saved");
        assert_eq!(toasts[1].level, ToastLevel::Error);
        assert!(toasts[0].shown_at <= toasts[1].shown_at);
    }

    #[test]
    fn test_drain_empties_queue() {
        let queue = ToastQueue::new();
        let observer = queue.clone();
        queue.success("done", "Done");

        assert_eq!(observer.count(ToastLevel::Success), 1);
        assert_eq!(observer.drain().len(), 1);
        assert!(queue.snapshot().is_empty());
    }
}
