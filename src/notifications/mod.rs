//! User-facing notifications
//!
//! Every wallet and trading action reports progress through a `NotificationSink`.
//! The binary streams them to the logger; tests collect them in memory.

pub mod types;

use parking_lot::Mutex;

use crate::logger::{self, LogTag};

pub use types::{Notification, NotificationAction, NotificationLevel};

/// Receiver of user-facing status messages
pub trait NotificationSink: Send + Sync {
    fn notify(&self, notification: Notification);
}

/// Writes notifications to the logger under the Notify tag
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl NotificationSink for LogSink {
    fn notify(&self, notification: Notification) {
        let line = format!("[{}] {}", notification.action, notification.message);
        match notification.level {
            NotificationLevel::Error => logger::error(LogTag::Notify, &line),
            NotificationLevel::Success | NotificationLevel::Info => {
                logger::info(LogTag::Notify, &line)
            }
        }
    }
}

/// Keeps every notification in order of arrival
#[derive(Debug, Default)]
pub struct MemorySink {
    received: Mutex<Vec<Notification>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notifications(&self) -> Vec<Notification> {
        self.received.lock().clone()
    }

    /// Messages only, for quick assertions
    pub fn messages(&self) -> Vec<String> {
        self.received
            .lock()
            .iter()
            .map(|n| n.message.clone())
            .collect()
    }

    pub fn errors(&self) -> Vec<Notification> {
        self.received
            .lock()
            .iter()
            .filter(|n| n.is_error())
            .cloned()
            .collect()
    }

    pub fn clear(&self) {
        self.received.lock().clear();
    }
}

impl NotificationSink for MemorySink {
    fn notify(&self, notification: Notification) {
        self.received.lock().push(notification);
    }
}
