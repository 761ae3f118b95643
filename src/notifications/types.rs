//! Notification types
//!
//! User-facing status messages, each keyed by the action that produced it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Action a notification reports on
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum NotificationAction {
    Connect,
    SwitchNetwork,
    Approve,
    Launch,
    Select,
    Buy,
    Sell,
    Sync,
}

impl std::fmt::Display for NotificationAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NotificationAction::Connect => write!(f, "connect"),
            NotificationAction::SwitchNetwork => write!(f, "switch_network"),
            NotificationAction::Approve => write!(f, "approve"),
            NotificationAction::Launch => write!(f, "launch"),
            NotificationAction::Select => write!(f, "select"),
            NotificationAction::Buy => write!(f, "buy"),
            NotificationAction::Sell => write!(f, "sell"),
            NotificationAction::Sync => write!(f, "sync"),
        }
    }
}

/// Severity levels
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum NotificationLevel {
    Info,
    Success,
    Error,
}

impl std::fmt::Display for NotificationLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NotificationLevel::Info => write!(f, "info"),
            NotificationLevel::Success => write!(f, "success"),
            NotificationLevel::Error => write!(f, "error"),
        }
    }
}

/// A notification with timestamp
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Notification {
    pub action: NotificationAction,
    pub level: NotificationLevel,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

impl Notification {
    /// Create a new notification with current timestamp
    pub fn new(
        action: NotificationAction,
        level: NotificationLevel,
        message: impl Into<String>,
    ) -> Self {
        Self {
            action,
            level,
            message: message.into(),
            timestamp: Utc::now(),
        }
    }

    /// Progress message, e.g. "Approval pending..."
    pub fn info(action: NotificationAction, message: impl Into<String>) -> Self {
        Self::new(action, NotificationLevel::Info, message)
    }

    pub fn success(action: NotificationAction, message: impl Into<String>) -> Self {
        Self::new(action, NotificationLevel::Success, message)
    }

    pub fn error(action: NotificationAction, message: impl Into<String>) -> Self {
        Self::new(action, NotificationLevel::Error, message)
    }

    pub fn is_error(&self) -> bool {
        self.level == NotificationLevel::Error
    }
}
