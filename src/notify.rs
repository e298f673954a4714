//! User-facing notifications.
//!
//! The application shell owns one [`NotificationSink`] and hands it to every
//! operation that reports an outcome. Nothing here is process-global.

use std::fmt;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Success,
    Error,
    Warning,
    Info,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Success => "success",
            Self::Error => "error",
            Self::Warning => "warning",
            Self::Info => "info",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub severity: Severity,
    pub message: String,
    pub auto_dismiss: Option<Duration>,
}

impl Notification {
    pub fn new(severity: Severity, message: impl Into<String>) -> Self {
        Self {
            severity,
            message: message.into(),
            auto_dismiss: None,
        }
    }

    pub fn dismiss_after(mut self, after: Duration) -> Self {
        self.auto_dismiss = Some(after);
        self
    }
}

pub trait NotificationSink: Send + Sync {
    fn notify(&self, notification: Notification);
}

/// Writes notifications to the log.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl NotificationSink for TracingSink {
    fn notify(&self, notification: Notification) {
        let Notification {
            severity, message, ..
        } = notification;
        match severity {
            Severity::Error => tracing::error!(%severity, "{message}"),
            Severity::Warning => tracing::warn!(%severity, "{message}"),
            Severity::Success | Severity::Info => tracing::info!(%severity, "{message}"),
        }
    }
}

struct Shown {
    notification: Notification,
    at: Instant,
}

/// Holds only the most recent notification.
#[derive(Default)]
pub struct LastShownSink {
    slot: Mutex<Option<Shown>>,
}

impl LastShownSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// The notification on screen now, if any. Expired ones are dropped.
    pub fn current(&self) -> Option<Notification> {
        self.current_at(Instant::now())
    }

    pub fn dismiss(&self) {
        *self.slot.lock().unwrap_or_else(|e| e.into_inner()) = None;
    }

    fn current_at(&self, now: Instant) -> Option<Notification> {
        let mut slot = self.slot.lock().unwrap_or_else(|e| e.into_inner());
        let expired = slot.as_ref().is_some_and(|shown| {
            shown
                .notification
                .auto_dismiss
                .is_some_and(|after| now.saturating_duration_since(shown.at) >= after)
        });
        if expired {
            *slot = None;
        }
        slot.as_ref().map(|shown| shown.notification.clone())
    }
}

impl NotificationSink for LastShownSink {
    fn notify(&self, notification: Notification) {
        *self.slot.lock().unwrap_or_else(|e| e.into_inner()) = Some(Shown {
            notification,
            at: Instant::now(),
        });
    }
}
