use crate::core::NotificationSink;
use chrono::{DateTime, Utc};
use std::sync::Mutex;

/// Reports every message as an `error` event. The CLI logger writes these to
/// stderr at its default level.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl TracingNotifier {
    pub fn new() -> Self {
        Self
    }
}

impl NotificationSink for TracingNotifier {
    fn notify_error(&self, message: &str) {
        tracing::error!("❌ {}", message);
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub message: String,
    pub at: DateTime<Utc>,
}

/// Keeps every message it receives, in order.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    received: Mutex<Vec<Notification>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notifications(&self) -> Vec<Notification> {
        self.received
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .clone()
    }

    pub fn messages(&self) -> Vec<String> {
        self.notifications()
            .into_iter()
            .map(|n| n.message)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.received.lock().unwrap_or_else(|p| p.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl NotificationSink for RecordingNotifier {
    fn notify_error(&self, message: &str) {
        let mut received = self.received.lock().unwrap_or_else(|p| p.into_inner());
        received.push(Notification {
            message: message.to_string(),
            at: Utc::now(),
        });
    }
}
