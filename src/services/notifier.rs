use std::sync::Mutex;
use tracing::warn;

/// Fire-and-forget channel for user-facing error messages
pub trait Notifier: Send + Sync {
    fn show_error(&self, message: &str);
}

/// Emits notifications as structured log events
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn show_error(&self, message: &str) {
        warn!(notification = "error", "{}", message);
    }
}

/// Keeps every message shown, in order
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    messages: Mutex<Vec<String>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> Vec<String> {
        self.lock().clone()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<String>> {
        // A panic while holding the lock cannot leave the Vec half-updated
        self.messages
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Notifier for RecordingNotifier {
    fn show_error(&self, message: &str) {
        self.lock().push(message.to_string());
    }
}
