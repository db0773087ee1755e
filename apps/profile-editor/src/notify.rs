use std::sync::Mutex;

use tracing::{error, info};

/// Sink for user-facing outcome messages (a toast, a status line, a log).
/// The editor only hands over plain strings; rendering is the sink's job.
pub trait Notifier: Send + Sync {
    fn success(&self, message: &str);

    fn error(&self, message: &str);
}

/// Writes notices to the structured log.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn success(&self, message: &str) {
        info!(notice = "success", "{message}");
    }

    fn error(&self, message: &str) {
        error!(notice = "error", "{message}");
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Success(String),
    Error(String),
}

/// Keeps every notice in order. Useful for headless callers and tests.
#[derive(Debug, Default)]
pub struct MemoryNotifier {
    notices: Mutex<Vec<Notice>>,
}

impl MemoryNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notices(&self) -> Vec<Notice> {
        self.notices
            .lock()
            .map(|n| n.clone())
            .unwrap_or_else(|poisoned| poisoned.into_inner().clone())
    }

    fn push(&self, notice: Notice) {
        match self.notices.lock() {
            Ok(mut notices) => notices.push(notice),
            Err(poisoned) => poisoned.into_inner().push(notice),
        }
    }
}

impl Notifier for MemoryNotifier {
    fn success(&self, message: &str) {
        self.push(Notice::Success(message.to_string()));
    }

    fn error(&self, message: &str) {
        self.push(Notice::Error(message.to_string()));
    }
}
