//! User-facing notifications for failed cart operations.

use std::sync::{Arc, Mutex, PoisonError};

use serde::Serialize;

/// Message shown when a requested quantity exceeds the stock ceiling.
pub const OUT_OF_STOCK_MESSAGE: &str = "Requested quantity out of stock";

/// How prominently a notice should be presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Warning,
    Error,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Warning => write!(f, "warning"),
            Severity::Error => write!(f, "error"),
        }
    }
}

/// A short message for the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub severity: Severity,
    pub message: String,
}

impl Notice {
    /// Creates a warning notice.
    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            message: message.into(),
        }
    }

    /// Creates an error notice.
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            message: message.into(),
        }
    }
}

/// Fire-and-forget sink for notices.
pub trait Notifier: Send + Sync {
    fn notify(&self, notice: Notice);
}

impl<T: Notifier + ?Sized> Notifier for Arc<T> {
    fn notify(&self, notice: Notice) {
        (**self).notify(notice);
    }
}

/// Notifier that writes notices to the log.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, notice: Notice) {
        match notice.severity {
            Severity::Warning => tracing::warn!(notice = %notice.message, "cart warning"),
            Severity::Error => tracing::error!(notice = %notice.message, "cart error"),
        }
    }
}

/// Notifier that keeps every notice for later inspection.
///
/// Clones share the same buffer.
#[derive(Debug, Clone, Default)]
pub struct RecordingNotifier {
    notices: Arc<Mutex<Vec<Notice>>>,
}

impl RecordingNotifier {
    /// Creates an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of all recorded notices.
    pub fn notices(&self) -> Vec<Notice> {
        self.notices
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Removes and returns all recorded notices.
    pub fn take(&self) -> Vec<Notice> {
        std::mem::take(&mut *self.notices.lock().unwrap_or_else(PoisonError::into_inner))
    }

    /// Returns the most recent notice.
    pub fn last(&self) -> Option<Notice> {
        self.notices
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .last()
            .cloned()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notice: Notice) {
        self.notices
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(notice);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recording_notifier_shares_buffer_between_clones() {
        let notifier = RecordingNotifier::new();
        let handle = notifier.clone();

        notifier.notify(Notice::warning("low"));
        notifier.notify(Notice::error("boom"));

        assert_eq!(handle.notices().len(), 2);
        assert_eq!(handle.last(), Some(Notice::error("boom")));

        let taken = handle.take();
        assert_eq!(taken[0], Notice::warning("low"));
        assert!(notifier.notices().is_empty());
    }

    #[test]
    fn notice_serializes_with_lowercase_severity() {
        let json = serde_json::to_value(Notice::warning(OUT_OF_STOCK_MESSAGE)).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"severity": "warning", "message": "Requested quantity out of stock"})
        );
    }

    #[test]
    fn notifier_through_arc_trait_object() {
        let recorder = RecordingNotifier::new();
        let shared: Arc<dyn Notifier> = Arc::new(recorder.clone());

        shared.notify(Notice::error("x"));

        assert_eq!(recorder.notices(), vec![Notice::error("x")]);
    }
}
