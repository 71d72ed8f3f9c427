//! Port for transient action feedback (toasts).

/// Severity of a transient notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    /// An action completed.
    Success,
    /// An action failed.
    Error,
}

/// A transient message describing the outcome of a user action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    /// Severity shown next to the message.
    pub level: NotificationLevel,
    /// Text shown to the operator.
    pub message: String,
}

impl Notification {
    /// Success notification.
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Success,
            message: message.into(),
        }
    }

    /// Error notification.
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Error,
            message: message.into(),
        }
    }
}

/// Port used by controllers to publish action outcomes.
#[cfg_attr(test, mockall::automock)]
pub trait Notifier: Send + Sync {
    /// Publish a notification.
    fn notify(&self, notification: Notification);

    /// Take the notifications published so far, oldest first.
    fn drain(&self) -> Vec<Notification>;
}
