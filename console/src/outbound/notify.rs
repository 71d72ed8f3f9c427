//! Notifier adapter that logs outcomes and buffers them for the terminal.

use std::sync::Mutex;

use tracing::{info, warn};

use crate::domain::ports::{Notification, NotificationLevel, Notifier};

/// Buffers notifications until the CLI flushes them after a command.
#[derive(Debug, Default)]
pub struct TracingNotifier {
    pending: Mutex<Vec<Notification>>,
}

impl Notifier for TracingNotifier {
    fn notify(&self, notification: Notification) {
        match notification.level {
            NotificationLevel::Success => info!(message = %notification.message, "action succeeded"),
            NotificationLevel::Error => warn!(message = %notification.message, "action failed"),
        }
        match self.pending.lock() {
            Ok(mut pending) => pending.push(notification),
            Err(poisoned) => poisoned.into_inner().push(notification),
        }
    }

    fn drain(&self) -> Vec<Notification> {
        match self.pending.lock() {
            Ok(mut pending) => std::mem::take(&mut *pending),
            Err(poisoned) => std::mem::take(&mut *poisoned.into_inner()),
        }
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    fn drain_returns_notifications_in_order_and_empties_the_buffer() {
        let notifier = TracingNotifier::default();
        notifier.notify(Notification::success("Package created"));
        notifier.notify(Notification::error("code required"));

        assert_eq!(
            notifier.drain(),
            vec![
                Notification::success("Package created"),
                Notification::error("code required"),
            ]
        );
        assert!(notifier.drain().is_empty());
    }
}
