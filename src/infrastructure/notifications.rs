use crate::domain::notification::Notification;
use crate::domain::ports::NotificationSink;
use crate::sync::lock;
use std::io::Write;
use std::sync::{Arc, Mutex};
use tracing::{debug, error};

/// Collects notifications in memory. Clones share the same list.
#[derive(Default, Clone)]
pub struct InMemoryNotificationSink {
    notifications: Arc<Mutex<Vec<Notification>>>,
}

impl InMemoryNotificationSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notifications(&self) -> Vec<Notification> {
        lock(&self.notifications).clone()
    }

    /// Removes and returns everything collected so far.
    pub fn drain(&self) -> Vec<Notification> {
        std::mem::take(&mut *lock(&self.notifications))
    }
}

impl NotificationSink for InMemoryNotificationSink {
    fn notify(&self, notification: Notification) {
        debug!(%notification, "Notification");
        lock(&self.notifications).push(notification);
    }
}

/// Writes one `[variant] title: message` line per notification.
pub struct ConsoleNotificationSink<W: Write + Send> {
    writer: Mutex<W>,
}

impl<W: Write + Send> ConsoleNotificationSink<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer: Mutex::new(writer),
        }
    }
}

impl<W: Write + Send> NotificationSink for ConsoleNotificationSink<W> {
    fn notify(&self, notification: Notification) {
        let mut writer = lock(&self.writer);
        if let Err(e) = writeln!(writer, "{}", notification).and_then(|_| writer.flush()) {
            error!(error = %e, "Failed to write notification");
        }
    }
}
