//! Delivery channel that writes messages to the application log.

use tracing::info;

use crate::traits::{Notification, Notifier, NotifyError};

/// Emits each notification as a structured `info!` event.
#[derive(Debug)]
pub struct LogNotifier {
    name: String,
}

impl LogNotifier {
    pub fn new() -> Self {
        Self {
            name: "log".to_string(),
        }
    }
}

impl Default for LogNotifier {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl Notifier for LogNotifier {
    async fn send(&self, notification: &Notification) -> Result<(), NotifyError> {
        let account = notification.metadata.get("account").map(String::as_str).unwrap_or("-");
        let template = notification.metadata.get("template").map(String::as_str).unwrap_or("-");
        info!(
            account,
            template,
            subject = %notification.subject,
            body = %notification.body,
            "insight message"
        );
        Ok(())
    }

    fn channel_name(&self) -> &str {
        &self.name
    }
}
