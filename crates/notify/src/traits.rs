//! Notifier trait definition and shared error types.

use std::collections::BTreeMap;

/// Errors that can occur while rendering or delivering a message.
#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    #[error("Template rendering failed: {0}")]
    Template(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Delivery failed: {0}")]
    Delivery(String),
}

/// A rendered message ready for delivery.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct Notification {
    /// The rendered title.
    pub subject: String,
    /// The rendered body.
    pub body: String,
    /// Routing details (account, template code, score, ...).
    pub metadata: BTreeMap<String, String>,
}

impl Notification {
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }
}

/// Trait for delivery channel implementations.
#[async_trait::async_trait]
pub trait Notifier: Send + Sync {
    /// Deliver a notification through this channel.
    async fn send(&self, notification: &Notification) -> Result<(), NotifyError>;

    /// Human-readable name for this channel (e.g., "log").
    fn channel_name(&self) -> &str;
}

/// Result of dispatching a notification to a single channel.
#[derive(Debug)]
pub struct DispatchResult {
    pub channel: String,
    /// The `account` metadata entry of the notification, if any.
    pub recipient: String,
    pub success: bool,
    pub error: Option<String>,
    pub duration_ms: u64,
}
