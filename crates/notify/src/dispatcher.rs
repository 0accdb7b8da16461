//! Routes rendered messages to delivery channels.
//!
//! Channels can be configured per template code; messages whose template
//! has no dedicated channels go to the default channels. Individual channel
//! failures don't block other channels.

use std::collections::HashMap;

use crate::traits::{DispatchResult, Notification, Notifier};

/// Dispatches notifications to multiple channels, organized per template.
pub struct Dispatcher {
    /// Template code → channels for that template.
    template_channels: HashMap<String, Vec<Box<dyn Notifier>>>,
    /// Fallback channels used when no template-specific channels exist.
    default_channels: Vec<Box<dyn Notifier>>,
}

impl Dispatcher {
    /// Create an empty dispatcher.
    pub fn empty() -> Self {
        Self {
            template_channels: HashMap::new(),
            default_channels: Vec::new(),
        }
    }

    /// Create a simple dispatcher with channels shared across all templates.
    pub fn with_defaults(channels: Vec<Box<dyn Notifier>>) -> Self {
        Self {
            template_channels: HashMap::new(),
            default_channels: channels,
        }
    }

    /// Replace all channels for a specific template code.
    pub fn set_template_channels(&mut self, code: String, channels: Vec<Box<dyn Notifier>>) {
        self.template_channels.insert(code, channels);
    }

    /// Deliver `notification` to every channel configured for `code`.
    ///
    /// Returns results for each channel delivery.
    pub async fn dispatch(&self, code: &str, notification: &Notification) -> Vec<DispatchResult> {
        let channels = self
            .template_channels
            .get(code)
            .unwrap_or(&self.default_channels);

        if channels.is_empty() {
            tracing::debug!(template = code, "No notification channels configured");
            return Vec::new();
        }

        let recipient = notification
            .metadata
            .get("account")
            .cloned()
            .unwrap_or_default();
        let mut results = Vec::with_capacity(channels.len());

        for channel in channels {
            let start = std::time::Instant::now();
            let result = channel.send(notification).await;
            let duration_ms = start.elapsed().as_millis() as u64;

            let (success, error) = match result {
                Ok(()) => {
                    tracing::debug!(
                        template = code,
                        channel = channel.channel_name(),
                        duration_ms,
                        "Notification delivered"
                    );
                    (true, None)
                }
                Err(e) => {
                    tracing::warn!(
                        template = code,
                        channel = channel.channel_name(),
                        error = %e,
                        duration_ms,
                        "Notification delivery failed"
                    );
                    (false, Some(e.to_string()))
                }
            };

            results.push(DispatchResult {
                channel: channel.channel_name().to_string(),
                recipient: recipient.clone(),
                success,
                error,
                duration_ms,
            });
        }

        results
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::NotifyError;
    use std::collections::BTreeMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    struct MockNotifier {
        name: String,
        send_count: Arc<AtomicUsize>,
        should_fail: bool,
    }

    #[async_trait::async_trait]
    impl Notifier for MockNotifier {
        async fn send(&self, _notification: &Notification) -> Result<(), NotifyError> {
            self.send_count.fetch_add(1, Ordering::SeqCst);
            if self.should_fail {
                Err(NotifyError::Delivery("mock failure".to_string()))
            } else {
                Ok(())
            }
        }
        fn channel_name(&self) -> &str {
            &self.name
        }
    }

    fn mock(name: &str, count: &Arc<AtomicUsize>, should_fail: bool) -> Box<dyn Notifier> {
        Box::new(MockNotifier {
            name: name.to_string(),
            send_count: count.clone(),
            should_fail,
        })
    }

    fn notification() -> Notification {
        Notification {
            subject: "Your Monday consumption went up".to_string(),
            body: "test body".to_string(),
            metadata: BTreeMap::new(),
        }
        .with_metadata("account", "3f2b")
    }

    #[tokio::test]
    async fn dispatch_to_all_default_channels() {
        let count_a = Arc::new(AtomicUsize::new(0));
        let count_b = Arc::new(AtomicUsize::new(0));

        let dispatcher =
            Dispatcher::with_defaults(vec![mock("a", &count_a, false), mock("b", &count_b, false)]);

        let results = dispatcher.dispatch("ANY_CODE", &notification()).await;
        assert_eq!(results.len(), 2);
        assert!(results.iter().all(|r| r.success));
        assert!(results.iter().all(|r| r.recipient == "3f2b"));
        assert_eq!(count_a.load(Ordering::SeqCst), 1);
        assert_eq!(count_b.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn template_channels_override_defaults() {
        let default_count = Arc::new(AtomicUsize::new(0));
        let special_count = Arc::new(AtomicUsize::new(0));

        let mut dispatcher = Dispatcher::with_defaults(vec![mock("log", &default_count, false)]);
        dispatcher.set_template_channels(
            "INSIGHT_A1_DAYOFWEEK_CONSUMPTION_INCR".to_string(),
            vec![mock("special", &special_count, false)],
        );

        dispatcher
            .dispatch("INSIGHT_A1_DAYOFWEEK_CONSUMPTION_INCR", &notification())
            .await;
        dispatcher
            .dispatch("INSIGHT_A1_DAYOFWEEK_CONSUMPTION_DECR", &notification())
            .await;

        assert_eq!(special_count.load(Ordering::SeqCst), 1);
        assert_eq!(default_count.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn partial_failure_doesnt_block() {
        let count = Arc::new(AtomicUsize::new(0));
        let dispatcher = Dispatcher::with_defaults(vec![
            mock("fail", &Arc::new(AtomicUsize::new(0)), true),
            mock("ok", &count, false),
        ]);

        let results = dispatcher.dispatch("ANY_CODE", &notification()).await;
        assert_eq!(results.len(), 2);
        assert!(!results[0].success);
        assert!(results[1].success);
        assert_eq!(count.load(Ordering::SeqCst), 1); // second channel still sent
    }

    #[tokio::test]
    async fn no_channels_returns_empty() {
        let dispatcher = Dispatcher::empty();
        let results = dispatcher.dispatch("ANY_CODE", &notification()).await;
        assert!(results.is_empty());
    }
}
