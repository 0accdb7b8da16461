//! Rendering winners with the shipped message strings.

use std::sync::{Arc, Mutex};

use rill_insight::*;
use rill_notify::{Dispatcher, Notification, Notifier, NotifyError, TemplateRenderer};
use rill_rules::message_templates::{MessageTemplate, MessageTemplatesRule, MessageTemplatesSpec};
use rill_rules::schema::CommonMetadata;
use rill_rules::CompiledMessageTemplates;

use crate::fixtures::*;

/// Keeps every notification it is asked to send.
struct Outbox {
    sent: Arc<Mutex<Vec<Notification>>>,
}

#[async_trait::async_trait]
impl Notifier for Outbox {
    async fn send(&self, notification: &Notification) -> Result<(), NotifyError> {
        self.sent.lock().unwrap().push(notification.clone());
        Ok(())
    }

    fn channel_name(&self) -> &str {
        "outbox"
    }
}

fn report() -> BatchReport {
    let rules = rules();
    let data = town();
    let ctx = ResolutionContext::new(ref_date(), &rules.thresholds, &data);
    BatchRunner::new(Resolver::registry(&rules.insight)).run(&ctx, &data.accounts())
}

#[test]
fn renders_increase_message() {
    let rules = rules();
    let report = report();
    let winner = report.winners.iter().find(|w| w.account == alice()).unwrap();

    let n = rill_insight::delivery::render(winner, &rules.messages, &TemplateRenderer::new())
        .unwrap();
    assert_eq!(n.subject, "Your Wednesday consumption went up");
    assert_eq!(
        n.body,
        "On 2024-04-03 you used 90.0 litres, 50% more than your usual 60.0 litres for a Wednesday."
    );
    assert_eq!(n.metadata["template"], "INSIGHT_A1_DAYOFWEEK_CONSUMPTION_INCR");
    assert_eq!(n.metadata["account"], alice().to_string());
    assert_eq!(n.metadata["score"], "inf");
}

fn catalog(title: &str, body: &str) -> CompiledMessageTemplates {
    MessageTemplatesRule {
        api_version: "v1".to_string(),
        kind: "MessageTemplates".to_string(),
        metadata: CommonMetadata {
            id: "messages-test".to_string(),
            name: "Test messages".to_string(),
            description: None,
            tags: None,
            enabled: true,
        },
        spec: MessageTemplatesSpec {
            locale: "en".to_string(),
            templates: [(
                "INSIGHT_A1_DAYOFWEEK_CONSUMPTION_INCR".to_string(),
                MessageTemplate {
                    title: title.to_string(),
                    body: body.to_string(),
                },
            )]
            .into(),
        },
    }
    .compile()
    .unwrap()
}

#[test]
fn shipped_messages_validate() {
    validate_messages(&rules().messages, &TemplateRenderer::new()).unwrap();
}

#[test]
fn unclosed_tag_fails_validation() {
    let messages = catalog("Up on {{ day_of_week", "You used {{ consumption }} litres.");
    let err = validate_messages(&messages, &TemplateRenderer::new()).unwrap_err();
    assert!(matches!(err, NotifyError::Template(_)));
    assert!(err.to_string().contains("INSIGHT_A1_DAYOFWEEK_CONSUMPTION_INCR title"));

    let messages = catalog("Up on {{ day_of_week }}", "{% if consumption %}never closed");
    let err = validate_messages(&messages, &TemplateRenderer::new()).unwrap_err();
    assert!(err.to_string().contains("body"));
}

#[tokio::test]
async fn delivers_every_winner() {
    let sent = Arc::new(Mutex::new(Vec::new()));
    let outbox = Box::new(Outbox { sent: sent.clone() }) as Box<dyn Notifier>;
    let dispatcher = Dispatcher::with_defaults(vec![outbox]);

    let rules = rules();
    let summary = deliver(&report(), &rules.messages, &TemplateRenderer::new(), &dispatcher).await;

    assert_eq!(summary.delivered, 2);
    assert_eq!(summary.unrendered, 0);
    let sent = sent.lock().unwrap();
    assert!(sent.iter().any(|n| n.subject == "Your Wednesday consumption went down"));
}

#[tokio::test]
async fn missing_strings_are_counted_not_sent() {
    let sent = Arc::new(Mutex::new(Vec::new()));
    let outbox = Box::new(Outbox { sent: sent.clone() }) as Box<dyn Notifier>;
    let dispatcher = Dispatcher::with_defaults(vec![outbox]);

    let summary = deliver(
        &report(),
        &CompiledMessageTemplates::default(),
        &TemplateRenderer::new(),
        &dispatcher,
    )
    .await;

    assert_eq!(summary.delivered, 0);
    assert_eq!(summary.unrendered, 2);
    assert!(sent.lock().unwrap().is_empty());
}
