//! Turning batch winners into delivered messages.

use tracing::warn;

use rill_notify::{Dispatcher, Notification, NotifyError, TemplateRenderer};
use rill_rules::CompiledMessageTemplates;

use crate::runner::{AccountInsight, BatchReport};
use crate::template::ParameterizedTemplate;

/// Counts from one delivery pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeliverySummary {
    pub delivered: usize,
    /// Winners whose template has no message strings or failed to render.
    pub unrendered: usize,
    /// Channel deliveries that failed.
    pub failed_channels: usize,
}

/// Check that every title and body in `messages` parses as a template.
///
/// # Errors
///
/// Returns [`NotifyError::Template`] naming the first broken template code.
pub fn validate_messages(
    messages: &CompiledMessageTemplates,
    renderer: &TemplateRenderer,
) -> Result<(), NotifyError> {
    for (code, strings) in messages.iter() {
        for (part, source) in [("title", &strings.title), ("body", &strings.body)] {
            renderer
                .validate(source)
                .map_err(|e| NotifyError::Template(format!("{code} {part}: {e}")))?;
        }
    }
    Ok(())
}

/// Render the message for one winner in the catalog's locale.
pub fn render(
    winner: &AccountInsight,
    messages: &CompiledMessageTemplates,
    renderer: &TemplateRenderer,
) -> Result<Notification, NotifyError> {
    let code = winner.scored.template().code();
    let strings = messages
        .get(code)
        .ok_or_else(|| NotifyError::Config(format!("no message strings for template {code}")))?;

    let params = winner
        .scored
        .parameters
        .clone()
        .with_locale(&messages.locale)
        .parameters();

    Ok(renderer
        .render_notification(&strings.title, &strings.body, &params)?
        .with_metadata("account", winner.account.to_string())
        .with_metadata("device_type", winner.device_type.to_string())
        .with_metadata("resolver", winner.resolver)
        .with_metadata("template", code)
        .with_metadata("score", format!("{:.3}", winner.scored.score)))
}

/// Render every winner of `report` and hand it to `dispatcher`.
pub async fn deliver(
    report: &BatchReport,
    messages: &CompiledMessageTemplates,
    renderer: &TemplateRenderer,
    dispatcher: &Dispatcher,
) -> DeliverySummary {
    let mut summary = DeliverySummary::default();

    for winner in &report.winners {
        let notification = match render(winner, messages, renderer) {
            Ok(n) => n,
            Err(e) => {
                warn!(account = %winner.account, error = %e, "cannot render insight message");
                summary.unrendered += 1;
                continue;
            }
        };

        let code = winner.scored.template().code();
        let results = dispatcher.dispatch(code, &notification).await;
        let failed = results.iter().filter(|r| !r.success).count();
        summary.failed_channels += failed;
        if failed < results.len() {
            summary.delivered += 1;
        }
    }

    summary
}
