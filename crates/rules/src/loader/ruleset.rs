//! Compilation of loaded documents into the configuration the resolvers use.

use tracing::info;

use crate::insight_config::{CompiledInsightConfig, InsightConfigSpec};
use crate::message_templates::CompiledMessageTemplates;
use crate::schema::{RuleDocument, RuleKind};
use crate::volume_thresholds::CompiledVolumeThresholds;

use super::core::RuleLoader;
use super::error::{Result, RuleError};

/// Everything insight generation needs from the rules directory.
#[derive(Debug, Clone)]
pub struct RuleSet {
    pub thresholds: CompiledVolumeThresholds,
    pub insight: CompiledInsightConfig,
    pub messages: CompiledMessageTemplates,
}

impl RuleSet {
    /// Compile the enabled documents held by `loader`.
    ///
    /// Exactly one enabled `VolumeThresholds` document is required. At most
    /// one enabled `InsightConfig` and one `MessageTemplates` may exist;
    /// when absent, defaults and an empty catalog are used.
    pub fn compile(loader: &RuleLoader) -> Result<Self> {
        let enabled: Vec<&RuleDocument> =
            loader.documents().filter(|d| d.metadata().enabled).collect();

        let thresholds = single(&enabled, RuleKind::VolumeThresholds)?
            .and_then(RuleDocument::as_volume_thresholds)
            .ok_or_else(|| {
                RuleError::Validation("no enabled VolumeThresholds document found".to_string())
            })?
            .compile()
            .map_err(RuleError::Validation)?;

        let insight = match single(&enabled, RuleKind::InsightConfig)?
            .and_then(RuleDocument::as_insight_config)
        {
            Some(rule) => rule.compile().map_err(RuleError::Validation)?,
            None => InsightConfigSpec::default(),
        };

        let messages = match single(&enabled, RuleKind::MessageTemplates)?
            .and_then(RuleDocument::as_message_templates)
        {
            Some(rule) => rule.compile().map_err(RuleError::Validation)?,
            None => CompiledMessageTemplates::default(),
        };

        info!(
            templates = messages.len(),
            weeks = insight.insight_a1.weeks,
            sensitivity = insight.insight_a1.sensitivity,
            "compiled rule set"
        );

        Ok(Self {
            thresholds,
            insight,
            messages,
        })
    }

    /// Load `dir` and compile it in one step.
    pub fn from_dir(dir: impl Into<std::path::PathBuf>) -> Result<Self> {
        let mut loader = RuleLoader::new(dir.into());
        loader.load_all()?;
        Self::compile(&loader)
    }
}

fn single<'a>(docs: &[&'a RuleDocument], kind: RuleKind) -> Result<Option<&'a RuleDocument>> {
    let mut matching = docs.iter().copied().filter(|d| d.kind() == kind);
    let first = matching.next();
    if let Some(second) = matching.next() {
        return Err(RuleError::Validation(format!(
            "more than one enabled {kind} document ('{}' and '{}')",
            first.map(|d| d.metadata().id.as_str()).unwrap_or_default(),
            second.metadata().id
        )));
    }
    Ok(first)
}
