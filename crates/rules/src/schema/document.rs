//! Multi-kind rule document container and accessors.

use super::{CommonMetadata, RuleKind};
use crate::insight_config::InsightConfigRule;
use crate::message_templates::MessageTemplatesRule;
use crate::volume_thresholds::VolumeThresholdsRule;

/// A fully deserialized rule of any supported kind.
#[derive(Debug, Clone, PartialEq)]
pub enum RuleDocument {
    /// Minimum meaningful volumes per device type and time unit.
    VolumeThresholds(VolumeThresholdsRule),
    /// Resolver sensitivity and history requirements.
    InsightConfig(InsightConfigRule),
    /// Display strings per recommendation template.
    MessageTemplates(MessageTemplatesRule),
}

impl RuleDocument {
    pub fn metadata(&self) -> &CommonMetadata {
        match self {
            RuleDocument::VolumeThresholds(rule) => &rule.metadata,
            RuleDocument::InsightConfig(rule) => &rule.metadata,
            RuleDocument::MessageTemplates(rule) => &rule.metadata,
        }
    }

    pub fn kind(&self) -> RuleKind {
        match self {
            RuleDocument::VolumeThresholds(_) => RuleKind::VolumeThresholds,
            RuleDocument::InsightConfig(_) => RuleKind::InsightConfig,
            RuleDocument::MessageTemplates(_) => RuleKind::MessageTemplates,
        }
    }

    pub fn as_volume_thresholds(&self) -> Option<&VolumeThresholdsRule> {
        match self {
            RuleDocument::VolumeThresholds(rule) => Some(rule),
            _ => None,
        }
    }

    pub fn as_insight_config(&self) -> Option<&InsightConfigRule> {
        match self {
            RuleDocument::InsightConfig(rule) => Some(rule),
            _ => None,
        }
    }

    pub fn as_message_templates(&self) -> Option<&MessageTemplatesRule> {
        match self {
            RuleDocument::MessageTemplates(rule) => Some(rule),
            _ => None,
        }
    }
}
