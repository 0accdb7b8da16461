//! Rule envelope for lightweight first-pass deserialization.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use super::{CommonMetadata, RuleDocument, RuleKind};

/// First-pass view of a rule file: header fields plus the raw remainder.
///
/// The `kind` decides which concrete type the second pass targets.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuleEnvelope {
    #[serde(rename = "apiVersion")]
    pub api_version: String,
    pub kind: String,
    pub metadata: CommonMetadata,
    #[serde(flatten)]
    pub rest: serde_yaml::Value,
}

impl RuleEnvelope {
    pub fn rule_kind(&self) -> std::result::Result<RuleKind, String> {
        self.kind.parse()
    }

    /// Second pass: re-serialize and deserialize into the kind-specific type.
    pub fn parse_full(&self) -> std::result::Result<RuleDocument, String> {
        match self.rule_kind()? {
            RuleKind::VolumeThresholds => self.reparse().map(RuleDocument::VolumeThresholds),
            RuleKind::InsightConfig => self.reparse().map(RuleDocument::InsightConfig),
            RuleKind::MessageTemplates => self.reparse().map(RuleDocument::MessageTemplates),
        }
    }

    fn reparse<T: DeserializeOwned>(&self) -> std::result::Result<T, String> {
        let yaml = serde_yaml::to_string(self).map_err(|e| e.to_string())?;
        serde_yaml::from_str(&yaml).map_err(|e| e.to_string())
    }
}
