//! Rule kind enum for two-pass deserialization dispatch.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RuleKind {
    VolumeThresholds,
    InsightConfig,
    MessageTemplates,
}

impl fmt::Display for RuleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuleKind::VolumeThresholds => write!(f, "VolumeThresholds"),
            RuleKind::InsightConfig => write!(f, "InsightConfig"),
            RuleKind::MessageTemplates => write!(f, "MessageTemplates"),
        }
    }
}

impl FromStr for RuleKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "VolumeThresholds" => Ok(RuleKind::VolumeThresholds),
            "InsightConfig" => Ok(RuleKind::InsightConfig),
            "MessageTemplates" => Ok(RuleKind::MessageTemplates),
            other => Err(format!("unknown rule kind: '{}'", other)),
        }
    }
}
