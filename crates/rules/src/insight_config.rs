//! InsightConfig rule kind: sensitivity and history requirements for the
//! insight resolvers.

use serde::{Deserialize, Serialize};

use crate::schema::CommonMetadata;

// ── YAML-level types ────────────────────────────────────────────────

/// Top-level InsightConfig rule document.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct InsightConfigRule {
    #[serde(rename = "apiVersion")]
    pub api_version: String,
    pub kind: String,
    pub metadata: CommonMetadata,
    pub spec: InsightConfigSpec,
}

/// Tunables per resolver. Omitted sections take their defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct InsightConfigSpec {
    #[serde(default)]
    pub insight_a1: InsightA1Tuning,
}

/// Same-weekday consumption comparison.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct InsightA1Tuning {
    /// Change considered significant, in standard deviations.
    #[serde(default = "default_sensitivity")]
    pub sensitivity: f64,
    /// Number of past weeks compared against.
    #[serde(default = "default_weeks")]
    pub weeks: u32,
    /// Fraction of `weeks` that must carry data.
    #[serde(default = "default_min_history_ratio")]
    pub min_history_ratio: f64,
}

fn default_sensitivity() -> f64 {
    1.28
}

fn default_weeks() -> u32 {
    12
}

fn default_min_history_ratio() -> f64 {
    0.5
}

impl Default for InsightA1Tuning {
    fn default() -> Self {
        Self {
            sensitivity: default_sensitivity(),
            weeks: default_weeks(),
            min_history_ratio: default_min_history_ratio(),
        }
    }
}

impl InsightA1Tuning {
    pub fn validate(&self) -> Result<(), String> {
        if !(self.sensitivity.is_finite() && self.sensitivity > 0.0) {
            return Err(format!(
                "insight_a1.sensitivity must be positive, got {}",
                self.sensitivity
            ));
        }
        if self.weeks == 0 {
            return Err("insight_a1.weeks must be at least 1".to_string());
        }
        if !(self.min_history_ratio > 0.0 && self.min_history_ratio <= 1.0) {
            return Err(format!(
                "insight_a1.min_history_ratio must be in (0, 1], got {}",
                self.min_history_ratio
            ));
        }
        Ok(())
    }

    /// Fewer non-empty weeks than this means insufficient history.
    pub fn min_history(&self) -> f64 {
        f64::from(self.weeks) * self.min_history_ratio
    }
}

// ── Compiled type ───────────────────────────────────────────────────

pub type CompiledInsightConfig = InsightConfigSpec;

impl InsightConfigRule {
    pub fn compile(&self) -> Result<CompiledInsightConfig, String> {
        self.spec.insight_a1.validate()?;
        Ok(self.spec.clone())
    }
}
