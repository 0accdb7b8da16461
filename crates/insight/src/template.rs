//! Message templates and the scored results resolvers hand to dispatch.

use std::collections::BTreeMap;

use serde::{Serialize, Serializer};

use crate::parameters::TemplateParameters;

/// Display template selected by a resolver.
///
/// The code is the key under which message strings are looked up in the
/// `MessageTemplates` rule document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum RecommendationTemplate {
    #[serde(rename = "INSIGHT_A1_DAYOFWEEK_CONSUMPTION_INCR")]
    InsightA1DayOfWeekConsumptionIncr,
    #[serde(rename = "INSIGHT_A1_DAYOFWEEK_CONSUMPTION_DECR")]
    InsightA1DayOfWeekConsumptionDecr,
}

impl RecommendationTemplate {
    pub fn code(self) -> &'static str {
        match self {
            Self::InsightA1DayOfWeekConsumptionIncr => "INSIGHT_A1_DAYOFWEEK_CONSUMPTION_INCR",
            Self::InsightA1DayOfWeekConsumptionDecr => "INSIGHT_A1_DAYOFWEEK_CONSUMPTION_DECR",
        }
    }
}

impl std::fmt::Display for RecommendationTemplate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

/// Something that can pick a display template and fill it.
pub trait ParameterizedTemplate {
    fn template(&self) -> RecommendationTemplate;

    /// Substitution values keyed by placeholder name.
    fn parameters(&self) -> BTreeMap<String, serde_json::Value>;

    /// Adapt the values to `locale`. Locale-invariant parameters return
    /// themselves unchanged.
    fn with_locale(self, _locale: &str) -> Self
    where
        Self: Sized,
    {
        self
    }
}

/// One resolver result: how strongly it should be shown, and what to show.
///
/// Non-finite scores serialize as the strings `"inf"`, `"-inf"` and `"NaN"`,
/// since JSON has no number for them.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredTemplate {
    #[serde(serialize_with = "serialize_score")]
    pub score: f64,
    pub parameters: TemplateParameters,
}

fn serialize_score<S: Serializer>(score: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    if score.is_finite() {
        serializer.serialize_f64(*score)
    } else {
        serializer.serialize_str(&score.to_string())
    }
}

impl ScoredTemplate {
    pub fn new(score: f64, parameters: TemplateParameters) -> Self {
        Self { score, parameters }
    }

    pub fn template(&self) -> RecommendationTemplate {
        self.parameters.template()
    }
}
