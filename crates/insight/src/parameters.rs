//! Parameter sets behind each recommendation template.

use std::collections::BTreeMap;

use chrono::{DateTime, Datelike};
use chrono_tz::Tz;
use serde::Serialize;
use serde_json::{json, Value};

use rill_core::{DayOfWeek, DeviceType};

use crate::error::InsightError;
use crate::template::{ParameterizedTemplate, RecommendationTemplate};

/// Smallest consumption value a message may quote.
pub const MIN_VALUE: f64 = 1e-3;

/// Values every parameter set carries.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BaseParameters {
    pub ref_date: DateTime<Tz>,
    pub device_type: DeviceType,
}

impl BaseParameters {
    pub fn new(ref_date: DateTime<Tz>, device_type: DeviceType) -> Self {
        Self {
            ref_date,
            device_type,
        }
    }

    fn insert_into(&self, map: &mut BTreeMap<String, Value>) {
        map.insert("ref_date".to_string(), json!(self.ref_date.to_rfc3339()));
        map.insert("device_type".to_string(), json!(self.device_type.to_string()));
    }
}

// ── Insight A1 ──────────────────────────────────────────────────────

/// Same-weekday comparison: today's consumption against the weekday average.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InsightA1Parameters {
    #[serde(flatten)]
    base: BaseParameters,
    current_value: f64,
    average_value: f64,
}

impl InsightA1Parameters {
    pub fn new(
        ref_date: DateTime<Tz>,
        device_type: DeviceType,
        current_value: f64,
        average_value: f64,
    ) -> Self {
        Self {
            base: BaseParameters::new(ref_date, device_type),
            current_value,
            average_value,
        }
    }

    pub fn base(&self) -> &BaseParameters {
        &self.base
    }

    pub fn current_value(&self) -> f64 {
        self.current_value
    }

    pub fn average_value(&self) -> f64 {
        self.average_value
    }

    pub fn day_of_week(&self) -> DayOfWeek {
        DayOfWeek::from(self.base.ref_date.weekday())
    }

    /// Relative change against the average, in whole percent, truncated.
    pub fn percent_change(&self) -> i64 {
        let ratio = (self.current_value - self.average_value) / self.average_value;
        (100.0 * ratio.abs()) as i64
    }

    pub fn validate(&self) -> Result<(), InsightError> {
        for (name, value) in [
            ("current_value", self.current_value),
            ("average_value", self.average_value),
        ] {
            if value.is_nan() || value < MIN_VALUE {
                return Err(InsightError::InvalidParameters(format!(
                    "{name} must be at least {MIN_VALUE}, got {value}"
                )));
            }
        }
        Ok(())
    }
}

impl ParameterizedTemplate for InsightA1Parameters {
    fn template(&self) -> RecommendationTemplate {
        if self.average_value <= self.current_value {
            RecommendationTemplate::InsightA1DayOfWeekConsumptionIncr
        } else {
            RecommendationTemplate::InsightA1DayOfWeekConsumptionDecr
        }
    }

    fn parameters(&self) -> BTreeMap<String, Value> {
        let mut map = BTreeMap::new();
        self.base.insert_into(&mut map);
        map.insert("value".to_string(), json!(self.current_value));
        map.insert("consumption".to_string(), json!(self.current_value));
        map.insert("average_value".to_string(), json!(self.average_value));
        map.insert("average_consumption".to_string(), json!(self.average_value));
        map.insert("percent_change".to_string(), json!(self.percent_change()));
        map.insert("day".to_string(), json!(self.base.ref_date.to_rfc3339()));
        map.insert(
            "day_of_week".to_string(),
            serde_json::to_value(self.day_of_week()).unwrap_or(Value::Null),
        );
        map
    }
}

// ── Closed set ──────────────────────────────────────────────────────

/// Every parameter set a resolver can produce.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TemplateParameters {
    InsightA1(InsightA1Parameters),
}

impl TemplateParameters {
    pub fn base(&self) -> &BaseParameters {
        match self {
            Self::InsightA1(p) => p.base(),
        }
    }

    pub fn validate(&self) -> Result<(), InsightError> {
        match self {
            Self::InsightA1(p) => p.validate(),
        }
    }
}

impl ParameterizedTemplate for TemplateParameters {
    fn template(&self) -> RecommendationTemplate {
        match self {
            Self::InsightA1(p) => p.template(),
        }
    }

    fn parameters(&self) -> BTreeMap<String, Value> {
        match self {
            Self::InsightA1(p) => p.parameters(),
        }
    }

    fn with_locale(self, locale: &str) -> Self {
        match self {
            Self::InsightA1(p) => Self::InsightA1(p.with_locale(locale)),
        }
    }
}

impl From<InsightA1Parameters> for TemplateParameters {
    fn from(p: InsightA1Parameters) -> Self {
        Self::InsightA1(p)
    }
}
