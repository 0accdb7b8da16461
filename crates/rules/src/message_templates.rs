//! MessageTemplates rule kind: title and body strings for each
//! recommendation template code, rendered later with minijinja.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::schema::CommonMetadata;

/// Top-level MessageTemplates rule document.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct MessageTemplatesRule {
    #[serde(rename = "apiVersion")]
    pub api_version: String,
    pub kind: String,
    pub metadata: CommonMetadata,
    pub spec: MessageTemplatesSpec,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct MessageTemplatesSpec {
    /// Language tag of the strings (e.g. `en`).
    pub locale: String,
    /// Template code (e.g. `INSIGHT_A1_DAYOFWEEK_CONSUMPTION_INCR`) to strings.
    pub templates: BTreeMap<String, MessageTemplate>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct MessageTemplate {
    pub title: String,
    pub body: String,
}

/// Message strings for one locale, keyed by template code.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CompiledMessageTemplates {
    pub locale: String,
    templates: BTreeMap<String, MessageTemplate>,
}

impl CompiledMessageTemplates {
    pub fn get(&self, code: &str) -> Option<&MessageTemplate> {
        self.templates.get(code)
    }

    pub fn codes(&self) -> impl Iterator<Item = &str> {
        self.templates.keys().map(String::as_str)
    }

    /// Strings per template code, in code order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &MessageTemplate)> {
        self.templates.iter().map(|(code, t)| (code.as_str(), t))
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}

impl MessageTemplatesRule {
    pub fn compile(&self) -> Result<CompiledMessageTemplates, String> {
        for (code, template) in &self.spec.templates {
            if template.title.trim().is_empty() || template.body.trim().is_empty() {
                return Err(format!("template '{code}' has an empty title or body"));
            }
        }
        Ok(CompiledMessageTemplates {
            locale: self.spec.locale.clone(),
            templates: self.spec.templates.clone(),
        })
    }
}
