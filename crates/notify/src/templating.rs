//! Minijinja template rendering for insight messages.
//!
//! Message strings come from the `MessageTemplates` rule document and are
//! rendered against the parameter map of a scored template. Templates are
//! arbitrary strings (not pre-registered), so a fresh
//! [`minijinja::Environment`] is created per render call.

use std::collections::BTreeMap;

use chrono::DateTime;
use minijinja::{Error, ErrorKind};
use serde::Serialize;

use crate::traits::{Notification, NotifyError};

/// Default output format of the `date` filter.
const DEFAULT_DATE_FORMAT: &str = "%Y-%m-%d";

/// Renders message templates using minijinja.
#[derive(Debug)]
pub struct TemplateRenderer {
    _private: (),
}

impl TemplateRenderer {
    /// Create a new template renderer.
    pub fn new() -> Self {
        Self { _private: () }
    }

    /// Build a configured minijinja environment with custom filters.
    fn build_env() -> minijinja::Environment<'static> {
        let mut env = minijinja::Environment::new();

        env.add_filter("round", round_filter);
        env.add_filter("percent", percent_filter);
        env.add_filter("date", date_filter);

        // `lower` and `upper` are built-in with the "builtins" feature,
        // but we register explicit versions to guarantee availability.
        env.add_filter("lower", lower_filter);
        env.add_filter("upper", upper_filter);

        env
    }

    /// Render a template string with the given context.
    ///
    /// # Errors
    ///
    /// Returns [`NotifyError::Template`] if the template is invalid or
    /// rendering fails (e.g., a filter applied to the wrong type).
    pub fn render<S: Serialize>(&self, template_str: &str, ctx: &S) -> Result<String, NotifyError> {
        let env = Self::build_env();
        env.render_str(template_str, ctx)
            .map_err(|e| NotifyError::Template(e.to_string()))
    }

    /// Render a title and body pair into a [`Notification`] with no metadata.
    pub fn render_notification(
        &self,
        title: &str,
        body: &str,
        params: &BTreeMap<String, serde_json::Value>,
    ) -> Result<Notification, NotifyError> {
        Ok(Notification {
            subject: self.render(title, params)?,
            body: self.render(body, params)?,
            metadata: BTreeMap::new(),
        })
    }

    /// Validate that a template string parses without errors.
    ///
    /// This does not evaluate the template, it only checks syntax.
    ///
    /// # Errors
    ///
    /// Returns [`NotifyError::Template`] if the template has syntax errors.
    pub fn validate(&self, template_str: &str) -> Result<(), NotifyError> {
        let env = Self::build_env();
        env.template_from_str(template_str)
            .map_err(|e| NotifyError::Template(e.to_string()))?;
        Ok(())
    }
}

impl Default for TemplateRenderer {
    fn default() -> Self {
        Self::new()
    }
}

/// Custom filter: round a float to N decimal places.
fn round_filter(value: f64, decimals: Option<u32>) -> String {
    let n = decimals.unwrap_or(0);
    format!("{:.prec$}", value, prec = n as usize)
}

/// Custom filter: format a ratio (0.25) as a percentage ("25%").
fn percent_filter(value: f64, decimals: Option<u32>) -> String {
    let n = decimals.unwrap_or(0);
    format!("{:.prec$}%", value * 100.0, prec = n as usize)
}

/// Custom filter: reformat an RFC 3339 timestamp with a strftime pattern.
fn date_filter(value: String, format: Option<String>) -> Result<String, Error> {
    let parsed = DateTime::parse_from_rfc3339(&value).map_err(|e| {
        Error::new(
            ErrorKind::InvalidOperation,
            format!("'{value}' is not an RFC 3339 timestamp: {e}"),
        )
    })?;
    let format = format.as_deref().unwrap_or(DEFAULT_DATE_FORMAT);
    Ok(parsed.format(format).to_string())
}

/// Custom filter: lowercase a string.
fn lower_filter(value: String) -> String {
    value.to_lowercase()
}

/// Custom filter: uppercase a string.
fn upper_filter(value: String) -> String {
    value.to_uppercase()
}
