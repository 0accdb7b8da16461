use std::env;
use std::path::PathBuf;

use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::error::RillError;

/// Load .env file (silently ignores if missing).
pub fn load_dotenv() {
    dotenvy::dotenv().ok();
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_opt(key: &str) -> Option<String> {
    env::var(key).ok().filter(|s| !s.is_empty())
}

/// Read a profiled env var: tries {PROFILE}_{KEY} first, falls back to {KEY}.
fn profiled_env_opt(profile: &str, key: &str) -> Option<String> {
    if !profile.is_empty() {
        let prefixed = format!("{}_{}", profile, key);
        if let Some(v) = env_opt(&prefixed) {
            return Some(v);
        }
    }
    env_opt(key)
}

fn profiled_env_or(profile: &str, key: &str, default: &str) -> String {
    profiled_env_opt(profile, key).unwrap_or_else(|| default.to_string())
}

fn profiled_env_f64(profile: &str, key: &str, default: f64) -> f64 {
    profiled_env_opt(profile, key)
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

// ── Top-level config ──────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Active profile name (empty = default).
    pub profile: String,
    pub rules: RulesConfig,
    pub insight: InsightEnvConfig,
}

impl Config {
    /// Build config from environment variables (call `load_dotenv()` first).
    /// Profile is read from `RILL_PROFILE` env var. When set (e.g. `PROD`),
    /// every key is first looked up as `{PROFILE}_{KEY}`, falling back to `{KEY}`.
    pub fn from_env() -> Self {
        let profile = env_or("RILL_PROFILE", "").to_uppercase();
        Self::for_profile(&profile)
    }

    /// Build config for a specific named profile (empty string = default).
    pub fn for_profile(profile: &str) -> Self {
        let p = profile.to_uppercase();
        let p = p.as_str();
        Self {
            profile: p.to_string(),
            rules: RulesConfig::from_env_profiled(p),
            insight: InsightEnvConfig::from_env_profiled(p),
        }
    }

    pub fn profile_label(&self) -> &str {
        if self.profile.is_empty() { "default" } else { &self.profile }
    }

    /// Print a summary for startup logs.
    pub fn log_summary(&self) {
        tracing::info!("Config loaded (profile: {}):", self.profile_label());
        tracing::info!("  rules:       dir={}", self.rules.rules_dir.display());
        tracing::info!(
            "  insight:     timezone={}, min_score={}, measurements={}",
            self.insight.default_timezone,
            self.insight.min_score,
            self.insight
                .measurements_file
                .as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| "(none)".to_string())
        );
    }

    /// Return a JSON view of the active configuration.
    pub fn redacted_summary(&self) -> serde_json::Value {
        serde_json::json!({
            "profile": self.profile_label(),
            "rules": { "dir": self.rules.rules_dir },
            "insight": {
                "default_timezone": self.insight.default_timezone,
                "min_score": self.insight.min_score,
                "measurements_file": self.insight.measurements_file,
            },
        })
    }
}

// ── Rules ─────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RulesConfig {
    /// Directory scanned for YAML rule documents.
    pub rules_dir: PathBuf,
}

impl RulesConfig {
    fn from_env_profiled(p: &str) -> Self {
        Self {
            rules_dir: PathBuf::from(profiled_env_or(p, "RULES_DIR", "data/rules")),
        }
    }
}

// ── Insight ───────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InsightEnvConfig {
    /// IANA timezone used when an account carries none.
    pub default_timezone: String,
    /// Messages scoring below this are not dispatched.
    pub min_score: f64,
    /// JSON file with raw measurements for the in-memory data service.
    pub measurements_file: Option<PathBuf>,
}

impl InsightEnvConfig {
    fn from_env_profiled(p: &str) -> Self {
        Self {
            default_timezone: profiled_env_or(p, "DEFAULT_TIMEZONE", "UTC"),
            min_score: profiled_env_f64(p, "INSIGHT_MIN_SCORE", 0.0),
            measurements_file: profiled_env_opt(p, "MEASUREMENTS_FILE").map(PathBuf::from),
        }
    }

    /// Parse `default_timezone` into a [`Tz`].
    pub fn timezone(&self) -> Result<Tz, RillError> {
        self.default_timezone
            .parse::<Tz>()
            .map_err(|_| RillError::UnknownTimezone(self.default_timezone.clone()))
    }
}
