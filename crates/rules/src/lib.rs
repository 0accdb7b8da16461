//! YAML rule documents that tune insight generation.
//!
//! This crate provides:
//! - `VolumeThresholds`: minimum meaningful volume per device type and time unit
//! - `InsightConfig`: sensitivity and history requirements for each resolver
//! - `MessageTemplates`: display strings for each recommendation template
//! - A filesystem loader that compiles the documents into a [`RuleSet`]

pub mod insight_config;
pub mod loader;
pub mod message_templates;
pub mod schema;
pub mod volume_thresholds;

pub use insight_config::{InsightA1Tuning, InsightConfigSpec};
pub use loader::{RuleError, RuleLoader, RuleSet};
pub use message_templates::{CompiledMessageTemplates, MessageTemplate};
pub use volume_thresholds::{CompiledVolumeThresholds, VolumeThresholdProvider};
