//! Filesystem rule loader.
//!
//! Scans the rules directory for YAML files, parses every supported kind via
//! two-pass deserialization (RuleEnvelope -> RuleDocument) and compiles the
//! enabled documents into a [`RuleSet`].

mod core;
mod error;
mod ruleset;


pub use self::core::RuleLoader;
pub use self::error::{LoadResult, LoadStatus, Result, RuleError};
pub use self::ruleset::RuleSet;
