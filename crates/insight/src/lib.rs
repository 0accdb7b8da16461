//! Per-account consumption insights.
//!
//! Resolvers compare an account's recent water consumption against its own
//! history and emit at most one scored, parameterized message each. The
//! [`runner::BatchRunner`] drives every registered resolver over a set of
//! accounts and keeps the strongest message per account.

pub mod delivery;
pub mod error;
pub mod parameters;
pub mod resolver;
pub mod runner;
pub mod stats;
pub mod template;

pub use delivery::{deliver, validate_messages, DeliverySummary};
pub use error::InsightError;
pub use parameters::{BaseParameters, InsightA1Parameters, TemplateParameters};
pub use resolver::{InsightA1, InsightResolver, ResolutionContext, Resolver};
pub use runner::{AccountInsight, BatchReport, BatchRunner, ResolutionFailure};
pub use stats::SummaryAccumulator;
pub use template::{ParameterizedTemplate, RecommendationTemplate, ScoredTemplate};
