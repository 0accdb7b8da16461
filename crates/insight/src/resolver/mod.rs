//! Insight resolvers and the registry that dispatches to them.

mod insight_a1;

pub use insight_a1::InsightA1;

use chrono::{DateTime, Duration, Utc};
use chrono_tz::Tz;

use rill_core::{AccountKey, DeviceType};
use rill_query::DataService;
use rill_rules::{InsightConfigSpec, VolumeThresholdProvider};

use crate::error::InsightError;
use crate::template::ScoredTemplate;

/// Read-only collaborators shared by every resolver in one run.
#[derive(Clone, Copy)]
pub struct ResolutionContext<'a> {
    /// The evaluation "today".
    pub ref_date: DateTime<Tz>,
    pub thresholds: &'a dyn VolumeThresholdProvider,
    pub data: &'a dyn DataService,
}

impl<'a> ResolutionContext<'a> {
    pub fn new(
        ref_date: DateTime<Tz>,
        thresholds: &'a dyn VolumeThresholdProvider,
        data: &'a dyn DataService,
    ) -> Self {
        Self {
            ref_date,
            thresholds,
            data,
        }
    }
}

/// A resolver inspects one (account, device type) pair and returns zero or
/// more scored messages.
///
/// Resolvers hold no state between calls. Errors from the data service are
/// returned as-is; retrying is the caller's decision.
pub trait InsightResolver {
    fn name(&self) -> &'static str;

    /// How often the resolver should run for an account.
    fn period(&self) -> Duration;

    fn resolve(
        &self,
        ctx: &ResolutionContext<'_>,
        account: AccountKey,
        device_type: DeviceType,
    ) -> Result<Vec<ScoredTemplate>, InsightError>;
}

/// Every resolver the engine knows about.
#[derive(Debug, Clone, PartialEq)]
pub enum Resolver {
    InsightA1(InsightA1),
}

impl Resolver {
    /// All resolvers, tuned from the compiled `InsightConfig`.
    pub fn registry(config: &InsightConfigSpec) -> Vec<Resolver> {
        vec![Resolver::InsightA1(InsightA1::new(config.insight_a1.clone()))]
    }

    /// Whether a full period has elapsed since `last_run`.
    pub fn is_due(&self, last_run: Option<DateTime<Utc>>, now: DateTime<Utc>) -> bool {
        match last_run {
            None => true,
            Some(last) => now - last >= self.period(),
        }
    }
}

impl InsightResolver for Resolver {
    fn name(&self) -> &'static str {
        match self {
            Resolver::InsightA1(r) => r.name(),
        }
    }

    fn period(&self) -> Duration {
        match self {
            Resolver::InsightA1(r) => r.period(),
        }
    }

    fn resolve(
        &self,
        ctx: &ResolutionContext<'_>,
        account: AccountKey,
        device_type: DeviceType,
    ) -> Result<Vec<ScoredTemplate>, InsightError> {
        match self {
            Resolver::InsightA1(r) => r.resolve(ctx, account, device_type),
        }
    }
}
