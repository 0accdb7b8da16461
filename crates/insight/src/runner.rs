//! Batch resolution over many accounts.
//!
//! The runner is the scheduler around the resolvers: it runs every due
//! resolver for every (account, device type) pair, skips pairs whose
//! resolution fails, and keeps the highest-scoring message per account.
//! Nothing is retried.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info, warn};

use rill_core::{AccountKey, DeviceType};

use crate::resolver::{InsightResolver, ResolutionContext, Resolver};
use crate::template::ScoredTemplate;

/// The message chosen for one account.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AccountInsight {
    pub account: AccountKey,
    pub device_type: DeviceType,
    pub resolver: &'static str,
    pub scored: ScoredTemplate,
}

/// A pair that could not be resolved.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolutionFailure {
    pub account: AccountKey,
    pub device_type: DeviceType,
    pub resolver: &'static str,
    pub error: String,
}

/// Outcome of one batch run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct BatchReport {
    /// Best message per account, in account order of the input.
    pub winners: Vec<AccountInsight>,
    pub failures: Vec<ResolutionFailure>,
    /// Resolvers that were due and ran.
    pub executed: Vec<&'static str>,
    /// Scored candidates dropped for falling below `min_score` or failing validation.
    pub discarded: usize,
}

pub struct BatchRunner {
    resolvers: Vec<Resolver>,
    device_types: Vec<DeviceType>,
    min_score: f64,
    /// Resolver name → time of its last completed run.
    last_run: HashMap<&'static str, DateTime<Utc>>,
}

impl BatchRunner {
    pub fn new(resolvers: Vec<Resolver>) -> Self {
        Self {
            resolvers,
            device_types: DeviceType::ALL.to_vec(),
            min_score: 0.0,
            last_run: HashMap::new(),
        }
    }

    /// Candidates scoring below `min_score` are never selected.
    pub fn with_min_score(mut self, min_score: f64) -> Self {
        self.min_score = min_score;
        self
    }

    pub fn with_device_types(mut self, device_types: Vec<DeviceType>) -> Self {
        self.device_types = device_types;
        self
    }

    /// Record a previous run so `is_due` can skip the resolver.
    pub fn with_last_run(mut self, resolver: &'static str, at: DateTime<Utc>) -> Self {
        self.last_run.insert(resolver, at);
        self
    }

    pub fn last_run(&self, resolver: &str) -> Option<DateTime<Utc>> {
        self.last_run.get(resolver).copied()
    }

    /// Resolve every account against `ctx` and record the run time.
    pub fn run(&mut self, ctx: &ResolutionContext<'_>, accounts: &[AccountKey]) -> BatchReport {
        let now = ctx.ref_date.with_timezone(&Utc);
        let due: Vec<&Resolver> = self
            .resolvers
            .iter()
            .filter(|r| {
                let due = r.is_due(self.last_run.get(r.name()).copied(), now);
                if !due {
                    debug!(resolver = r.name(), "resolver not due, skipping");
                }
                due
            })
            .collect();

        let mut report = BatchReport {
            executed: due.iter().map(|r| r.name()).collect(),
            ..BatchReport::default()
        };

        for &account in accounts {
            let mut best: Option<AccountInsight> = None;

            for &device_type in &self.device_types {
                for resolver in &due {
                    let results = match resolver.resolve(ctx, account, device_type) {
                        Ok(results) => results,
                        Err(e) => {
                            warn!(
                                %account,
                                %device_type,
                                resolver = resolver.name(),
                                error = %e,
                                "resolution failed, skipping"
                            );
                            report.failures.push(ResolutionFailure {
                                account,
                                device_type,
                                resolver: resolver.name(),
                                error: e.to_string(),
                            });
                            continue;
                        }
                    };

                    for scored in results {
                        if let Err(e) = scored.parameters.validate() {
                            warn!(
                                %account,
                                resolver = resolver.name(),
                                error = %e,
                                "dropping invalid result"
                            );
                            report.discarded += 1;
                            continue;
                        }
                        if scored.score < self.min_score {
                            report.discarded += 1;
                            continue;
                        }
                        let beats = best
                            .as_ref()
                            .map_or(true, |b| scored.score.total_cmp(&b.scored.score).is_gt());
                        if beats {
                            best = Some(AccountInsight {
                                account,
                                device_type,
                                resolver: resolver.name(),
                                scored,
                            });
                        }
                    }
                }
            }

            if let Some(winner) = best {
                report.winners.push(winner);
            }
        }

        for &name in &report.executed {
            self.last_run.insert(name, now);
        }

        info!(
            accounts = accounts.len(),
            winners = report.winners.len(),
            failures = report.failures.len(),
            discarded = report.discarded,
            "insight batch complete"
        );

        report
    }
}
