//! Insight A1: today's consumption against the same weekday in past weeks.
//!
//! The daily volume of the reference day is compared with the daily volumes
//! of the same weekday over the previous `weeks` weeks. Three gates keep
//! noise out: today's usage must be meaningful, enough past weeks must
//! carry data, and the past average itself must be meaningful. The score
//! is the absolute z-score scaled by `2 * sensitivity`.

use chrono::{DateTime, Datelike, Duration};
use chrono_tz::Tz;
use tracing::debug;

use rill_core::time::{day_start, shift};
use rill_core::{AccountKey, DayOfWeek, DeviceType, TimeUnit};
use rill_query::{
    DataField, DataQueryBuilder, DataService, Metric, QueryBase, QueryError, TimeAggregation,
};
use rill_rules::InsightA1Tuning;

use crate::error::InsightError;
use crate::parameters::InsightA1Parameters;
use crate::stats::SummaryAccumulator;
use crate::template::ScoredTemplate;

use super::{InsightResolver, ResolutionContext};

#[derive(Debug, Clone, PartialEq)]
pub struct InsightA1 {
    tuning: InsightA1Tuning,
}

impl Default for InsightA1 {
    fn default() -> Self {
        Self::new(InsightA1Tuning::default())
    }
}

impl InsightA1 {
    pub fn new(tuning: InsightA1Tuning) -> Self {
        Self { tuning }
    }

    pub fn tuning(&self) -> &InsightA1Tuning {
        &self.tuning
    }

    /// Summed volume of the one-day window starting at `start`.
    fn daily_volume(
        data: &dyn DataService,
        base: &QueryBase,
        start: &DateTime<Tz>,
        device_type: DeviceType,
    ) -> Result<Option<f64>, QueryError> {
        let query = base.sliding(*start, 1, TimeUnit::Day, TimeAggregation::All);
        let response = data.execute(&query)?;
        Ok(response
            .facade(device_type)
            .and_then(|facade| facade.get(DataField::Volume, Metric::Sum)))
    }
}

impl InsightResolver for InsightA1 {
    fn name(&self) -> &'static str {
        "insight_a1"
    }

    fn period(&self) -> Duration {
        Duration::days(1)
    }

    fn resolve(
        &self,
        ctx: &ResolutionContext<'_>,
        account: AccountKey,
        device_type: DeviceType,
    ) -> Result<Vec<ScoredTemplate>, InsightError> {
        let threshold = ctx.thresholds.volume_threshold(device_type, TimeUnit::Day);
        let day_of_week = DayOfWeek::from(ctx.ref_date.weekday());

        let base = DataQueryBuilder::new()
            .timezone(ctx.ref_date.timezone())
            .user("user", account)
            .device_type(device_type)
            .sum()
            .base()?;

        let start = day_start(&ctx.ref_date);

        // Gate 1: no meaningful usage today.
        let current = match Self::daily_volume(ctx.data, &base, &start, device_type)? {
            Some(v) if v >= threshold => v,
            other => {
                debug!(
                    %account,
                    %device_type,
                    value = ?other,
                    threshold,
                    "insight_a1: below daily threshold"
                );
                return Ok(Vec::new());
            }
        };

        // Most recent week first. Each anchor is the start of the same
        // weekday `week` weeks back on the local calendar.
        let mut summary = SummaryAccumulator::new();
        for week in 1..=self.tuning.weeks {
            let anchor = i32::try_from(week)
                .ok()
                .and_then(|w| shift(&start, -w, TimeUnit::Week))
                .ok_or_else(|| {
                    QueryError::WindowOutOfRange(format!("{week} weeks before {}", ctx.ref_date))
                })?;
            summary.push(Self::daily_volume(ctx.data, &base, &anchor, device_type)?);
        }

        // Gate 2: too few past weeks with data.
        if (summary.count() as f64) < self.tuning.min_history() {
            debug!(
                %account,
                %device_type,
                weeks = summary.count(),
                "insight_a1: insufficient history"
            );
            return Ok(Vec::new());
        }

        // Gate 3: the baseline itself is negligible.
        let average = match summary.mean() {
            Some(mean) if mean >= threshold => mean,
            other => {
                debug!(
                    %account,
                    %device_type,
                    mean = ?other,
                    threshold,
                    "insight_a1: baseline below threshold"
                );
                return Ok(Vec::new());
            }
        };

        let sd = summary.std_dev().unwrap_or(0.0);
        let (norm, score) = if sd > 0.0 {
            let norm = (current - average) / sd;
            (norm, norm.abs() / (2.0 * self.tuning.sensitivity))
        } else {
            (f64::INFINITY, f64::INFINITY)
        };

        debug!(
            %account,
            %device_type,
            %day_of_week,
            value = current,
            mean = average,
            sd,
            norm,
            score,
            "insight_a1: scored"
        );

        let parameters = InsightA1Parameters::new(ctx.ref_date, device_type, current, average);
        Ok(vec![ScoredTemplate::new(score, parameters.into())])
    }
}
