//! Fluent construction of sliding-window aggregation queries.

use chrono::DateTime;
use chrono_tz::Tz;
use serde::Serialize;

use rill_core::{AccountKey, DeviceType, TimeUnit};

use crate::model::{AccountSelector, MeasurementDataSource, Metric, SlidingWindow, TimeAggregation};
use crate::service::QueryError;

// ---------------------------------------------------------------------------
// Builder
// ---------------------------------------------------------------------------

/// Collects the window-independent parts of a query.
///
/// ```ignore
/// let base = DataQueryBuilder::new()
///     .timezone(tz)
///     .user("user", account_key)
///     .source(MeasurementDataSource::from_device_type(device_type))
///     .sum()
///     .base()?;
/// let query = base.sliding(start, 1, TimeUnit::Day, TimeAggregation::All);
/// ```
#[derive(Debug, Clone, Default)]
pub struct DataQueryBuilder {
    timezone: Option<Tz>,
    account: Option<AccountSelector>,
    source: Option<MeasurementDataSource>,
    metrics: Vec<Metric>,
}

impl DataQueryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Timezone used to interpret window anchors. Defaults to UTC.
    pub fn timezone(mut self, tz: Tz) -> Self {
        self.timezone = Some(tz);
        self
    }

    /// Scope the query to a single account.
    pub fn user(mut self, label: impl Into<String>, key: AccountKey) -> Self {
        self.account = Some(AccountSelector {
            label: label.into(),
            key,
        });
        self
    }

    pub fn source(mut self, source: MeasurementDataSource) -> Self {
        self.source = Some(source);
        self
    }

    /// Shorthand for `source(MeasurementDataSource::from_device_type(..))`.
    pub fn device_type(self, device_type: DeviceType) -> Self {
        self.source(MeasurementDataSource::from_device_type(device_type))
    }

    pub fn sum(self) -> Self {
        self.metric(Metric::Sum)
    }

    pub fn min(self) -> Self {
        self.metric(Metric::Min)
    }

    pub fn max(self) -> Self {
        self.metric(Metric::Max)
    }

    pub fn average(self) -> Self {
        self.metric(Metric::Average)
    }

    pub fn count(self) -> Self {
        self.metric(Metric::Count)
    }

    fn metric(mut self, metric: Metric) -> Self {
        if !self.metrics.contains(&metric) {
            self.metrics.push(metric);
        }
        self
    }

    /// Freeze the collected configuration.
    ///
    /// Fails with [`QueryError::InvalidQuery`] when the account or the data
    /// source was never set.
    pub fn base(self) -> Result<QueryBase, QueryError> {
        let account = self
            .account
            .ok_or_else(|| QueryError::InvalidQuery("account key is required".to_string()))?;
        let source = self
            .source
            .ok_or_else(|| QueryError::InvalidQuery("data source is required".to_string()))?;

        Ok(QueryBase {
            timezone: self.timezone.unwrap_or(Tz::UTC),
            account,
            source,
            metrics: self.metrics,
        })
    }
}

// ---------------------------------------------------------------------------
// Base
// ---------------------------------------------------------------------------

/// Validated, window-independent query configuration.
///
/// Cheap to keep around for a whole resolution run: every call to
/// [`QueryBase::sliding`] yields a fresh [`DataQuery`] and leaves the base
/// untouched.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryBase {
    timezone: Tz,
    account: AccountSelector,
    source: MeasurementDataSource,
    metrics: Vec<Metric>,
}

impl QueryBase {
    /// Build the query for one sliding window.
    ///
    /// The anchor is re-expressed in the base timezone; no check is made
    /// that it lies in the past.
    pub fn sliding(
        &self,
        anchor: DateTime<Tz>,
        duration: i32,
        unit: TimeUnit,
        aggregation: TimeAggregation,
    ) -> DataQuery {
        DataQuery {
            timezone: self.timezone,
            account: self.account.clone(),
            source: self.source,
            metrics: self.metrics.clone(),
            window: SlidingWindow {
                anchor: anchor.with_timezone(&self.timezone),
                duration,
                unit,
                aggregation,
            },
        }
    }

    pub fn timezone(&self) -> Tz {
        self.timezone
    }

    pub fn account(&self) -> &AccountSelector {
        &self.account
    }

    pub fn source(&self) -> MeasurementDataSource {
        self.source
    }
}

// ---------------------------------------------------------------------------
// Query
// ---------------------------------------------------------------------------

/// An immutable aggregation query over one window.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DataQuery {
    timezone: Tz,
    account: AccountSelector,
    source: MeasurementDataSource,
    metrics: Vec<Metric>,
    window: SlidingWindow,
}

impl DataQuery {
    pub fn timezone(&self) -> Tz {
        self.timezone
    }

    pub fn account(&self) -> &AccountSelector {
        &self.account
    }

    pub fn source(&self) -> MeasurementDataSource {
        self.source
    }

    /// Requested metrics. Empty means every metric.
    pub fn metrics(&self) -> &[Metric] {
        &self.metrics
    }

    pub fn window(&self) -> &SlidingWindow {
        &self.window
    }

    /// Whether `metric` should be computed for this query.
    pub fn wants(&self, metric: Metric) -> bool {
        self.metrics.is_empty() || self.metrics.contains(&metric)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
