//! Vocabulary shared by queries and their results.

use chrono::DateTime;
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use rill_core::time;
use rill_core::{AccountKey, DeviceType, TimeUnit};

/// A measured quantity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataField {
    Volume,
    Energy,
    Duration,
    Temperature,
    Flow,
}

/// Aggregate computed over a field within a window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Metric {
    Count,
    Sum,
    Min,
    Max,
    Average,
}

/// Where measurements for a device type are stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MeasurementDataSource {
    Amphiro,
    Meter,
}

impl MeasurementDataSource {
    pub fn from_device_type(device_type: DeviceType) -> Self {
        match device_type {
            DeviceType::Amphiro => MeasurementDataSource::Amphiro,
            DeviceType::Meter => MeasurementDataSource::Meter,
        }
    }

    /// Device type whose facade carries this source's series.
    pub fn device_type(self) -> DeviceType {
        match self {
            MeasurementDataSource::Amphiro => DeviceType::Amphiro,
            MeasurementDataSource::Meter => DeviceType::Meter,
        }
    }
}

/// Granularity of the points returned for a window.
///
/// `All` collapses the whole window into a single point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeAggregation {
    Hour,
    Day,
    Week,
    Month,
    Year,
    All,
}

/// The account a query is scoped to, under a caller-chosen label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountSelector {
    pub label: String,
    pub key: AccountKey,
}

/// A window of `duration` units starting (or ending) at `anchor`.
///
/// Positive durations extend forward: `[anchor, anchor + duration)`.
/// Negative durations extend backward: `[anchor - |duration|, anchor)`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SlidingWindow {
    pub anchor: DateTime<Tz>,
    pub duration: i32,
    pub unit: TimeUnit,
    pub aggregation: TimeAggregation,
}

impl SlidingWindow {
    /// Inclusive start and exclusive end of the window.
    ///
    /// Returns `None` if either bound overflows the representable range.
    pub fn bounds(&self) -> Option<(DateTime<Tz>, DateTime<Tz>)> {
        let other = time::shift(&self.anchor, self.duration, self.unit)?;
        if self.duration >= 0 {
            Some((self.anchor, other))
        } else {
            Some((other, self.anchor))
        }
    }
}
