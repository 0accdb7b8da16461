//! In-memory [`DataService`] over raw measurements.
//!
//! Used by the worker binary (measurements loaded from JSON) and by tests
//! that want real window arithmetic rather than canned responses.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use rill_core::{AccountKey, DeviceType};

use crate::builder::DataQuery;
use crate::model::{DataField, Metric, TimeAggregation};
use crate::result::{DataQueryResponse, SeriesFacade};
use crate::service::{DataService, QueryError};

/// One raw reading reported by a device.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Measurement {
    pub account: AccountKey,
    pub device_type: DeviceType,
    pub timestamp: DateTime<Utc>,
    /// Litres.
    pub volume: f64,
    #[serde(default)]
    pub energy: Option<f64>,
    #[serde(default)]
    pub duration: Option<f64>,
    #[serde(default)]
    pub temperature: Option<f64>,
    #[serde(default)]
    pub flow: Option<f64>,
}

impl Measurement {
    pub fn volume(
        account: AccountKey,
        device_type: DeviceType,
        timestamp: DateTime<Utc>,
        volume: f64,
    ) -> Self {
        Self {
            account,
            device_type,
            timestamp,
            volume,
            energy: None,
            duration: None,
            temperature: None,
            flow: None,
        }
    }

    fn field(&self, field: DataField) -> Option<f64> {
        match field {
            DataField::Volume => Some(self.volume),
            DataField::Energy => self.energy,
            DataField::Duration => self.duration,
            DataField::Temperature => self.temperature,
            DataField::Flow => self.flow,
        }
    }
}

const FIELDS: [DataField; 5] = [
    DataField::Volume,
    DataField::Energy,
    DataField::Duration,
    DataField::Temperature,
    DataField::Flow,
];

/// Measurement store held entirely in memory.
#[derive(Debug, Clone, Default)]
pub struct InMemoryDataService {
    measurements: Vec<Measurement>,
}

impl InMemoryDataService {
    pub fn new(measurements: Vec<Measurement>) -> Self {
        Self { measurements }
    }

    /// Load a JSON array of [`Measurement`]s.
    pub fn from_json_file(path: &Path) -> Result<Self, QueryError> {
        let file = File::open(path)
            .map_err(|e| QueryError::Unavailable(format!("{}: {e}", path.display())))?;
        let measurements: Vec<Measurement> = serde_json::from_reader(BufReader::new(file))
            .map_err(|e| QueryError::Malformed(format!("{}: {e}", path.display())))?;
        debug!(path = %path.display(), count = measurements.len(), "loaded measurements");
        Ok(Self::new(measurements))
    }

    pub fn push(&mut self, measurement: Measurement) {
        self.measurements.push(measurement);
    }

    pub fn len(&self) -> usize {
        self.measurements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.measurements.is_empty()
    }

    /// Accounts that have at least one measurement, in first-seen order.
    pub fn accounts(&self) -> Vec<AccountKey> {
        let mut seen = Vec::new();
        for m in &self.measurements {
            if !seen.contains(&m.account) {
                seen.push(m.account);
            }
        }
        seen
    }
}

impl DataService for InMemoryDataService {
    fn execute(&self, query: &DataQuery) -> Result<DataQueryResponse, QueryError> {
        let window = query.window();
        if window.aggregation != TimeAggregation::All {
            return Err(QueryError::InvalidQuery(format!(
                "in-memory store only aggregates whole windows, got {:?}",
                window.aggregation
            )));
        }

        let (start, end) = window.bounds().ok_or_else(|| {
            QueryError::WindowOutOfRange(format!(
                "{} {} x{}",
                window.anchor, window.unit, window.duration
            ))
        })?;
        let start = start.with_timezone(&Utc);
        let end = end.with_timezone(&Utc);
        let device_type = query.source().device_type();

        let points: Vec<&Measurement> = self
            .measurements
            .iter()
            .filter(|m| {
                m.account == query.account().key
                    && m.device_type == device_type
                    && m.timestamp >= start
                    && m.timestamp < end
            })
            .collect();

        debug!(
            account = %query.account().key,
            %device_type,
            %start,
            %end,
            points = points.len(),
            "executed in-memory query"
        );

        let mut response = DataQueryResponse::new();
        if points.is_empty() {
            return Ok(response);
        }

        let mut facade = SeriesFacade::new(points.len());
        for field in FIELDS {
            let values: Vec<f64> = points.iter().filter_map(|m| m.field(field)).collect();
            if values.is_empty() {
                continue;
            }
            for (metric, value) in aggregate(&values) {
                if query.wants(metric) {
                    facade.insert(field, metric, value);
                }
            }
        }
        response.insert(device_type, facade);
        Ok(response)
    }
}

/// All metrics over a non-empty slice.
fn aggregate(values: &[f64]) -> [(Metric, f64); 5] {
    let sum: f64 = values.iter().sum();
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let count = values.len() as f64;
    [
        (Metric::Count, count),
        (Metric::Sum, sum),
        (Metric::Min, min),
        (Metric::Max, max),
        (Metric::Average, sum / count),
    ]
}
