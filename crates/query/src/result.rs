use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use rill_core::DeviceType;

use crate::model::{DataField, Metric};

/// Aggregated values for one device type over one window.
///
/// A missing `(field, metric)` entry means "no data", which is distinct
/// from a present value of `0.0`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SeriesFacade {
    /// Number of raw points that fell into the window.
    pub population: usize,
    values: BTreeMap<DataField, BTreeMap<Metric, f64>>,
}

impl SeriesFacade {
    pub fn new(population: usize) -> Self {
        Self {
            population,
            values: BTreeMap::new(),
        }
    }

    /// Look up an aggregate. `None` when the window had no such value.
    pub fn get(&self, field: DataField, metric: Metric) -> Option<f64> {
        self.values.get(&field)?.get(&metric).copied()
    }

    pub fn insert(&mut self, field: DataField, metric: Metric, value: f64) {
        self.values.entry(field).or_default().insert(metric, value);
    }

    /// Builder-style [`SeriesFacade::insert`].
    pub fn with(mut self, field: DataField, metric: Metric, value: f64) -> Self {
        self.insert(field, metric, value);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Result of executing a [`DataQuery`](crate::DataQuery).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DataQueryResponse {
    facades: BTreeMap<DeviceType, SeriesFacade>,
}

impl DataQueryResponse {
    pub fn new() -> Self {
        Self::default()
    }

    /// Response carrying a single facade.
    pub fn single(device_type: DeviceType, facade: SeriesFacade) -> Self {
        let mut response = Self::new();
        response.insert(device_type, facade);
        response
    }

    pub fn insert(&mut self, device_type: DeviceType, facade: SeriesFacade) {
        self.facades.insert(device_type, facade);
    }

    /// Per-device-type view. `None` when the query produced nothing for it.
    pub fn facade(&self, device_type: DeviceType) -> Option<&SeriesFacade> {
        self.facades.get(&device_type)
    }

    pub fn is_empty(&self) -> bool {
        self.facades.is_empty()
    }
}
