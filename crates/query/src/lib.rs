//! Aggregation-query model for per-account water consumption series.
//!
//! A [`DataQueryBuilder`] collects the parts of a query that do not change
//! between windows (timezone, account, data source, metrics) into a
//! [`QueryBase`]. The base then stamps out one immutable [`DataQuery`] per
//! sliding window, which a [`DataService`] executes into a
//! [`DataQueryResponse`].

pub mod builder;
pub mod memory;
pub mod model;
pub mod result;
pub mod service;

pub use builder::{DataQuery, DataQueryBuilder, QueryBase};
pub use memory::{InMemoryDataService, Measurement};
pub use model::{
    AccountSelector, DataField, MeasurementDataSource, Metric, SlidingWindow, TimeAggregation,
};
pub use result::{DataQueryResponse, SeriesFacade};
pub use service::{DataService, QueryError};
