//! The aggregation-query collaborator.

use crate::builder::DataQuery;
use crate::result::DataQueryResponse;

// ---------------------------------------------------------------------------
// Error
// ---------------------------------------------------------------------------

/// Errors raised while building or executing a query.
#[derive(Debug, thiserror::Error)]
pub enum QueryError {
    /// The query is missing a required part or is otherwise malformed.
    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    /// The window bounds could not be computed.
    #[error("Window out of range: {0}")]
    WindowOutOfRange(String),

    /// The backing store could not be reached.
    #[error("Data service unavailable: {0}")]
    Unavailable(String),

    /// The backing store failed while executing the query.
    #[error("Query execution failed: {0}")]
    Execution(String),

    /// Stored measurement data could not be decoded.
    #[error("Malformed measurement data: {0}")]
    Malformed(String),
}

// ---------------------------------------------------------------------------
// Service
// ---------------------------------------------------------------------------

/// Executes aggregation queries against a measurement store.
///
/// Implementations block until the query completes; timeouts and
/// cancellation are their own concern.
pub trait DataService: Send + Sync {
    fn execute(&self, query: &DataQuery) -> Result<DataQueryResponse, QueryError>;
}

impl<T: DataService + ?Sized> DataService for &T {
    fn execute(&self, query: &DataQuery) -> Result<DataQueryResponse, QueryError> {
        (**self).execute(query)
    }
}

impl<T: DataService + ?Sized> DataService for std::sync::Arc<T> {
    fn execute(&self, query: &DataQuery) -> Result<DataQueryResponse, QueryError> {
        (**self).execute(query)
    }
}
