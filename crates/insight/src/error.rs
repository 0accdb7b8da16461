use rill_query::QueryError;

/// Errors raised while resolving insights.
#[derive(Debug, thiserror::Error)]
pub enum InsightError {
    /// The aggregation service failed; the run for this account stops here.
    #[error("Query failed: {0}")]
    Query(#[from] QueryError),

    #[error("Invalid parameters: {0}")]
    InvalidParameters(String),
}
