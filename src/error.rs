use thiserror::Error;

/// Errors from the ingestion and query paths.
///
/// Ingestion errors are fatal to the current run: the driver stops at the
/// offending record and batches flushed before the failure stay committed.
#[derive(Debug, Error)]
pub enum EventError {
    /// Timestamp matched neither the strict nor the permissive parse.
    #[error("malformed timestamp: {0:?}")]
    MalformedTimestamp(String),

    /// Input line did not split into the four expected fields.
    #[error("malformed record on line {line}: expected customer_id,event_type,transaction_id,timestamp")]
    MalformedRecord { line: u64 },

    #[error("storage unavailable: {0}")]
    Storage(#[from] sqlx::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
