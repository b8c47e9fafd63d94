//! Sink trait and error types
//!
//! This module defines the interface the strategies persist parsed records
//! through, and the errors a sink can report.

use crate::crawler::ParsedRecord;
use crate::strategy::StrategyKind;
use thiserror::Error;

/// Errors that can occur during sink operations
#[derive(Debug, Error)]
pub enum SinkError {
    #[error("Failed to write record: {0}")]
    Write(String),

    #[error("Invalid db uri: {0}")]
    InvalidUri(String),

    #[error("Sink lock poisoned: {0}")]
    Lock(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

/// Result type for sink operations
pub type SinkResult<T> = Result<T, SinkError>;

/// Persistence target for parsed records
///
/// Implementations are shared between pool workers and event-loop tasks, so
/// they must be thread-safe and do their own locking. Writes carry no
/// ordering guarantee and no batch transactionality; callers treat a failed
/// write as non-fatal.
pub trait RecordSink: Send + Sync {
    /// Stores one record produced by `strategy`
    fn write(&self, record: &ParsedRecord, strategy: StrategyKind) -> SinkResult<()>;

    /// Removes every stored record
    fn clear(&self) -> SinkResult<()>;

    /// Total number of stored records
    fn count(&self) -> SinkResult<u64>;

    /// Stored record counts keyed by strategy name, sorted by name
    fn count_by_strategy(&self) -> SinkResult<Vec<(String, u64)>>;
}
