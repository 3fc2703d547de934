//! Store error types for libris-db.

use thiserror::Error;

/// Errors from store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A SQL query failed.
    #[error("Query failed: {0}")]
    Query(String),

    /// Schema migration failed.
    #[error("Migration failed: {0}")]
    Migration(String),

    /// Expected a result row but none was returned.
    #[error("No result returned")]
    NoResult,

    /// A compare-and-swap update matched no row: a concurrent writer moved
    /// the record first.
    #[error("Concurrent update lost: {0}")]
    Conflict(String),

    /// Another mutation for the same request is still running.
    #[error("Operation already in flight for {0}")]
    OperationInFlight(String),

    /// The lifecycle engine refused the action.
    #[error(transparent)]
    Lifecycle(#[from] libris_core::errors::LifecycleError),

    /// Underlying libSQL error.
    #[error("libSQL error: {0}")]
    LibSql(#[from] libsql::Error),

    /// Catch-all for unexpected errors.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
