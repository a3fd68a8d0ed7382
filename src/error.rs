//! Error types for updraft execution operations.

use std::fmt;

use thiserror::Error;

use crate::backend::BackendError;

/// Result type alias using [`UpdraftError`].
pub type Result<T> = std::result::Result<T, UpdraftError>;

/// Error types for updraft execution operations.
#[derive(Debug, Error)]
pub enum UpdraftError {
    // ==================== Precondition Errors ====================
    /// Vectorized parameter slots with mismatched row counts, or a
    /// vectorized slot not flagged for binding. Signals a translator bug
    /// upstream; never retried.
    #[error("Invalid batch shape: {0}")]
    InvalidBatchShape(String),

    /// Malformed command (placeholder/slot count mismatch, empty statement).
    #[error("Invalid command: {0}")]
    InvalidCommand(String),

    /// Target table or column absent from the schema catalog, or the target
    /// is not updatable.
    #[error("Unknown target: {0}")]
    UnknownTarget(String),

    // ==================== Batch Execution Errors ====================
    /// Backend-level failure during chunk submission (connection dropped,
    /// driver protocol violation). Carries the affected-row count
    /// accumulated before the failing chunk.
    #[error("Execution failed in chunk {chunk} ({total_affected} rows affected before failure): {cause}")]
    ExecutionFailed {
        chunk: usize,
        total_affected: u64,
        cause: BackendError,
    },

    /// One or more rows failed at the backend. Per-row causes and indices
    /// are carried so the caller can decide row-level remediation.
    #[error("Batch execution failed: {0}")]
    BatchFailed(BatchFailure),

    /// Cooperative cancellation between chunks. Earlier chunks may already
    /// be applied; the accumulated count is reported, never hidden.
    #[error("Execution cancelled after {rows_attempted} rows ({total_affected} rows affected)")]
    Cancelled {
        total_affected: u64,
        rows_attempted: usize,
    },

    /// Driver error outside chunk submission (prepare or bind failure).
    #[error("Backend error: {0}")]
    Backend(BackendError),

    // ==================== Catalog & Config Errors ====================
    /// Schema definition errors (empty columns, duplicate names, bad keys).
    #[error("Schema error: {0}")]
    SchemaError(String),

    /// Invalid executor configuration.
    #[error("Config error: {0}")]
    Config(String),

    /// Catalog snapshot encode/decode/validation failure.
    #[error("Snapshot error: {0}")]
    Snapshot(String),
}

/// Structured payload for a batch in which some rows failed.
///
/// Row indices refer to the original logical row sequence, so index `i`
/// always names the i-th input row regardless of chunking.
#[derive(Debug, Clone)]
pub struct BatchFailure {
    /// Sum of affected-row counts from rows that applied.
    pub total_affected: u64,
    /// Failed rows in ascending index order.
    pub failed: Vec<RowFailure>,
    /// Number of rows actually submitted to the backend.
    pub rows_attempted: usize,
    /// Total logical row count of the command.
    pub row_count: usize,
}

impl BatchFailure {
    /// Returns the indices of all failed rows, in ascending order.
    #[must_use]
    pub fn failed_indices(&self) -> Vec<usize> {
        self.failed.iter().map(|f| f.index).collect()
    }
}

impl fmt::Display for BatchFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} of {} rows failed ({} rows affected, {} attempted)",
            self.failed.len(),
            self.row_count,
            self.total_affected,
            self.rows_attempted
        )
    }
}

/// A single failed row within a batch.
#[derive(Debug, Clone)]
pub struct RowFailure {
    /// Index of the row in the original row sequence (0-based).
    pub index: usize,
    /// Per-row cause, if the driver supplied one.
    pub cause: Option<BackendError>,
}
