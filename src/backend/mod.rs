//! Backend driver abstraction.
//!
//! The engine never talks SQL wire protocols itself; it drives a
//! caller-supplied connection through the [`BackendConnection`] and
//! [`PreparedBatch`] traits. Drivers report per-row batch results as tagged
//! [`Outcome`] values instead of raw sentinel integers, preserving the
//! three-way distinction (counted success, uncounted success, failure)
//! without magic numbers.

use thiserror::Error;

use crate::types::Value;

/// Result type for driver-level operations.
pub type BackendResult<T> = std::result::Result<T, BackendError>;

/// Per-row status reported by the backend for one batched execution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Row applied; the backend reported an exact affected-row count.
    Applied(u64),
    /// Row applied; the backend could not report a count.
    AppliedUnknown,
    /// Row rejected by the backend, with the per-row cause if supplied.
    Failed(Option<BackendError>),
}

impl Outcome {
    /// Returns true if this row failed.
    #[must_use]
    pub fn is_failed(&self) -> bool {
        matches!(self, Outcome::Failed(_))
    }

    /// Returns the exact affected-row count, if the backend reported one.
    #[must_use]
    pub fn affected_count(&self) -> Option<u64> {
        match self {
            Outcome::Applied(n) => Some(*n),
            _ => None,
        }
    }
}

/// Classification of a driver error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendErrorKind {
    /// Statement-level failure (constraint violation, bad SQL, lock
    /// timeout). The connection remains usable.
    Statement,
    /// Connection-level failure (dropped, reset, unreachable). Fatal for
    /// the whole call.
    Connection,
}

/// Error reported by a backend driver.
///
/// Carries the driver message plus the optional vendor code and SQLSTATE
/// most relational drivers expose.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct BackendError {
    message: String,
    code: Option<i32>,
    sqlstate: Option<String>,
    kind: BackendErrorKind,
}

impl BackendError {
    /// Creates a statement-level error with the given message.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        BackendError {
            message: message.into(),
            code: None,
            sqlstate: None,
            kind: BackendErrorKind::Statement,
        }
    }

    /// Creates a connection-level error with the given message.
    #[must_use]
    pub fn connection_lost(message: impl Into<String>) -> Self {
        BackendError {
            message: message.into(),
            code: None,
            sqlstate: None,
            kind: BackendErrorKind::Connection,
        }
    }

    /// Attaches a vendor error code.
    #[must_use]
    pub fn with_code(mut self, code: i32) -> Self {
        self.code = Some(code);
        self
    }

    /// Attaches a SQLSTATE.
    ///
    /// SQLSTATE class `08` (connection exceptions) reclassifies the error
    /// as connection-level.
    #[must_use]
    pub fn with_sqlstate(mut self, sqlstate: impl Into<String>) -> Self {
        let sqlstate = sqlstate.into();
        if sqlstate.starts_with("08") {
            self.kind = BackendErrorKind::Connection;
        }
        self.sqlstate = Some(sqlstate);
        self
    }

    /// Returns the driver message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the vendor error code, if any.
    #[must_use]
    pub fn code(&self) -> Option<i32> {
        self.code
    }

    /// Returns the SQLSTATE, if any.
    #[must_use]
    pub fn sqlstate(&self) -> Option<&str> {
        self.sqlstate.as_deref()
    }

    /// Returns the error classification.
    #[must_use]
    pub fn kind(&self) -> BackendErrorKind {
        self.kind
    }

    /// Returns true if this is a connection-level error.
    #[must_use]
    pub fn is_connection(&self) -> bool {
        self.kind == BackendErrorKind::Connection
    }
}

/// A live, already-open connection to a relational backend.
///
/// The connection's lifecycle (pooling, transactions, closing) belongs to
/// the caller; the engine only executes within it.
pub trait BackendConnection {
    /// Prepares `sql` for repeated parameterized execution.
    ///
    /// # Errors
    ///
    /// Returns a driver error if the statement cannot be prepared.
    fn prepare<'a>(&'a mut self, sql: &str) -> BackendResult<Box<dyn PreparedBatch + 'a>>;

    /// Executes a statement with no parameters directly, returning the
    /// affected-row count.
    ///
    /// # Errors
    ///
    /// Returns a driver error if execution fails.
    fn execute_direct(&mut self, sql: &str) -> BackendResult<u64>;
}

/// A prepared statement supporting batched parameter binding.
pub trait PreparedBatch {
    /// Binds one row of parameter values, in placeholder order, and queues
    /// it for batched execution.
    ///
    /// # Errors
    ///
    /// Returns a driver error if binding fails (e.g. type rejected).
    fn add_row(&mut self, row: &[Value]) -> BackendResult<()>;

    /// Submits all queued rows as one batched request, returning one
    /// status per row in queue order. Clears the queue.
    ///
    /// # Errors
    ///
    /// Returns a driver error if the whole batch aborted before producing
    /// per-row statuses.
    fn execute_batch(&mut self) -> BackendResult<Vec<Outcome>>;

    /// Executes once with the given single row of parameters, no batching.
    ///
    /// # Errors
    ///
    /// Returns a driver error if execution fails.
    fn execute_update(&mut self, row: &[Value]) -> BackendResult<u64>;
}
