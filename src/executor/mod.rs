//! Executor module for batched update execution.
//!
//! This module implements the batched execution pipeline: classification
//! of parameter bindings, lazy row expansion, chunked submission, and
//! reconciliation of per-row outcomes into one aggregate result.

mod classify;
mod expand;
mod reconcile;
mod submit;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tracing::debug;
use uuid::Uuid;

use crate::backend::BackendConnection;
use crate::catalog::{validate_command, Catalog};
use crate::command::Command;
use crate::error::{Result, UpdraftError};

pub use classify::{classify, BatchShape};
pub use expand::RowExpander;
pub use reconcile::{BatchResult, Reconciler};

/// Default maximum number of rows submitted per batch chunk.
pub const DEFAULT_MAX_BATCH_SIZE: usize = 2048;

/// Configuration for the update executor.
#[derive(Debug, Clone)]
pub struct ExecutorConfig {
    /// Maximum number of rows per batch chunk (must be at least 1).
    pub max_batch_size: usize,
    /// Stop submitting further chunks after the first failed chunk or
    /// row-level failure.
    pub fail_fast: bool,
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        Self {
            max_batch_size: DEFAULT_MAX_BATCH_SIZE,
            fail_fast: true,
        }
    }
}

impl ExecutorConfig {
    /// Creates a new executor configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the maximum chunk size.
    #[must_use]
    pub fn with_max_batch_size(mut self, max_batch_size: usize) -> Self {
        self.max_batch_size = max_batch_size;
        self
    }

    /// Sets the failure policy.
    #[must_use]
    pub fn with_fail_fast(mut self, fail_fast: bool) -> Self {
        self.fail_fast = fail_fast;
        self
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if `max_batch_size` is zero.
    pub fn validate(&self) -> Result<()> {
        if self.max_batch_size == 0 {
            return Err(UpdraftError::Config(
                "max_batch_size must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

/// Per-call identity and cooperative cancellation.
///
/// Cloning shares the cancellation flag, so a handle kept by the caller can
/// cancel an execution running with another clone.
#[derive(Debug, Clone)]
pub struct ExecutionContext {
    execution_id: Uuid,
    cancelled: Arc<AtomicBool>,
}

impl ExecutionContext {
    /// Creates a context with a fresh execution id.
    #[must_use]
    pub fn new() -> Self {
        ExecutionContext {
            execution_id: Uuid::new_v4(),
            cancelled: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Returns the execution id used in log events.
    #[must_use]
    pub fn execution_id(&self) -> Uuid {
        self.execution_id
    }

    /// Requests cancellation; takes effect between chunks. A chunk already
    /// in flight cannot be aborted.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }

    /// Returns true if cancellation has been requested.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }
}

impl Default for ExecutionContext {
    fn default() -> Self {
        Self::new()
    }
}

/// Executor for data-modification commands with batched bindings.
///
/// Holds configuration only. All per-call state (rows, chunks, outcomes)
/// is created per invocation, so one executor is safely reused across
/// calls and callers.
#[derive(Debug, Clone, Default)]
pub struct UpdateExecutor {
    config: ExecutorConfig,
}

impl UpdateExecutor {
    /// Creates an executor with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn new(config: ExecutorConfig) -> Result<Self> {
        config.validate()?;
        Ok(UpdateExecutor { config })
    }

    /// Returns the executor configuration.
    #[must_use]
    pub fn config(&self) -> &ExecutorConfig {
        &self.config
    }

    /// Returns the configured maximum chunk size.
    #[must_use]
    pub fn max_batch_size(&self) -> usize {
        self.config.max_batch_size
    }

    /// Executes a command against the given connection, batching if any
    /// parameter slot is vectorized.
    ///
    /// # Errors
    ///
    /// Returns an error if schema validation or binding classification
    /// rejects the command, or if the backend reports failures.
    pub fn execute_batched(
        &self,
        conn: &mut dyn BackendConnection,
        catalog: &Catalog,
        command: &Command,
    ) -> Result<BatchResult> {
        self.execute_batched_with_context(&ExecutionContext::new(), conn, catalog, command)
    }

    /// Executes a command under a caller-supplied context, allowing the
    /// caller to cancel between chunks and correlate log events.
    ///
    /// # Errors
    ///
    /// Returns an error if schema validation or binding classification
    /// rejects the command, if the backend reports failures, or if the
    /// context is cancelled mid-execution.
    pub fn execute_batched_with_context(
        &self,
        ctx: &ExecutionContext,
        conn: &mut dyn BackendConnection,
        catalog: &Catalog,
        command: &Command,
    ) -> Result<BatchResult> {
        validate_command(catalog, command)?;
        let shape = classify(command)?;
        debug!(
            execution_id = %ctx.execution_id(),
            kind = command.kind().name(),
            target = command.target(),
            bulk = shape.is_bulk(),
            "Classified command"
        );
        match shape {
            BatchShape::Single => submit::submit_single(conn, ctx, command),
            BatchShape::Bulk { rows } => submit::submit_bulk(conn, ctx, command, rows, &self.config),
        }
    }
}
