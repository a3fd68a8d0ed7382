//! Reconciliation of per-row outcomes into one aggregate result.

use crate::backend::{BackendError, Outcome};
use crate::error::{BatchFailure, Result, RowFailure, UpdraftError};

/// Aggregate result of one successful execution call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchResult {
    /// Sum of all exact affected-row counts.
    pub total_affected: u64,
    /// Indices of rows whose affected count the backend did not report.
    /// When non-empty, `total_affected` is a lower bound.
    pub unknown_count_rows: Vec<usize>,
    /// Number of logical rows executed.
    pub rows: usize,
    /// Number of chunk submissions issued.
    pub chunks: usize,
}

impl BatchResult {
    /// Result of a pass-through execution of one logical row.
    #[must_use]
    pub fn single(affected: u64) -> Self {
        BatchResult {
            total_affected: affected,
            unknown_count_rows: Vec::new(),
            rows: 1,
            chunks: 1,
        }
    }

    /// Returns true if any row's count is unreported.
    #[must_use]
    pub fn has_unknown_counts(&self) -> bool {
        !self.unknown_count_rows.is_empty()
    }
}

/// Incremental fold of chunk status arrays, in original row order.
///
/// One reconciler lives for one execution call; chunk status arrays are
/// absorbed as they arrive and folded into running aggregates, so the full
/// outcome sequence is never materialized.
#[derive(Debug, Default)]
pub struct Reconciler {
    total_affected: u64,
    unknown_count_rows: Vec<usize>,
    failed: Vec<RowFailure>,
    next_index: usize,
    chunks: usize,
}

impl Reconciler {
    /// Creates an empty reconciler.
    #[must_use]
    pub fn new() -> Self {
        Reconciler::default()
    }

    /// Absorbs one chunk's status array.
    ///
    /// Outcomes are assigned ascending row indices continuing from the
    /// previous chunk, which is what keeps reported indices aligned with
    /// the caller's logical rows.
    pub fn absorb_chunk(&mut self, outcomes: Vec<Outcome>) {
        for outcome in outcomes {
            let index = self.next_index;
            self.next_index += 1;
            match outcome {
                Outcome::Applied(count) => self.total_affected += count,
                Outcome::AppliedUnknown => self.unknown_count_rows.push(index),
                Outcome::Failed(cause) => self.failed.push(RowFailure { index, cause }),
            }
        }
        self.chunks += 1;
    }

    /// Absorbs a chunk that aborted before producing per-row statuses:
    /// every row in it is failed with the shared batch-level cause.
    pub fn absorb_failed_chunk(&mut self, rows: usize, cause: &BackendError) {
        for _ in 0..rows {
            let index = self.next_index;
            self.next_index += 1;
            self.failed.push(RowFailure {
                index,
                cause: Some(cause.clone()),
            });
        }
        self.chunks += 1;
    }

    /// Returns the affected-row count accumulated so far.
    #[must_use]
    pub fn total_affected(&self) -> u64 {
        self.total_affected
    }

    /// Returns how many rows have been absorbed so far.
    #[must_use]
    pub fn rows_attempted(&self) -> usize {
        self.next_index
    }

    /// Returns how many chunks have been absorbed so far.
    #[must_use]
    pub fn chunks(&self) -> usize {
        self.chunks
    }

    /// Returns true if any absorbed row failed.
    #[must_use]
    pub fn has_failures(&self) -> bool {
        !self.failed.is_empty()
    }

    /// Finalizes the fold for a command of `row_count` logical rows.
    ///
    /// # Errors
    ///
    /// Returns `BatchFailed` carrying the failed indices, per-row causes,
    /// and the affected count accumulated from rows that applied.
    pub fn finish(self, row_count: usize) -> Result<BatchResult> {
        if self.failed.is_empty() {
            Ok(BatchResult {
                total_affected: self.total_affected,
                unknown_count_rows: self.unknown_count_rows,
                rows: row_count,
                chunks: self.chunks,
            })
        } else {
            Err(UpdraftError::BatchFailed(BatchFailure {
                total_affected: self.total_affected,
                failed: self.failed,
                rows_attempted: self.next_index,
                row_count,
            }))
        }
    }
}
