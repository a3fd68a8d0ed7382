//! Binding classification for translated commands.

use crate::command::{Command, ParameterSlot};
use crate::error::{Result, UpdraftError};

/// Shape of a command's parameter bindings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchShape {
    /// No vectorized slot; exactly one ordinary execution.
    Single,
    /// At least one vectorized slot; `rows` logical rows to batch.
    Bulk {
        /// Shared row count of all vectorized slots.
        rows: usize,
    },
}

impl BatchShape {
    /// Returns true if the command takes the batched path.
    #[must_use]
    pub fn is_bulk(&self) -> bool {
        matches!(self, BatchShape::Bulk { .. })
    }
}

/// Determines whether batching applies to a command.
///
/// All vectorized slots must share one row count and be flagged for
/// binding; either violation indicates the translator handed over a
/// malformed command, so the error is fatal rather than retryable.
///
/// # Errors
///
/// Returns `InvalidBatchShape` on mismatched row counts or an unbound
/// vectorized slot.
pub fn classify(command: &Command) -> Result<BatchShape> {
    let mut rows: Option<usize> = None;

    for (i, slot) in command.slots().iter().enumerate() {
        let ParameterSlot::Vectorized { values, bind } = slot else {
            continue;
        };

        if !*bind {
            return Err(UpdraftError::InvalidBatchShape(format!(
                "Vectorized slot {i} is not flagged for binding"
            )));
        }

        match rows {
            None => rows = Some(values.len()),
            Some(expected) if expected != values.len() => {
                return Err(UpdraftError::InvalidBatchShape(format!(
                    "Vectorized slot {i} has {} rows, expected {expected}",
                    values.len()
                )));
            }
            Some(_) => {}
        }
    }

    Ok(match rows {
        None => BatchShape::Single,
        Some(rows) => BatchShape::Bulk { rows },
    })
}
