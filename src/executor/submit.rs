//! Chunked submission of parameter rows to the backend.

use tracing::{debug, warn};

use crate::backend::{BackendConnection, BackendError};
use crate::command::Command;
use crate::error::{Result, UpdraftError};
use crate::executor::expand::RowExpander;
use crate::executor::reconcile::{BatchResult, Reconciler};
use crate::executor::{ExecutionContext, ExecutorConfig};
use crate::types::Value;

/// Executes a command with no vectorized slots as one ordinary statement.
pub(crate) fn submit_single(
    conn: &mut dyn BackendConnection,
    ctx: &ExecutionContext,
    command: &Command,
) -> Result<BatchResult> {
    if command.slots().is_empty() {
        debug!(
            execution_id = %ctx.execution_id(),
            target = command.target(),
            "Executing direct statement"
        );
        let affected = conn
            .execute_direct(command.text())
            .map_err(UpdraftError::Backend)?;
        return Ok(BatchResult::single(affected));
    }

    let row: Vec<Value> = command
        .slots()
        .iter()
        .map(|slot| slot.value_at(0).clone())
        .collect();
    debug!(
        execution_id = %ctx.execution_id(),
        target = command.target(),
        params = row.len(),
        "Executing prepared statement"
    );
    let mut stmt = conn
        .prepare(command.text())
        .map_err(UpdraftError::Backend)?;
    let affected = stmt.execute_update(&row).map_err(UpdraftError::Backend)?;
    Ok(BatchResult::single(affected))
}

/// Submits `rows` expanded parameter rows in chunks of at most
/// `max_batch_size`, strictly in order, folding each chunk's status array
/// into the reconciler as it arrives.
pub(crate) fn submit_bulk(
    conn: &mut dyn BackendConnection,
    ctx: &ExecutionContext,
    command: &Command,
    rows: usize,
    config: &ExecutorConfig,
) -> Result<BatchResult> {
    let mut reconciler = Reconciler::new();

    // Zero logical rows: succeed without touching the backend
    if rows == 0 {
        return reconciler.finish(0);
    }

    let mut batch = conn
        .prepare(command.text())
        .map_err(UpdraftError::Backend)?;
    let mut expander = RowExpander::new(command, rows);
    let mut chunk = 0_usize;

    loop {
        if ctx.is_cancelled() {
            warn!(
                execution_id = %ctx.execution_id(),
                total_affected = reconciler.total_affected(),
                rows_attempted = reconciler.rows_attempted(),
                "Cancelled between chunks"
            );
            return Err(UpdraftError::Cancelled {
                total_affected: reconciler.total_affected(),
                rows_attempted: reconciler.rows_attempted(),
            });
        }

        let mut queued = 0_usize;
        while queued < config.max_batch_size {
            let Some(row) = expander.next() else { break };
            batch.add_row(&row).map_err(UpdraftError::Backend)?;
            queued += 1;
        }
        if queued == 0 {
            break;
        }

        debug!(
            execution_id = %ctx.execution_id(),
            chunk,
            rows = queued,
            "Submitting batch chunk"
        );

        match batch.execute_batch() {
            Ok(outcomes) => {
                if outcomes.len() != queued {
                    return Err(UpdraftError::ExecutionFailed {
                        chunk,
                        total_affected: reconciler.total_affected(),
                        cause: BackendError::new(format!(
                            "Driver returned {} statuses for {queued} submitted rows",
                            outcomes.len()
                        )),
                    });
                }
                let failures = outcomes.iter().filter(|o| o.is_failed()).count();
                reconciler.absorb_chunk(outcomes);
                if failures > 0 {
                    warn!(
                        execution_id = %ctx.execution_id(),
                        chunk,
                        failures,
                        "Chunk reported row-level failures"
                    );
                    if config.fail_fast {
                        break;
                    }
                }
            }
            Err(err) if err.is_connection() => {
                // Connection gone: remaining chunks are unreachable
                return Err(UpdraftError::ExecutionFailed {
                    chunk,
                    total_affected: reconciler.total_affected(),
                    cause: err,
                });
            }
            Err(err) => {
                warn!(
                    execution_id = %ctx.execution_id(),
                    chunk,
                    error = %err,
                    "Batch chunk aborted"
                );
                reconciler.absorb_failed_chunk(queued, &err);
                if config.fail_fast {
                    break;
                }
            }
        }

        chunk += 1;
    }

    reconciler.finish(rows)
}
