//! Shared test backends.
//!
//! `MockConnection` is a scripted driver that records every call so tests can
//! assert exactly how the executor talked to it. `MemoryBackend` is a small
//! stateful backend with a unique key on the first column, used by the
//! end-to-end suites.

#![allow(dead_code)]

use std::collections::VecDeque;

use updraft::backend::BackendResult;
use updraft::{BackendConnection, BackendError, Outcome, PreparedBatch, Value};

// =============================================================================
// MockConnection: scripted driver with call recording
// =============================================================================

/// Scripted response for one `execute_batch` call.
pub enum BatchScript {
    /// Return these per-row outcomes.
    Statuses(Vec<Outcome>),
    /// Abort the whole chunk with this error.
    Abort(BackendError),
}

/// Records every call made through the connection and replays scripted
/// responses in order. Unscripted calls succeed with one row applied.
#[derive(Default)]
pub struct MockConnection {
    batch_scripts: VecDeque<BatchScript>,
    update_scripts: VecDeque<BackendResult<u64>>,
    direct_scripts: VecDeque<BackendResult<u64>>,
    prepare_error: Option<BackendError>,
    add_row_error: Option<BackendError>,
    pub prepared_sql: Vec<String>,
    pub direct_sql: Vec<String>,
    pub executed_chunks: Vec<Vec<Vec<Value>>>,
    pub executed_updates: Vec<Vec<Value>>,
}

impl MockConnection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_batch_outcomes(mut self, outcomes: Vec<Outcome>) -> Self {
        self.batch_scripts.push_back(BatchScript::Statuses(outcomes));
        self
    }

    pub fn with_batch_abort(mut self, error: BackendError) -> Self {
        self.batch_scripts.push_back(BatchScript::Abort(error));
        self
    }

    pub fn with_update_result(mut self, result: BackendResult<u64>) -> Self {
        self.update_scripts.push_back(result);
        self
    }

    pub fn with_direct_result(mut self, result: BackendResult<u64>) -> Self {
        self.direct_scripts.push_back(result);
        self
    }

    pub fn with_prepare_error(mut self, error: BackendError) -> Self {
        self.prepare_error = Some(error);
        self
    }

    pub fn with_add_row_error(mut self, error: BackendError) -> Self {
        self.add_row_error = Some(error);
        self
    }

    /// Number of rows bound in each executed chunk, in execution order.
    pub fn chunk_sizes(&self) -> Vec<usize> {
        self.executed_chunks.iter().map(Vec::len).collect()
    }

    pub fn batch_calls(&self) -> usize {
        self.executed_chunks.len()
    }

    pub fn update_calls(&self) -> usize {
        self.executed_updates.len()
    }

    pub fn direct_calls(&self) -> usize {
        self.direct_sql.len()
    }

    /// Total executions of any kind that reached the backend.
    pub fn total_backend_calls(&self) -> usize {
        self.batch_calls() + self.update_calls() + self.direct_calls()
    }

    /// All rows seen across every executed chunk, flattened in order.
    pub fn all_bound_rows(&self) -> Vec<Vec<Value>> {
        self.executed_chunks.iter().flatten().cloned().collect()
    }
}

struct MockBatch<'a> {
    conn: &'a mut MockConnection,
    queued: Vec<Vec<Value>>,
}

impl BackendConnection for MockConnection {
    fn prepare<'a>(&'a mut self, sql: &str) -> BackendResult<Box<dyn PreparedBatch + 'a>> {
        if let Some(err) = self.prepare_error.take() {
            return Err(err);
        }
        self.prepared_sql.push(sql.to_string());
        Ok(Box::new(MockBatch {
            conn: self,
            queued: Vec::new(),
        }))
    }

    fn execute_direct(&mut self, sql: &str) -> BackendResult<u64> {
        self.direct_sql.push(sql.to_string());
        self.direct_scripts.pop_front().unwrap_or(Ok(1))
    }
}

impl PreparedBatch for MockBatch<'_> {
    fn add_row(&mut self, row: &[Value]) -> BackendResult<()> {
        if let Some(err) = self.conn.add_row_error.take() {
            return Err(err);
        }
        self.queued.push(row.to_vec());
        Ok(())
    }

    fn execute_batch(&mut self) -> BackendResult<Vec<Outcome>> {
        let rows = std::mem::take(&mut self.queued);
        let queued = rows.len();
        self.conn.executed_chunks.push(rows);
        match self.conn.batch_scripts.pop_front() {
            Some(BatchScript::Statuses(outcomes)) => Ok(outcomes),
            Some(BatchScript::Abort(error)) => Err(error),
            None => Ok(vec![Outcome::Applied(1); queued]),
        }
    }

    fn execute_update(&mut self, row: &[Value]) -> BackendResult<u64> {
        self.conn.executed_updates.push(row.to_vec());
        self.conn.update_scripts.pop_front().unwrap_or(Ok(1))
    }
}

// =============================================================================
// MemoryBackend: stateful single-table backend
// =============================================================================

enum MemoryOp {
    Insert,
    Update,
    Delete,
}

fn classify_sql(sql: &str) -> BackendResult<MemoryOp> {
    let head = sql.trim_start().get(..6).unwrap_or("").to_ascii_uppercase();
    match head.as_str() {
        "INSERT" => Ok(MemoryOp::Insert),
        "UPDATE" => Ok(MemoryOp::Update),
        "DELETE" => Ok(MemoryOp::Delete),
        _ => Err(BackendError::new(format!("Unsupported statement: {sql}"))),
    }
}

/// In-memory table with a unique key on the first column.
///
/// INSERT binds a full row and rejects duplicate keys with SQLSTATE 23505.
/// UPDATE binds `[new value, key]` and rewrites the second column of matching
/// rows. DELETE binds `[key]` and removes matching rows.
#[derive(Default)]
pub struct MemoryBackend {
    pub rows: Vec<Vec<Value>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_rows(rows: Vec<Vec<Value>>) -> Self {
        Self { rows }
    }

    pub fn key_exists(&self, key: &Value) -> bool {
        self.rows.iter().any(|row| row.first() == Some(key))
    }

    pub fn row_for_key(&self, key: &Value) -> Option<&Vec<Value>> {
        self.rows.iter().find(|row| row.first() == Some(key))
    }

    fn apply(&mut self, op: &MemoryOp, params: &[Value]) -> Outcome {
        match op {
            MemoryOp::Insert => {
                let Some(key) = params.first() else {
                    return Outcome::Failed(Some(BackendError::new(
                        "INSERT requires at least one parameter",
                    )));
                };
                if self.key_exists(key) {
                    return Outcome::Failed(Some(
                        BackendError::new(format!("Duplicate key: {key:?}"))
                            .with_sqlstate("23505"),
                    ));
                }
                self.rows.push(params.to_vec());
                Outcome::Applied(1)
            }
            MemoryOp::Update => {
                let (Some(new_value), Some(key)) = (params.first(), params.get(1)) else {
                    return Outcome::Failed(Some(BackendError::new(
                        "UPDATE requires two parameters",
                    )));
                };
                let mut matched = 0u64;
                for row in &mut self.rows {
                    if row.first() == Some(key) {
                        if let Some(cell) = row.get_mut(1) {
                            *cell = new_value.clone();
                        }
                        matched += 1;
                    }
                }
                Outcome::Applied(matched)
            }
            MemoryOp::Delete => {
                let Some(key) = params.first() else {
                    return Outcome::Failed(Some(BackendError::new(
                        "DELETE requires one parameter",
                    )));
                };
                let before = self.rows.len();
                self.rows.retain(|row| row.first() != Some(key));
                Outcome::Applied((before - self.rows.len()) as u64)
            }
        }
    }
}

struct MemoryBatch<'a> {
    backend: &'a mut MemoryBackend,
    op: MemoryOp,
    queued: Vec<Vec<Value>>,
}

impl BackendConnection for MemoryBackend {
    fn prepare<'a>(&'a mut self, sql: &str) -> BackendResult<Box<dyn PreparedBatch + 'a>> {
        let op = classify_sql(sql)?;
        Ok(Box::new(MemoryBatch {
            backend: self,
            op,
            queued: Vec::new(),
        }))
    }

    fn execute_direct(&mut self, sql: &str) -> BackendResult<u64> {
        match classify_sql(sql)? {
            MemoryOp::Delete => {
                let removed = self.rows.len() as u64;
                self.rows.clear();
                Ok(removed)
            }
            _ => Err(BackendError::new(
                "Only DELETE is supported without parameters",
            )),
        }
    }
}

impl PreparedBatch for MemoryBatch<'_> {
    fn add_row(&mut self, row: &[Value]) -> BackendResult<()> {
        self.queued.push(row.to_vec());
        Ok(())
    }

    fn execute_batch(&mut self) -> BackendResult<Vec<Outcome>> {
        let rows = std::mem::take(&mut self.queued);
        Ok(rows
            .iter()
            .map(|row| self.backend.apply(&self.op, row))
            .collect())
    }

    fn execute_update(&mut self, row: &[Value]) -> BackendResult<u64> {
        match self.backend.apply(&self.op, row) {
            Outcome::Applied(count) => Ok(count),
            Outcome::AppliedUnknown => Ok(0),
            Outcome::Failed(cause) => {
                Err(cause.unwrap_or_else(|| BackendError::new("Row rejected")))
            }
        }
    }
}
