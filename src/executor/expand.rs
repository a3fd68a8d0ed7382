//! Lazy expansion of parameter slots into per-row parameter sets.

use crate::command::{Command, ParameterSlot};
use crate::types::Value;

/// Iterator producing one parameter row per logical row.
///
/// Each yielded row holds the i-th value of every vectorized slot and the
/// single value of every scalar slot, in slot order. Rows are materialized
/// one at a time, so memory stays bounded by the chunk size downstream, not
/// by the total row count.
pub struct RowExpander<'a> {
    slots: &'a [ParameterSlot],
    rows: usize,
    next: usize,
}

impl<'a> RowExpander<'a> {
    /// Creates an expander over `rows` logical rows of a command.
    #[must_use]
    pub fn new(command: &'a Command, rows: usize) -> Self {
        RowExpander {
            slots: command.slots(),
            rows,
            next: 0,
        }
    }
}

impl Iterator for RowExpander<'_> {
    type Item = Vec<Value>;

    fn next(&mut self) -> Option<Vec<Value>> {
        if self.next >= self.rows {
            return None;
        }
        let i = self.next;
        self.next += 1;
        Some(self.slots.iter().map(|s| s.value_at(i).clone()).collect())
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.rows - self.next;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for RowExpander<'_> {}
