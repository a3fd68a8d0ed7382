//! Translated command model.
//!
//! A [`Command`] is the unit of work handed to the engine by the SQL
//! translator: dialect-rendered statement text with positional `?`
//! placeholders, the logical target (table and columns) for schema
//! validation, and one [`ParameterSlot`] per placeholder. Commands are
//! immutable once constructed.

use crate::error::{Result, UpdraftError};
use crate::types::Value;

/// Kind of data-modification command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandKind {
    /// INSERT statement.
    Insert,
    /// UPDATE statement.
    Update,
    /// DELETE statement.
    Delete,
}

impl CommandKind {
    /// Returns the SQL keyword for this kind.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            CommandKind::Insert => "INSERT",
            CommandKind::Update => "UPDATE",
            CommandKind::Delete => "DELETE",
        }
    }
}

/// One positional parameter of a command.
///
/// A scalar slot holds a single value; a vectorized slot holds one value
/// per logical row plus the translator's bind flag. Multi-valued slots must
/// be flagged for binding; inlining a value sequence into statement text
/// is not expressible here.
#[derive(Debug, Clone)]
pub enum ParameterSlot {
    /// One value, shared by every expanded row.
    Scalar(Value),
    /// An ordered value sequence, one entry per logical row.
    Vectorized {
        /// Row values in logical row order.
        values: Vec<Value>,
        /// True if the translator marked this slot for binding.
        bind: bool,
    },
}

impl ParameterSlot {
    /// Creates a scalar slot.
    #[must_use]
    pub fn scalar(value: Value) -> Self {
        ParameterSlot::Scalar(value)
    }

    /// Creates a vectorized slot flagged for binding.
    #[must_use]
    pub fn vectorized(values: Vec<Value>) -> Self {
        ParameterSlot::Vectorized { values, bind: true }
    }

    /// Returns true if this slot is vectorized.
    #[must_use]
    pub fn is_vectorized(&self) -> bool {
        matches!(self, ParameterSlot::Vectorized { .. })
    }

    /// Returns the row count for a vectorized slot, None for scalar.
    #[must_use]
    pub fn row_count(&self) -> Option<usize> {
        match self {
            ParameterSlot::Scalar(_) => None,
            ParameterSlot::Vectorized { values, .. } => Some(values.len()),
        }
    }

    /// Returns this slot's value for the i-th logical row.
    ///
    /// Scalar slots return their single value for every row.
    ///
    /// # Panics
    ///
    /// Panics if `i` is out of range for a vectorized slot; the classifier
    /// establishes the shared row count before expansion.
    #[must_use]
    pub fn value_at(&self, i: usize) -> &Value {
        match self {
            ParameterSlot::Scalar(value) => value,
            ParameterSlot::Vectorized { values, .. } => &values[i],
        }
    }
}

/// An immutable, dialect-translated data-modification command.
#[derive(Debug, Clone)]
pub struct Command {
    kind: CommandKind,
    target: String,
    columns: Vec<String>,
    text: String,
    slots: Vec<ParameterSlot>,
}

impl Command {
    /// Creates a command, validating its basic shape.
    ///
    /// # Errors
    ///
    /// Returns `InvalidCommand` if the statement text or target table name
    /// is empty, or if the slot count does not match the number of
    /// positional placeholders in the text.
    pub fn new(
        kind: CommandKind,
        target: String,
        columns: Vec<String>,
        text: String,
        slots: Vec<ParameterSlot>,
    ) -> Result<Self> {
        if text.trim().is_empty() {
            return Err(UpdraftError::InvalidCommand(
                "Statement text cannot be empty".into(),
            ));
        }
        if target.is_empty() {
            return Err(UpdraftError::InvalidCommand(
                "Target table name cannot be empty".into(),
            ));
        }

        let placeholders = count_placeholders(&text);
        if placeholders != slots.len() {
            return Err(UpdraftError::InvalidCommand(format!(
                "Statement has {} placeholder(s) but {} parameter slot(s) were supplied",
                placeholders,
                slots.len()
            )));
        }

        Ok(Command {
            kind,
            target,
            columns,
            text,
            slots,
        })
    }

    /// Returns the command kind.
    #[must_use]
    pub fn kind(&self) -> CommandKind {
        self.kind
    }

    /// Returns the logical target table name.
    #[must_use]
    pub fn target(&self) -> &str {
        &self.target
    }

    /// Returns the logical target column names.
    #[must_use]
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Returns the dialect-rendered statement text.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Returns the parameter slots in placeholder order.
    #[must_use]
    pub fn slots(&self) -> &[ParameterSlot] {
        &self.slots
    }
}

/// Counts positional placeholders outside quoted literals and identifiers.
///
/// Handles single-quoted strings with `''` escapes and double-quoted
/// identifiers, which is as much SQL lexing as translator output requires.
fn count_placeholders(text: &str) -> usize {
    let mut count = 0;
    let mut in_string = false;
    let mut in_ident = false;
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        if in_string {
            if c == '\'' {
                if chars.peek() == Some(&'\'') {
                    chars.next();
                } else {
                    in_string = false;
                }
            }
        } else if in_ident {
            if c == '"' {
                in_ident = false;
            }
        } else {
            match c {
                '\'' => in_string = true,
                '"' => in_ident = true,
                '?' => count += 1,
                _ => {}
            }
        }
    }

    count
}
