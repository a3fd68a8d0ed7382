//! Schema validation for incoming commands.
//!
//! A thin read-only adapter consulted before execution: it confirms the
//! command's target table and columns still exist in the catalog and that
//! the target accepts data-modification commands. Rejections happen here,
//! before any statement reaches the backend.

use crate::catalog::Catalog;
use crate::command::Command;
use crate::error::{Result, UpdraftError};

/// Validates a command's target against the catalog.
///
/// # Errors
///
/// Returns `UnknownTarget` if the target table does not exist, is not
/// updatable, or names a column the table does not have.
pub fn validate_command(catalog: &Catalog, command: &Command) -> Result<()> {
    let Some(table) = catalog.get_table(command.target()) else {
        return Err(UpdraftError::UnknownTarget(format!(
            "Table '{}' not found in schema",
            command.target()
        )));
    };

    if !table.is_updatable() {
        return Err(UpdraftError::UnknownTarget(format!(
            "Table '{}' is not updatable",
            command.target()
        )));
    }

    for column in command.columns() {
        if table.get_column(column).is_none() {
            return Err(UpdraftError::UnknownTarget(format!(
                "Column '{column}' not found on table '{}'",
                command.target()
            )));
        }
    }

    Ok(())
}
