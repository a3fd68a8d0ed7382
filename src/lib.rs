//! updraft - Batched update execution for relational connectors.
//!
//! Executes dialect-translated INSERT/UPDATE/DELETE commands against a
//! relational backend: vectorized parameter bindings are expanded into
//! per-row parameter sets, submitted in bounded chunks, and the per-row
//! outcomes reconciled into one aggregate result the calling engine can
//! report row by row.

pub mod backend;
pub mod catalog;
pub mod command;
pub mod error;
pub mod executor;
pub mod types;

use std::sync::Arc;

pub use error::{BatchFailure, Result, RowFailure, UpdraftError};
pub use types::{DataType, Value};

pub use backend::{BackendConnection, BackendError, Outcome, PreparedBatch};
pub use catalog::{Catalog, CatalogSnapshot, SchemaRegistry, TableSchema};
pub use command::{Command, CommandKind, ParameterSlot};
pub use executor::{BatchResult, ExecutionContext, ExecutorConfig, UpdateExecutor};

/// Connector facade tying configuration, schema registry, and executor
/// together.
///
/// The host engine typically keeps one `Connector` per data source:
/// install a catalog (or replace it when metadata refreshes), then execute
/// commands within connections the host supplies.
#[derive(Debug, Default)]
pub struct Connector {
    /// Update executor holding the execution configuration.
    executor: UpdateExecutor,
    /// Registry of the catalog in effect for new executions.
    registry: SchemaRegistry,
}

impl Connector {
    /// Creates a connector with the given execution configuration and an
    /// empty catalog.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn new(config: ExecutorConfig) -> Result<Self> {
        Ok(Connector {
            executor: UpdateExecutor::new(config)?,
            registry: SchemaRegistry::new(),
        })
    }

    /// Returns the schema registry.
    #[must_use]
    pub fn registry(&self) -> &SchemaRegistry {
        &self.registry
    }

    /// Installs or replaces the catalog used for new executions.
    pub fn install_catalog(&self, catalog: Catalog) {
        self.registry.install(catalog);
    }

    /// Returns a snapshot of the current catalog.
    #[must_use]
    pub fn catalog(&self) -> Arc<Catalog> {
        self.registry.current()
    }

    /// Executes a command against the current catalog.
    ///
    /// # Errors
    ///
    /// Returns an error if validation, classification, or backend
    /// execution fails.
    pub fn execute(
        &self,
        conn: &mut dyn BackendConnection,
        command: &Command,
    ) -> Result<BatchResult> {
        let catalog = self.registry.current();
        self.executor.execute_batched(conn, &catalog, command)
    }

    /// Executes a command under a caller-supplied context.
    ///
    /// # Errors
    ///
    /// Returns an error if validation, classification, or backend
    /// execution fails, or if the context is cancelled.
    pub fn execute_with_context(
        &self,
        ctx: &ExecutionContext,
        conn: &mut dyn BackendConnection,
        command: &Command,
    ) -> Result<BatchResult> {
        let catalog = self.registry.current();
        self.executor
            .execute_batched_with_context(ctx, conn, &catalog, command)
    }
}
