//! Shared holder of the current catalog.
//!
//! The host engine refreshes schema metadata at runtime; executions must not
//! observe a catalog swap mid-call. The registry hands out `Arc` snapshots:
//! an in-flight execution keeps validating against the catalog version it
//! started with, while new executions pick up the replacement.

use std::sync::Arc;

use parking_lot::RwLock;
use tracing::debug;

use crate::catalog::Catalog;

/// Thread-safe holder of the catalog in effect for new executions.
#[derive(Debug, Default)]
pub struct SchemaRegistry {
    current: RwLock<Arc<Catalog>>,
}

impl SchemaRegistry {
    /// Creates a registry holding an empty catalog.
    #[must_use]
    pub fn new() -> Self {
        SchemaRegistry {
            current: RwLock::new(Arc::new(Catalog::new())),
        }
    }

    /// Creates a registry holding the given catalog.
    #[must_use]
    pub fn with_catalog(catalog: Catalog) -> Self {
        SchemaRegistry {
            current: RwLock::new(Arc::new(catalog)),
        }
    }

    /// Replaces the current catalog.
    pub fn install(&self, catalog: Catalog) {
        let tables = catalog.table_names().len();
        *self.current.write() = Arc::new(catalog);
        debug!(tables, "Installed new catalog");
    }

    /// Returns a snapshot of the current catalog.
    #[must_use]
    pub fn current(&self) -> Arc<Catalog> {
        Arc::clone(&self.current.read())
    }
}
