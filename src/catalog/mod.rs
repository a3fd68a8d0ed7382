//! Catalog for managing table schemas.
//!
//! Holds the schema model ([`TableSchema`], [`ColumnDef`], key definitions),
//! the validation adapter consulted before execution, the shared
//! [`SchemaRegistry`], and the [`CatalogSnapshot`] persistence envelope.

mod registry;
mod schema;
mod snapshot;
mod validate;

pub use registry::SchemaRegistry;
pub use schema::{Catalog, ColumnDef, ForeignKey, KeyDef, TableSchema, TableType};
pub use snapshot::{CatalogSnapshot, SNAPSHOT_MAGIC, SNAPSHOT_VERSION};
pub use validate::validate_command;
