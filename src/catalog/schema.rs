//! Schema definitions for tables, columns, and keys.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::{Result, UpdraftError};
use crate::types::DataType;

/// Central registry of all table schemas known to the connector.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Catalog {
    /// Table schemas by name.
    tables: HashMap<String, TableSchema>,
}

impl Catalog {
    /// Creates a new empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Catalog {
            tables: HashMap::new(),
        }
    }

    /// Registers a new table schema in the catalog.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - A table with the same name already exists
    /// - The schema fails validation
    /// - A foreign key references a table that does not exist
    pub fn create_table(&mut self, schema: TableSchema) -> Result<()> {
        if self.tables.contains_key(&schema.name) {
            return Err(UpdraftError::SchemaError(format!(
                "Table '{}' already exists",
                schema.name
            )));
        }

        schema.validate()?;

        // Self-references are legal; anything else must already be registered
        for fk in &schema.foreign_keys {
            if fk.referenced_table != schema.name && !self.tables.contains_key(&fk.referenced_table)
            {
                return Err(UpdraftError::SchemaError(format!(
                    "Referenced table '{}' does not exist",
                    fk.referenced_table
                )));
            }
        }

        self.tables.insert(schema.name.clone(), schema);
        Ok(())
    }

    /// Retrieves a table schema by name.
    #[must_use]
    pub fn get_table(&self, name: &str) -> Option<Arc<TableSchema>> {
        self.tables.get(name).map(|s| Arc::new(s.clone()))
    }

    /// Checks if a table exists in the catalog.
    #[must_use]
    pub fn table_exists(&self, name: &str) -> bool {
        self.tables.contains_key(name)
    }

    /// Returns all table names.
    #[must_use]
    pub fn table_names(&self) -> Vec<&str> {
        self.tables.keys().map(String::as_str).collect()
    }

    /// Serializes the catalog to bytes.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn serialize(&self) -> Result<Vec<u8>> {
        bincode::serialize(self)
            .map_err(|e| UpdraftError::Snapshot(format!("Failed to serialize catalog: {e}")))
    }

    /// Deserializes a catalog from bytes.
    ///
    /// # Errors
    ///
    /// Returns an error if deserialization fails.
    pub fn deserialize(data: &[u8]) -> Result<Self> {
        bincode::deserialize(data)
            .map_err(|e| UpdraftError::Snapshot(format!("Failed to deserialize catalog: {e}")))
    }
}

/// Kind of object a table schema describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TableType {
    /// Ordinary base table (default).
    #[default]
    Table,
    /// View; not updatable unless explicitly flagged.
    View,
    /// Materialization target of a view.
    MaterializedTable,
    /// Structured document mapped onto relational form.
    Document,
}

/// Schema definition for a single table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableSchema {
    /// Table name.
    pub name: String,
    /// What kind of object this is.
    pub table_type: TableType,
    /// Whether data-modification commands may target this table.
    pub supports_update: bool,
    /// Ordered list of column definitions.
    pub columns: Vec<ColumnDef>,
    /// Primary key, if one is declared.
    pub primary_key: Option<KeyDef>,
    /// Unique keys beyond the primary key.
    pub unique_keys: Vec<KeyDef>,
    /// Foreign keys referencing other tables.
    pub foreign_keys: Vec<ForeignKey>,
}

impl TableSchema {
    /// Creates a new table schema with validation.
    ///
    /// # Errors
    ///
    /// Returns an error if validation fails (empty columns, duplicate names).
    pub fn new(name: String, columns: Vec<ColumnDef>) -> Result<Self> {
        let schema = TableSchema {
            name,
            table_type: TableType::Table,
            supports_update: true,
            columns,
            primary_key: None,
            unique_keys: Vec::new(),
            foreign_keys: Vec::new(),
        };
        schema.validate()?;
        Ok(schema)
    }

    /// Sets the table type. Views default to non-updatable.
    #[must_use]
    pub fn with_table_type(mut self, table_type: TableType) -> Self {
        self.table_type = table_type;
        if table_type == TableType::View {
            self.supports_update = false;
        }
        self
    }

    /// Overrides the updatability flag.
    #[must_use]
    pub fn with_supports_update(mut self, supports_update: bool) -> Self {
        self.supports_update = supports_update;
        self
    }

    /// Declares the primary key.
    #[must_use]
    pub fn with_primary_key(mut self, key: KeyDef) -> Self {
        self.primary_key = Some(key);
        self
    }

    /// Adds a unique key.
    #[must_use]
    pub fn with_unique_key(mut self, key: KeyDef) -> Self {
        self.unique_keys.push(key);
        self
    }

    /// Adds a foreign key.
    #[must_use]
    pub fn with_foreign_key(mut self, fk: ForeignKey) -> Self {
        self.foreign_keys.push(fk);
        self
    }

    pub(crate) fn validate(&self) -> Result<()> {
        // Check at least one column
        if self.columns.is_empty() {
            return Err(UpdraftError::SchemaError(
                "Table must have at least one column".into(),
            ));
        }

        // Check column name uniqueness
        let mut seen = HashSet::new();
        for col in &self.columns {
            if !seen.insert(&col.name) {
                return Err(UpdraftError::SchemaError(format!(
                    "Duplicate column name '{}'",
                    col.name
                )));
            }
        }

        // Check every declared key over existing columns
        for key in self.all_keys() {
            if key.columns.is_empty() {
                return Err(UpdraftError::SchemaError(format!(
                    "Key on table '{}' must specify at least one column",
                    self.name
                )));
            }
            for key_col in &key.columns {
                if !self.columns.iter().any(|c| &c.name == key_col) {
                    return Err(UpdraftError::SchemaError(format!(
                        "Key column '{key_col}' not found in table '{}'",
                        self.name
                    )));
                }
            }
        }

        Ok(())
    }

    /// Finds a column definition by name.
    #[must_use]
    pub fn get_column(&self, name: &str) -> Option<&ColumnDef> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Finds the index of a column by name.
    #[must_use]
    pub fn get_column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == name)
    }

    /// Returns primary, unique, then foreign keys in declaration order.
    #[must_use]
    pub fn all_keys(&self) -> Vec<&KeyDef> {
        let mut keys = Vec::new();
        if let Some(pk) = &self.primary_key {
            keys.push(pk);
        }
        keys.extend(self.unique_keys.iter());
        keys.extend(self.foreign_keys.iter().map(|fk| &fk.key));
        keys
    }

    /// Returns true if data-modification commands may target this table.
    #[must_use]
    pub fn is_updatable(&self) -> bool {
        self.supports_update
    }
}

/// Definition of a single column in a table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnDef {
    /// Column name.
    pub name: String,
    /// Column data type.
    pub data_type: DataType,
    /// Whether NULL values are permitted.
    pub nullable: bool,
}

impl ColumnDef {
    /// Creates a new nullable column definition.
    ///
    /// # Errors
    ///
    /// Returns an error if the column name is empty.
    pub fn new(name: String, data_type: DataType) -> Result<Self> {
        if name.is_empty() {
            return Err(UpdraftError::SchemaError(
                "Column name cannot be empty".into(),
            ));
        }
        Ok(ColumnDef {
            name,
            data_type,
            nullable: true,
        })
    }
}

/// A named key over an ordered list of columns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyDef {
    /// Key name, if the source schema declared one.
    pub name: Option<String>,
    /// Columns the key covers, in key order.
    pub columns: Vec<String>,
}

impl KeyDef {
    /// Creates an anonymous key.
    #[must_use]
    pub fn new(columns: Vec<String>) -> Self {
        KeyDef {
            name: None,
            columns,
        }
    }

    /// Creates a named key.
    #[must_use]
    pub fn named(name: String, columns: Vec<String>) -> Self {
        KeyDef {
            name: Some(name),
            columns,
        }
    }
}

/// A foreign key referencing another table by name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForeignKey {
    /// The key columns on this table.
    pub key: KeyDef,
    /// Name of the table the key references.
    pub referenced_table: String,
}

impl ForeignKey {
    /// Creates a foreign key.
    #[must_use]
    pub fn new(key: KeyDef, referenced_table: String) -> Self {
        ForeignKey {
            key,
            referenced_table,
        }
    }
}
