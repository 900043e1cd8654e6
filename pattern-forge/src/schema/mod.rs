//! Table schema introspection
//!
//! The generator only needs a table's column names, in table order, to build
//! the model's fillable list. [`SchemaInspector`] is the seam; the sqlx-backed
//! [`SqlxInspector`] talks to MySQL/MariaDB, PostgreSQL and SQLite.

mod database;

pub use database::{DatabaseTarget, SqlxInspector};

use async_trait::async_trait;
use std::collections::HashMap;

use crate::error::{PatternError, Result};

/// One table column
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    /// Column name
    pub name: String,
    /// Database type as reported by the driver
    pub data_type: String,
    /// Whether the column accepts NULL
    pub nullable: bool,
}

impl Column {
    /// Convenience constructor
    pub fn new(name: impl Into<String>, data_type: impl Into<String>, nullable: bool) -> Self {
        Self {
            name: name.into(),
            data_type: data_type.into(),
            nullable,
        }
    }
}

/// Reads a table's columns
#[async_trait]
pub trait SchemaInspector: Send + Sync {
    /// Columns of `table` in declaration order
    ///
    /// # Errors
    ///
    /// Returns [`PatternError::InvalidTable`] for a malformed name,
    /// [`PatternError::TableNotFound`] when the table has no columns and
    /// [`PatternError::SchemaLookup`] when the query itself fails.
    async fn columns(&self, table: &str) -> Result<Vec<Column>>;
}

/// Fixed, in-memory schema
///
/// Stands in for a live database when the column list is already known.
#[derive(Debug, Clone, Default)]
pub struct StaticSchema {
    tables: HashMap<String, Vec<Column>>,
}

impl StaticSchema {
    /// Empty schema
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a table
    #[must_use]
    pub fn with_table(mut self, table: impl Into<String>, columns: Vec<Column>) -> Self {
        self.tables.insert(table.into(), columns);
        self
    }
}

#[async_trait]
impl SchemaInspector for StaticSchema {
    async fn columns(&self, table: &str) -> Result<Vec<Column>> {
        validate_table_name(table)?;
        match self.tables.get(table) {
            Some(columns) if !columns.is_empty() => Ok(columns.clone()),
            _ => Err(PatternError::TableNotFound(table.to_string())),
        }
    }
}

/// Check a table name before it reaches a query
///
/// Accepts `table` or `schema.table`; each part is letters, digits, `_` or
/// `$`, not starting with a digit.
///
/// # Errors
///
/// Returns [`PatternError::InvalidTable`] otherwise.
pub fn validate_table_name(table: &str) -> Result<()> {
    let valid_part = |part: &str| {
        !part.is_empty()
            && !part.starts_with(|c: char| c.is_ascii_digit())
            && part.chars().all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
    };

    let parts: Vec<&str> = table.split('.').collect();
    if parts.len() <= 2 && parts.iter().all(|p| valid_part(p)) {
        Ok(())
    } else {
        Err(PatternError::InvalidTable(table.to_string()))
    }
}

/// Split `schema.table` into its parts
#[must_use]
pub fn split_qualified(table: &str) -> (Option<&str>, &str) {
    table
        .split_once('.')
        .map_or((None, table), |(schema, name)| (Some(schema), name))
}

/// Columns eligible for mass assignment, in table order
#[must_use]
pub fn fillable_fields(columns: &[Column], excluded: &[String]) -> Vec<String> {
    columns
        .iter()
        .filter(|column| !excluded.iter().any(|e| e == &column.name))
        .map(|column| column.name.clone())
        .collect()
}
