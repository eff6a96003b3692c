//! Table schemas (tables, columns, rows)

use super::data_type::DataType;
use super::value::{Row, Value};
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// A table column descriptor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    /// Column name. Case-sensitive, unique within a table, identifier class.
    pub name: String,
    /// Declared cell type.
    pub data_type: DataType,
}

impl Column {
    pub fn new(name: impl Into<String>, data_type: DataType) -> Self {
        Column {
            name: name.into(),
            data_type,
        }
    }
}

/// An in-memory table: an ordered schema, rows in user order, and the file
/// it was loaded from (None for tables created by commands).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Table {
    pub name: String,
    pub columns: Vec<Column>,
    pub rows: Vec<Row>,
    pub source_file: Option<String>,
}

impl Table {
    /// Creates an empty table, validating the schema: every column name must
    /// be a valid identifier and unique within the table.
    pub fn new(name: impl Into<String>, columns: Vec<Column>) -> Result<Self> {
        let name = name.into();
        if name.is_empty() {
            return Err(Error::InvalidParameter("table name cannot be empty".into()));
        }
        for (i, column) in columns.iter().enumerate() {
            if !is_identifier(&column.name) {
                return Err(Error::InvalidValue(format!(
                    "'{}' is not a valid column name",
                    column.name
                )));
            }
            if columns[..i].iter().any(|c| c.name == column.name) {
                return Err(Error::DuplicateColumn(column.name.clone()));
            }
        }
        Ok(Table {
            name,
            columns,
            rows: Vec::new(),
            source_file: None,
        })
    }

    /// Check if a column exists in this table.
    pub fn has_column(&self, column_name: &str) -> bool {
        self.columns.iter().any(|c| c.name == column_name)
    }

    /// Get the index of a column by name.
    pub fn column_index(&self, column_name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == column_name)
    }

    /// Returns the column with the given name, if it exists.
    pub fn get_column(&self, name: &str) -> Option<(usize, &Column)> {
        self.columns
            .iter()
            .enumerate()
            .find(|(_, c)| c.name == name)
    }

    /// A row of type-specific zeros matching the schema.
    pub fn default_row(&self) -> Row {
        self.columns
            .iter()
            .map(|c| Value::default_for(c.data_type))
            .collect()
    }

    /// Looks up a cell by row index and column name.
    pub fn cell(&self, row: usize, column: &str) -> Option<&Value> {
        let idx = self.column_index(column)?;
        self.rows.get(row).and_then(|r| r.get(idx))
    }
}

/// True iff the string is in the identifier lexical class: a letter or
/// underscore followed by letters, digits, and underscores.
pub fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}
