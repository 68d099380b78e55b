//! Schema Module
//!
//! Describes the shape of a table: its name, ordered columns and the
//! column whose value keys each row.
//!
//! ## Responsibilities
//! - Validate table and column names against the persisted format's limits
//! - Define the value and type model shared by every engine
//! - Reject rows that do not fit the schema (see [`sanitize_row`])
//!
//! A schema is immutable once constructed.

mod row;
mod value;

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::{ContractViolation, Result};

pub use row::sanitize_row;
pub use value::{ColumnType, Value, MAX_STRING_LENGTH};

/// A row: one value per schema column, in column order
pub type Row = Vec<Value>;

/// Longest table or column name, in UTF-8 bytes
pub const MAX_NAME_LENGTH: usize = 15;

/// Most columns a table may declare
pub const MAX_COLUMN_COUNT: usize = 15;

/// A named, typed column
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: ColumnType,
}

/// Immutable description of a table
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Schema {
    name: String,
    columns: Vec<Column>,
    primary_index: usize,
}

impl Schema {
    /// Build and validate a schema from parallel name and type lists
    pub fn new<S: Into<String>>(
        name: impl Into<String>,
        column_names: Vec<S>,
        column_types: Vec<ColumnType>,
        primary_index: usize,
    ) -> Result<Self> {
        if column_names.len() != column_types.len() {
            return Err(ContractViolation::ColumnCountMismatch {
                names: column_names.len(),
                types: column_types.len(),
            }
            .into());
        }

        let columns = column_names
            .into_iter()
            .zip(column_types)
            .map(|(name, ty)| Column {
                name: name.into(),
                ty,
            })
            .collect();

        Self::from_columns(name, columns, primary_index)
    }

    /// Build and validate a schema from already-paired columns
    pub fn from_columns(
        name: impl Into<String>,
        columns: Vec<Column>,
        primary_index: usize,
    ) -> Result<Self> {
        let name = name.into();
        validate_name(&name)?;

        if columns.is_empty() {
            return Err(ContractViolation::NoColumns.into());
        }
        if columns.len() > MAX_COLUMN_COUNT {
            return Err(ContractViolation::TooManyColumns {
                count: columns.len(),
                max: MAX_COLUMN_COUNT,
            }
            .into());
        }

        let mut seen = HashSet::with_capacity(columns.len());
        for column in &columns {
            validate_name(&column.name)?;
            if !seen.insert(column.name.as_str()) {
                return Err(ContractViolation::DuplicateColumn(column.name.clone()).into());
            }
        }

        if primary_index >= columns.len() {
            return Err(ContractViolation::PrimaryIndexOutOfRange {
                index: primary_index,
                columns: columns.len(),
            }
            .into());
        }

        Ok(Self {
            name,
            columns,
            primary_index,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.name.as_str())
    }

    pub fn column_types(&self) -> impl Iterator<Item = ColumnType> + '_ {
        self.columns.iter().map(|c| c.ty)
    }

    /// Position of the column with the given name
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == name)
    }

    pub fn primary_index(&self) -> usize {
        self.primary_index
    }

    pub fn primary_column(&self) -> &Column {
        &self.columns[self.primary_index]
    }

    /// Primary key of a row laid out by this schema
    pub fn key_of<'r>(&self, row: &'r [Value]) -> &'r Value {
        &row[self.primary_index]
    }

    /// Width of a fixed-size encoded record: the sum of every column's
    /// worst-case encoded width
    pub fn record_width(&self) -> usize {
        self.columns.iter().map(|c| c.ty.max_width()).sum()
    }
}

/// Names double as directory names and fixed-width schema fields
pub(crate) fn validate_name(name: &str) -> Result<()> {
    if name.len() > MAX_NAME_LENGTH {
        return Err(ContractViolation::NameTooLong {
            name: name.to_string(),
            max: MAX_NAME_LENGTH,
        }
        .into());
    }
    let unsafe_char = |c: char| c == '/' || c == '\\' || c == '\0';
    if name.is_empty() || name == "." || name == ".." || name.contains(unsafe_char) {
        return Err(ContractViolation::InvalidName(name.to_string()).into());
    }
    Ok(())
}
