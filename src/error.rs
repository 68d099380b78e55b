//! Error types for tablestore
//!
//! Provides a unified error type for all table operations. Every error
//! belongs to one of three classes (see [`ErrorKind`]): a caller broke the
//! table contract, storage failed underneath us, or an internal invariant
//! was violated.

use std::path::PathBuf;

use thiserror::Error;

use crate::schema::ColumnType;

/// Result type alias using StoreError
pub type Result<T> = std::result::Result<T, StoreError>;

/// Unified error type for tablestore operations
#[derive(Debug, Error)]
pub enum StoreError {
    // -------------------------------------------------------------------------
    // Contract Errors
    // -------------------------------------------------------------------------
    #[error("Contract violation: {0}")]
    Contract(#[from] ContractViolation),

    // -------------------------------------------------------------------------
    // Storage Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Missing table file: {}", .0.display())]
    MissingTableFile(PathBuf),

    #[error("Corrupt table data: {0}")]
    Corrupt(String),

    // -------------------------------------------------------------------------
    // Internal Errors
    // -------------------------------------------------------------------------
    #[error("Probe sequence exhausted at capacity {capacity} without resolving the key")]
    ProbeExhausted { capacity: usize },
}

/// The three classes of failure a caller has to tell apart
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The caller supplied a row, key or schema the table rejects
    Contract,

    /// The backing storage failed or holds unreadable data
    Storage,

    /// A table invariant was broken; this is a defect
    Internal,
}

impl StoreError {
    /// Classify this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            StoreError::Contract(_) => ErrorKind::Contract,
            StoreError::Io(_) | StoreError::MissingTableFile(_) | StoreError::Corrupt(_) => {
                ErrorKind::Storage
            }
            StoreError::ProbeExhausted { .. } => ErrorKind::Internal,
        }
    }
}

/// Rejections of rows and schemas that do not satisfy the table contract
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ContractViolation {
    // -------------------------------------------------------------------------
    // Row Shape
    // -------------------------------------------------------------------------
    #[error("row has {actual} values but the schema has {expected} columns")]
    RowLength { expected: usize, actual: usize },

    #[error("column `{column}` expects {expected} but got {found}")]
    TypeMismatch {
        column: String,
        expected: ColumnType,
        found: ColumnType,
    },

    #[error("string of {len} bytes in column `{column}` exceeds {max} bytes")]
    StringTooLong { column: String, len: usize, max: usize },

    #[error("primary key column `{column}` may not be null")]
    NullPrimaryKey { column: String },

    #[error("integer {0} is outside the 32-bit signed range")]
    IntegerOutOfRange(i64),

    // -------------------------------------------------------------------------
    // Schema Shape
    // -------------------------------------------------------------------------
    #[error("a table needs at least one column")]
    NoColumns,

    #[error("{count} columns exceeds the limit of {max}")]
    TooManyColumns { count: usize, max: usize },

    #[error("name `{name}` exceeds {max} bytes")]
    NameTooLong { name: String, max: usize },

    #[error("invalid name `{0}`")]
    InvalidName(String),

    #[error("duplicate column name `{0}`")]
    DuplicateColumn(String),

    #[error("{names} column names but {types} column types")]
    ColumnCountMismatch { names: usize, types: usize },

    #[error("primary index {index} is out of range for {columns} columns")]
    PrimaryIndexOutOfRange { index: usize, columns: usize },
}
