//! # tablestore
//!
//! An embedded relational table store with:
//! - A typed schema and row model shared by every engine
//! - An in-memory open-addressing hash table with tombstones and prime growth
//! - A persistent content-addressed engine storing one file per row
//! - An ordered-map reference engine used as a correctness oracle
//! - An incrementally maintained content fingerprint on every table
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │            Callers (query drivers, console, export)          │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │  put / remove / get / rows / clear
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                    Table contract                            │
//! │         (row sanitation, size, fingerprint)                  │
//! └──────┬──────────────────────┬─────────────────────┬─────────┘
//!        │                      │                     │
//!        ▼                      ▼                     ▼
//! ┌─────────────┐      ┌────────────────┐     ┌──────────────────┐
//! │  Reference  │      │ OpenAddressing │     │ ContentAddressed │
//! │  (BTreeMap) │      │  (slot array)  │     │   (file / row)   │
//! └─────────────┘      └────────────────┘     └────────┬─────────┘
//!                                                       │
//!                                                       ▼
//!                                         tables/{name}/state/ab/cdef…
//! ```
//!
//! Every engine is single-threaded and synchronous; wrap a table in a
//! mutex if it has to be shared.

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod schema;
pub mod table;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{ContractViolation, ErrorKind, Result, StoreError};
pub use config::{Config, SyncStrategy};
pub use schema::{Column, ColumnType, Row, Schema, Value};
pub use table::{
    ContentAddressedFileTable, Fingerprint, OpenAddressingTable, ReferenceTable, Table,
};

// =============================================================================
// Version Info
// =============================================================================

/// Current version of tablestore
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
