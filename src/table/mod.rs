//! Table Module
//!
//! The contract every storage engine satisfies, and the engines themselves.
//!
//! ## Engines
//! - [`ReferenceTable`]: ordered map, rows iterate in key order. Used as a
//!   correctness oracle and for small result sets.
//! - [`OpenAddressingTable`]: flat slot array with alternating quadratic
//!   probing, tombstones and prime-sized growth.
//! - [`ContentAddressedFileTable`]: one file per row under a SHA-1 derived,
//!   two-level sharded path.
//!
//! ## Invariants (all engines)
//! - At most one row per primary key
//! - `size()` equals the number of live rows
//! - `fingerprint()` equals the wrapping sum of [`row_hash`] over all live
//!   rows, maintained incrementally on every mutation

mod fingerprint;
mod open_addressing;
mod reference;

pub mod file;
pub mod pretty;

use crate::error::Result;
use crate::schema::{Row, Schema, Value};

pub use file::ContentAddressedFileTable;
pub use fingerprint::{row_hash, value_hash, Fingerprint};
pub use open_addressing::{OpenAddressingTable, Slot};
pub use pretty::TableView;
pub use reference::ReferenceTable;

/// Lazy sequence of a table's live rows
///
/// Items are fallible because the file engine reads each row from disk.
pub type Rows<'a> = Box<dyn Iterator<Item = Result<Row>> + 'a>;

/// Operations shared by every table engine
pub trait Table {
    /// The table's schema
    fn schema(&self) -> &Schema;

    /// Insert or overwrite the row keyed by its primary-key value.
    ///
    /// Returns `true` if a row with that key was replaced, `false` if the
    /// row is new. Rows that fail [`sanitize_row`](crate::schema::sanitize_row)
    /// are rejected before anything changes.
    fn put(&mut self, row: Row) -> Result<bool>;

    /// Delete the row with the given key; returns whether one existed
    fn remove(&mut self, key: &Value) -> Result<bool>;

    /// Look up the row with the given key
    fn get(&self, key: &Value) -> Result<Option<Row>>;

    /// Number of live rows
    fn size(&self) -> usize;

    /// Allocated slots; equals `size()` for engines without a slot array
    fn capacity(&self) -> usize;

    /// Remove every row and reset size and fingerprint to zero
    fn clear(&mut self) -> Result<()>;

    /// Iterate over all live rows
    fn rows(&self) -> Rows<'_>;

    /// Incrementally maintained content fingerprint
    fn fingerprint(&self) -> Fingerprint;

    // =========================================================================
    // Provided
    // =========================================================================

    fn name(&self) -> &str {
        self.schema().name()
    }

    fn is_empty(&self) -> bool {
        self.size() == 0
    }

    fn contains_key(&self, key: &Value) -> Result<bool> {
        Ok(self.get(key)?.is_some())
    }

    /// Fraction of capacity in use
    fn load_factor(&self) -> f64 {
        match self.capacity() {
            0 => 0.0,
            capacity => self.size() as f64 / capacity as f64,
        }
    }

    /// Fingerprint computed from scratch by walking every live row
    fn recompute_fingerprint(&self) -> Result<Fingerprint> {
        let mut fingerprint = Fingerprint::ZERO;
        for row in self.rows() {
            fingerprint.include(&row?);
        }
        Ok(fingerprint)
    }

    /// Whether the running fingerprint matches a full recomputation
    fn verify_fingerprint(&self) -> Result<bool> {
        Ok(self.recompute_fingerprint()? == self.fingerprint())
    }
}
