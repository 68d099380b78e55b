//! Content hashing
//!
//! Row hashes must be stable across processes because the file engine
//! persists its fingerprint, so everything here is derived from CRC32 over
//! a canonical encoding rather than from `std::hash`.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::schema::Value;

/// Content hash of a single row
pub fn row_hash(row: &[Value]) -> u32 {
    let mut bytes = Vec::with_capacity(row.len() * 8);
    for value in row {
        value.write_canonical(&mut bytes);
    }
    crc32fast::hash(&bytes)
}

/// Process-independent hash of a single value
pub fn value_hash(value: &Value) -> u32 {
    let mut bytes = Vec::with_capacity(8);
    value.write_canonical(&mut bytes);
    crc32fast::hash(&bytes)
}

/// Additive checksum over the content hashes of a table's live rows
///
/// Arithmetic wraps modulo 2^32, so the fingerprint is independent of the
/// order rows were inserted in and of how they are laid out.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Fingerprint(u32);

impl Fingerprint {
    pub const ZERO: Fingerprint = Fingerprint(0);

    pub fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    pub fn raw(self) -> u32 {
        self.0
    }

    /// Account for a newly inserted row
    pub fn include(&mut self, row: &[Value]) {
        self.0 = self.0.wrapping_add(row_hash(row));
    }

    /// Account for a removed row
    pub fn exclude(&mut self, row: &[Value]) {
        self.0 = self.0.wrapping_sub(row_hash(row));
    }

    /// Account for `old` being overwritten by `new`
    pub fn replace(&mut self, old: &[Value], new: &[Value]) {
        self.exclude(old);
        self.include(new);
    }

    /// Fingerprint of a set of rows computed from scratch
    pub fn of_rows<'a, I>(rows: I) -> Self
    where
        I: IntoIterator<Item = &'a [Value]>,
    {
        let mut fingerprint = Self::ZERO;
        for row in rows {
            fingerprint.include(row);
        }
        fingerprint
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:08x}", self.0)
    }
}
