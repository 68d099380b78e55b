//! Reference table
//!
//! BTreeMap-backed engine. Simple and obviously correct, which makes it the
//! oracle the other engines are checked against.

use std::collections::BTreeMap;

use crate::error::Result;
use crate::schema::{sanitize_row, Row, Schema, Value};

use super::{Fingerprint, Rows, Table};

/// Ordered-map table; rows iterate in primary-key order
#[derive(Debug, Clone)]
pub struct ReferenceTable {
    schema: Schema,
    tree: BTreeMap<Value, Row>,
    fingerprint: Fingerprint,
}

impl ReferenceTable {
    /// Create an empty table
    pub fn new(schema: Schema) -> Self {
        Self {
            schema,
            tree: BTreeMap::new(),
            fingerprint: Fingerprint::ZERO,
        }
    }

    /// Borrowing iterator in key order
    pub fn iter(&self) -> impl Iterator<Item = &Row> {
        self.tree.values()
    }
}

impl Table for ReferenceTable {
    fn schema(&self) -> &Schema {
        &self.schema
    }

    fn put(&mut self, row: Row) -> Result<bool> {
        let row = sanitize_row(&self.schema, row)?;
        let key = self.schema.key_of(&row).clone();

        self.fingerprint.include(&row);
        match self.tree.insert(key, row) {
            Some(old) => {
                self.fingerprint.exclude(&old);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn remove(&mut self, key: &Value) -> Result<bool> {
        match self.tree.remove(key) {
            Some(old) => {
                self.fingerprint.exclude(&old);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn get(&self, key: &Value) -> Result<Option<Row>> {
        Ok(self.tree.get(key).cloned())
    }

    fn size(&self) -> usize {
        self.tree.len()
    }

    fn capacity(&self) -> usize {
        self.size()
    }

    fn clear(&mut self) -> Result<()> {
        self.tree.clear();
        self.fingerprint = Fingerprint::ZERO;
        Ok(())
    }

    fn rows(&self) -> Rows<'_> {
        Box::new(self.tree.values().cloned().map(Ok))
    }

    fn fingerprint(&self) -> Fingerprint {
        self.fingerprint
    }
}
