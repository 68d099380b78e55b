//! Open-addressing table
//!
//! In-memory engine over a flat slot array.
//!
//! ## Probing
//! A key's probe origin `h` comes from a salted FNV-1 hash. Step `j` visits
//! `h + j²` for even `j` and `h - j²` for odd `j`, modulo the capacity. When
//! the capacity is a prime `p ≡ 3 (mod 4)`, `-1` is a quadratic non-residue
//! and the first `p` steps visit every slot, so a probe only fails to
//! resolve if the invariants are broken.
//!
//! ## Deletion
//! Removed rows leave a [`Slot::Tombstone`] so probes for other keys keep
//! walking past them. Inserts reuse the first tombstone on their path.
//!
//! ## Growth
//! Once `(live + tombstones) / capacity` exceeds 0.75 the array is rebuilt
//! at the next prime `≡ 3 (mod 4)` above `2 × capacity + 1`, dropping every
//! tombstone.

use std::mem;

use tracing::{debug, trace};

use crate::error::{Result, StoreError};
use crate::schema::{sanitize_row, Row, Schema, Value};

use super::{value_hash, Fingerprint, Rows, Table};

/// Initial capacity: a prime ≡ 3 (mod 4) below 20
const MIN_CAPACITY: usize = 19;

const LOAD_FACTOR_BOUND: f64 = 0.75;

const PROBE_SALT: &str = "tablestore.probe";

const FNV_OFFSET_BASIS: u32 = 0x811c_9dc5;
const FNV_PRIME: u32 = 0x0100_0193;

/// One position of the slot array
#[derive(Debug, Clone, PartialEq)]
pub enum Slot {
    /// Never used since the last rehash; terminates probes
    Empty,

    /// Held a row that was removed; probes continue past it
    Tombstone,

    /// Holds a live row
    Occupied(Row),
}

/// Outcome of walking a key's probe sequence
#[derive(Debug, Clone, Copy)]
enum Probe {
    /// The key lives at `index`
    Hit { index: usize, recycle: Option<usize> },

    /// The key is absent; `index` is the empty slot that ended the walk
    Miss { index: usize, recycle: Option<usize> },
}

/// Hash table over a flat slot array
#[derive(Debug, Clone)]
pub struct OpenAddressingTable {
    schema: Schema,
    slots: Vec<Slot>,
    /// Live rows
    size: usize,
    /// Tombstoned slots
    tombstones: usize,
    fingerprint: Fingerprint,
}

impl OpenAddressingTable {
    /// Create an empty table at the minimum capacity
    pub fn new(schema: Schema) -> Self {
        Self {
            schema,
            slots: empty_slots(MIN_CAPACITY),
            size: 0,
            tombstones: 0,
            fingerprint: Fingerprint::ZERO,
        }
    }

    /// Number of tombstoned slots
    pub fn tombstones(&self) -> usize {
        self.tombstones
    }

    /// The raw slot array
    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    /// Borrowing iterator in slot order
    pub fn iter(&self) -> impl Iterator<Item = &Row> {
        self.slots.iter().filter_map(|slot| match slot {
            Slot::Occupied(row) => Some(row),
            _ => None,
        })
    }

    /// Grow to the next capacity and re-insert every live row.
    ///
    /// Rows are re-inserted in their current slot order; tombstones are
    /// dropped.
    pub fn rehash(&mut self) -> Result<()> {
        let old_capacity = self.slots.len();
        let new_capacity = next_prime(old_capacity);
        let backup = mem::replace(&mut self.slots, empty_slots(new_capacity));

        debug!(
            table = self.schema.name(),
            old_capacity,
            new_capacity,
            live = self.size,
            tombstones = self.tombstones,
            "Rehashing"
        );

        self.size = 0;
        self.tombstones = 0;
        self.fingerprint = Fingerprint::ZERO;

        for slot in backup {
            if let Slot::Occupied(row) = slot {
                self.insert(row)?;
            }
        }

        Ok(())
    }

    // =========================================================================
    // Private Helpers
    // =========================================================================

    /// Walk the probe sequence for `key`, remembering the first tombstone
    fn probe(&self, key: &Value) -> Result<Probe> {
        let capacity = self.slots.len();
        let origin = i64::from(probe_hash(key));
        let mut recycle = None;

        for j in 0..capacity as i64 {
            let step = j * j;
            let offset = if j % 2 == 0 { step } else { -step };
            let index = (origin + offset).rem_euclid(capacity as i64) as usize;

            match &self.slots[index] {
                Slot::Tombstone => {
                    recycle.get_or_insert(index);
                }
                Slot::Empty => return Ok(Probe::Miss { index, recycle }),
                Slot::Occupied(row) if self.schema.key_of(row) == key => {
                    return Ok(Probe::Hit { index, recycle });
                }
                Slot::Occupied(_) => {}
            }
        }

        Err(StoreError::ProbeExhausted { capacity })
    }

    /// Place an already sanitized row; no load factor check
    fn insert(&mut self, row: Row) -> Result<bool> {
        let probe = self.probe(self.schema.key_of(&row))?;
        self.fingerprint.include(&row);

        match probe {
            Probe::Miss { index, recycle } => {
                let target = match recycle {
                    Some(tombstone) => {
                        self.tombstones -= 1;
                        tombstone
                    }
                    None => index,
                };
                self.slots[target] = Slot::Occupied(row);
                self.size += 1;
                Ok(false)
            }
            Probe::Hit { index, recycle } => {
                // Moving the row forward into the tombstone shortens future probes
                let displaced = match recycle {
                    Some(tombstone) => {
                        self.slots[tombstone] = Slot::Occupied(row);
                        mem::replace(&mut self.slots[index], Slot::Tombstone)
                    }
                    None => mem::replace(&mut self.slots[index], Slot::Occupied(row)),
                };
                if let Slot::Occupied(old) = displaced {
                    self.fingerprint.exclude(&old);
                }
                Ok(true)
            }
        }
    }
}

impl Table for OpenAddressingTable {
    fn schema(&self) -> &Schema {
        &self.schema
    }

    fn put(&mut self, row: Row) -> Result<bool> {
        let row = sanitize_row(&self.schema, row)?;
        let hit = self.insert(row)?;

        if !hit && self.load_factor() > LOAD_FACTOR_BOUND {
            self.rehash()?;
        }

        trace!(table = self.schema.name(), hit, size = self.size, "put");
        Ok(hit)
    }

    fn remove(&mut self, key: &Value) -> Result<bool> {
        let Probe::Hit { index, .. } = self.probe(key)? else {
            return Ok(false);
        };

        if let Slot::Occupied(old) = mem::replace(&mut self.slots[index], Slot::Tombstone) {
            self.fingerprint.exclude(&old);
        }
        self.size -= 1;
        self.tombstones += 1;

        trace!(table = self.schema.name(), size = self.size, "remove");
        Ok(true)
    }

    fn get(&self, key: &Value) -> Result<Option<Row>> {
        match self.probe(key)? {
            Probe::Hit { index, .. } => match &self.slots[index] {
                Slot::Occupied(row) => Ok(Some(row.clone())),
                _ => Ok(None),
            },
            Probe::Miss { .. } => Ok(None),
        }
    }

    fn size(&self) -> usize {
        self.size
    }

    fn capacity(&self) -> usize {
        self.slots.len()
    }

    fn clear(&mut self) -> Result<()> {
        self.slots = empty_slots(MIN_CAPACITY);
        self.size = 0;
        self.tombstones = 0;
        self.fingerprint = Fingerprint::ZERO;
        Ok(())
    }

    fn rows(&self) -> Rows<'_> {
        Box::new(self.iter().cloned().map(Ok))
    }

    fn fingerprint(&self) -> Fingerprint {
        self.fingerprint
    }

    /// Tombstones count against the load factor
    fn load_factor(&self) -> f64 {
        (self.size + self.tombstones) as f64 / self.slots.len() as f64
    }
}

fn empty_slots(capacity: usize) -> Vec<Slot> {
    vec![Slot::Empty; capacity]
}

/// Salted FNV-1 hash of a key's string form and value hash
fn probe_hash(key: &Value) -> u32 {
    let input = format!("{}-{}-{}", PROBE_SALT, value_hash(key), key);
    input.bytes().fold(FNV_OFFSET_BASIS, |hash, byte| {
        hash.wrapping_mul(FNV_PRIME) ^ u32::from(byte)
    })
}

/// Smallest prime ≡ 3 (mod 4) at or above `2 × prev + 1`
fn next_prime(prev: usize) -> usize {
    let mut next = prev * 2 + 1;
    if next % 4 != 3 {
        next += 2;
    }
    while !is_prime(next) {
        next += 4;
    }
    next
}

fn is_prime(n: usize) -> bool {
    if n < 2 {
        return false;
    }
    if n % 2 == 0 {
        return n == 2;
    }
    let mut factor = 3;
    while factor * factor <= n {
        if n % factor == 0 {
            return false;
        }
        factor += 2;
    }
    true
}
