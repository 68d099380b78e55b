//! Content-Addressed File Table
//!
//! Durable engine storing one file per row. A row's path is derived from a
//! salted SHA-1 digest of its primary key and sharded two levels deep (see
//! [`layout`]), so lookups never scan and no directory grows past 256
//! shards.
//!
//! ## File Formats
//! ```text
//! schema (263 bytes)
//! ┌──────────────┬───────────────┬────────────────────────────────────┐
//! │ ColCount u32 │ Primary u32   │ 15 × [NameLen u8][Name 15][Tag u8] │
//! └──────────────┴───────────────┴────────────────────────────────────┘
//!
//! metadata (12 bytes)
//! ┌──────────┬──────────────────┬──────────────────┐
//! │ Size u32 │ Fingerprint u32  │ RecordWidth u32  │
//! └──────────┴──────────────────┴──────────────────┘
//!
//! record (RecordWidth bytes), one fixed slot per column:
//!   STRING  [Len i8][UTF-8 ≤127]       128 bytes
//!   INTEGER [Width i8][i8|i16|i32]       5 bytes
//!   BOOLEAN [0|1]                        1 byte
//!   (a leading -1 marks null in every slot type)
//! ```
//!
//! ## Write Ordering
//! Record files change first and metadata last, each through a temp file
//! and rename. A failed record write leaves metadata untouched.

mod codec;
mod iterator;
pub mod layout;

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, trace, warn};

use crate::config::{Config, SyncStrategy};
use crate::error::{Result, StoreError};
use crate::schema::{sanitize_row, validate_name, Row, Schema, Value};

use self::codec::Metadata;
use self::layout::{METADATA_FILE, SCHEMA_FILE, STATE_DIR};
use super::{Fingerprint, Rows, Table};

pub use self::iterator::StateIterator;

/// Persistent table with one file per row
#[derive(Debug)]
pub struct ContentAddressedFileTable {
    schema: Schema,
    /// `{base_dir}/tables/{name}`
    root: PathBuf,
    size: usize,
    fingerprint: Fingerprint,
    /// Bytes per record file, as persisted in metadata
    record_width: usize,
    sync_strategy: SyncStrategy,
    prune_empty_shards: bool,
}

impl ContentAddressedFileTable {
    /// Create a fresh, empty table.
    ///
    /// Any existing directory for a table of the same name is deleted first.
    pub fn create(config: &Config, schema: Schema) -> Result<Self> {
        let root = config.tables_dir().join(schema.name());

        if root.exists() {
            debug!(table = schema.name(), path = %root.display(), "Replacing existing table");
            fs::remove_dir_all(&root)?;
        }
        fs::create_dir_all(&root)?;

        let mut table = Self {
            record_width: schema.record_width(),
            schema,
            root,
            size: 0,
            fingerprint: Fingerprint::ZERO,
            sync_strategy: config.sync_strategy,
            prune_empty_shards: config.prune_empty_shards,
        };

        layout::write_atomic(
            &table.root.join(SCHEMA_FILE),
            &codec::encode_schema(&table.schema),
            table.sync_strategy,
        )?;
        table.persist(0, Fingerprint::ZERO)?;

        debug!(
            table = table.schema.name(),
            columns = table.schema.column_count(),
            record_width = table.record_width,
            "Created file table"
        );
        Ok(table)
    }

    /// Reopen a table previously created under the same base directory.
    ///
    /// Size and fingerprint are taken from metadata; `state/` is not scanned.
    pub fn reopen(config: &Config, name: &str) -> Result<Self> {
        validate_name(name)?;
        let root = config.tables_dir().join(name);

        let schema_path = root.join(SCHEMA_FILE);
        let metadata_path = root.join(METADATA_FILE);
        for path in [&schema_path, &metadata_path] {
            if !path.is_file() {
                return Err(StoreError::MissingTableFile(path.clone()));
            }
        }

        let schema = codec::decode_schema(name, &fs::read(&schema_path)?)?;
        let metadata = codec::decode_metadata(&fs::read(&metadata_path)?)?;

        if metadata.record_width != schema.record_width() {
            return Err(StoreError::Corrupt(format!(
                "metadata record width {} does not match schema width {}",
                metadata.record_width,
                schema.record_width()
            )));
        }

        debug!(
            table = name,
            size = metadata.size,
            fingerprint = %metadata.fingerprint,
            "Reopened file table"
        );

        Ok(Self {
            schema,
            root,
            size: metadata.size,
            fingerprint: metadata.fingerprint,
            record_width: metadata.record_width,
            sync_strategy: config.sync_strategy,
            prune_empty_shards: config.prune_empty_shards,
        })
    }

    /// Delete the table's whole directory tree
    pub fn drop_table(self) -> Result<()> {
        fs::remove_dir_all(&self.root)?;
        debug!(table = self.schema.name(), "Dropped file table");
        Ok(())
    }

    /// The table's root directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Bytes per record file
    pub fn record_width(&self) -> usize {
        self.record_width
    }

    /// Path of the record file that holds (or would hold) `key`
    pub fn record_path(&self, key: &Value) -> PathBuf {
        layout::path_of(&self.state_dir(), &layout::digest(key))
    }

    /// Typed iterator over the stored rows
    pub fn iter(&self) -> StateIterator<'_> {
        StateIterator::new(self)
    }

    // =========================================================================
    // Private Helpers
    // =========================================================================

    fn state_dir(&self) -> PathBuf {
        self.root.join(STATE_DIR)
    }

    /// Read the record at `path`, treating a row whose key is not exactly
    /// `key` as absent. Keys of different types can share a string form
    /// and therefore a path.
    fn read_keyed(&self, path: &Path, key: &Value) -> Result<Option<Row>> {
        Ok(self
            .read_record(path)?
            .filter(|row| self.schema.key_of(row) == key))
    }

    fn read_digest(&self, digest: &str) -> Result<Option<Row>> {
        self.read_record(&layout::path_of(&self.state_dir(), digest))
    }

    fn read_record(&self, path: &Path) -> Result<Option<Row>> {
        match layout::read_if_exists(path)? {
            Some(bytes) => Ok(Some(codec::decode_record(
                &self.schema,
                self.record_width,
                &bytes,
            )?)),
            None => Ok(None),
        }
    }

    fn write_record(&self, path: &Path, row: &[Value]) -> Result<()> {
        if let Some(shard) = path.parent() {
            fs::create_dir_all(shard)?;
        }
        let record = codec::encode_record(&self.schema, row);
        layout::write_atomic(path, &record, self.sync_strategy)?;
        Ok(())
    }

    /// Write metadata, then adopt the new counters
    fn persist(&mut self, size: usize, fingerprint: Fingerprint) -> Result<()> {
        let metadata = Metadata {
            size,
            fingerprint,
            record_width: self.record_width,
        };
        layout::write_atomic(
            &self.root.join(METADATA_FILE),
            &codec::encode_metadata(&metadata),
            self.sync_strategy,
        )?;

        self.size = size;
        self.fingerprint = fingerprint;
        Ok(())
    }

    fn prune_shard(&self, shard: &Path) -> Result<()> {
        if fs::read_dir(shard)?.next().is_none() {
            fs::remove_dir(shard)?;
        }
        Ok(())
    }
}

impl Table for ContentAddressedFileTable {
    fn schema(&self) -> &Schema {
        &self.schema
    }

    fn put(&mut self, row: Row) -> Result<bool> {
        let row = sanitize_row(&self.schema, row)?;
        let key = self.schema.key_of(&row);
        let path = self.record_path(key);

        let old = self.read_keyed(&path, key)?;
        self.write_record(&path, &row)?;

        let mut fingerprint = self.fingerprint;
        fingerprint.include(&row);
        let size = match &old {
            Some(old) => {
                fingerprint.exclude(old);
                self.size
            }
            None => self.size + 1,
        };
        self.persist(size, fingerprint)?;

        let hit = old.is_some();
        trace!(table = self.schema.name(), hit, size, "put");
        Ok(hit)
    }

    fn remove(&mut self, key: &Value) -> Result<bool> {
        let path = self.record_path(key);
        let Some(old) = self.read_keyed(&path, key)? else {
            return Ok(false);
        };
        let size = self.size.checked_sub(1).ok_or_else(|| {
            StoreError::Corrupt(format!(
                "metadata counts no rows but {} exists",
                path.display()
            ))
        })?;

        fs::remove_file(&path)?;

        let mut fingerprint = self.fingerprint;
        fingerprint.exclude(&old);
        self.persist(size, fingerprint)?;

        // Best effort once metadata no longer counts the row
        if self.prune_empty_shards {
            if let Some(shard) = path.parent() {
                if let Err(e) = self.prune_shard(shard) {
                    warn!(
                        table = self.schema.name(),
                        shard = %shard.display(),
                        error = %e,
                        "Failed to prune shard"
                    );
                }
            }
        }

        trace!(table = self.schema.name(), size, "remove");
        Ok(true)
    }

    fn get(&self, key: &Value) -> Result<Option<Row>> {
        self.read_keyed(&self.record_path(key), key)
    }

    fn size(&self) -> usize {
        self.size
    }

    fn capacity(&self) -> usize {
        self.size
    }

    fn clear(&mut self) -> Result<()> {
        layout::remove_tree(&self.state_dir())?;
        self.persist(0, Fingerprint::ZERO)?;
        debug!(table = self.schema.name(), "Cleared file table");
        Ok(())
    }

    fn rows(&self) -> Rows<'_> {
        Box::new(self.iter())
    }

    fn fingerprint(&self) -> Fingerprint {
        self.fingerprint
    }
}
