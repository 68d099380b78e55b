//! Configuration for tablestore
//!
//! Centralized configuration with sensible defaults. Only the file engine
//! reads it; the in-memory engines take nothing but a schema.

use std::path::PathBuf;

/// Main configuration for persistent tables
#[derive(Debug, Clone)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Storage Configuration
    // -------------------------------------------------------------------------
    /// Root directory for all table files
    /// Internal structure:
    ///   {base_dir}/
    ///     └── tables/
    ///         └── {table_name}/
    ///             ├── schema
    ///             ├── metadata
    ///             └── state/{2 hex}/{38 hex}
    pub base_dir: PathBuf,

    /// Sync strategy: whether writes are fsynced before returning
    pub sync_strategy: SyncStrategy,

    /// Remove a shard directory once its last record is removed
    pub prune_empty_shards: bool,
}

/// Sync strategy for record, schema and metadata writes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncStrategy {
    /// Leave flushing to the OS page cache (fastest)
    OsBuffered,

    /// fsync after every write (safest, slowest)
    EveryWrite,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_dir: PathBuf::from("./data"),
            sync_strategy: SyncStrategy::OsBuffered,
            prune_empty_shards: true,
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Directory holding every table of this configuration
    pub fn tables_dir(&self) -> PathBuf {
        self.base_dir.join("tables")
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the base directory (root for all tables)
    pub fn base_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.base_dir = path.into();
        self
    }

    /// Set the sync strategy
    pub fn sync_strategy(mut self, strategy: SyncStrategy) -> Self {
        self.config.sync_strategy = strategy;
        self
    }

    /// Keep or prune empty shard directories
    pub fn prune_empty_shards(mut self, prune: bool) -> Self {
        self.config.prune_empty_shards = prune;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
