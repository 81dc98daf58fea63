//! Version-specific schema strategies
//!
//! Each schema version layers on top of the previous one: v10 adds row-sharded
//! series keys to v9, v11 wraps v10 with a different label-index encoding, and
//! v12 wraps v11 with the slash-separated external key format. A lookup on the
//! combined strategy resolves the most specific layer first and falls through
//! to the wrapped one.

use crate::bucket::{daily_buckets, Bucket};
use crate::table::PeriodicTableConfig;
use crate::time::Timestamp;

/// Base strategy: daily buckets, unsharded series rows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct V9Entries;

/// Adds row-sharded series keys on top of v9
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct V10Entries {
    /// Fan-out spreading one series' index rows across physical rows
    pub row_shards: u32,
}

/// Wraps v10, altering the label-index entry encoding
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct V11Entries {
    /// The wrapped v10 strategy
    pub inner: V10Entries,
}

/// Wraps v11, changing the external chunk key format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct V12Entries {
    /// The wrapped v11 strategy
    pub inner: V11Entries,
}

impl V11Entries {
    /// Row shard fan-out, delegated to the wrapped layer
    pub fn row_shards(&self) -> u32 {
        self.inner.row_shards
    }
}

impl V12Entries {
    /// Row shard fan-out, delegated to the wrapped layer
    pub fn row_shards(&self) -> u32 {
        self.inner.row_shards()
    }
}

/// The strategy layer stack for one schema version
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeriesEntries {
    /// Base v9 strategy
    V9(V9Entries),
    /// v10: row-sharded series keys
    V10(V10Entries),
    /// v11: v10 plus new label-index encoding
    V11(V11Entries),
    /// v12: v11 plus new external key format
    V12(V12Entries),
}

impl SeriesEntries {
    /// Integer schema version of this strategy
    pub fn version(&self) -> i32 {
        match self {
            Self::V9(_) => 9,
            Self::V10(_) => 10,
            Self::V11(_) => 11,
            Self::V12(_) => 12,
        }
    }

    /// Row shard fan-out, resolved through the layer stack
    pub fn row_shards(&self) -> u32 {
        match self {
            Self::V9(_) => 0,
            Self::V10(v10) => v10.row_shards,
            Self::V11(v11) => v11.row_shards(),
            Self::V12(v12) => v12.row_shards(),
        }
    }
}

/// A period's bucketing and key strategy
///
/// Couples the version layer stack with the period's index table family so the
/// daily bucketer can resolve physical table names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeriesStoreSchema {
    index_tables: PeriodicTableConfig,
    entries: SeriesEntries,
}

impl SeriesStoreSchema {
    pub(crate) fn new(index_tables: PeriodicTableConfig, entries: SeriesEntries) -> Self {
        Self {
            index_tables,
            entries,
        }
    }

    /// The version layer stack
    pub fn entries(&self) -> &SeriesEntries {
        &self.entries
    }

    /// Integer schema version
    pub fn version(&self) -> i32 {
        self.entries.version()
    }

    /// Row shard fan-out for per-series index rows
    pub fn row_shards(&self) -> u32 {
        self.entries.row_shards()
    }

    /// Split `[from, through]` into daily index buckets for one user
    pub fn buckets(&self, from: Timestamp, through: Timestamp, user_id: &str) -> Vec<Bucket> {
        daily_buckets(&self.index_tables, from, through, user_id)
    }
}
