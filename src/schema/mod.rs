//! Time-sharded schema configuration
//!
//! This module resolves which schema version and table-naming policy governs
//! any point in time. A registry holds an ordered list of periods, each
//! effective from a given day; old data stays resolvable forever because every
//! historical period keeps its own version and key format.

mod entries;
mod key;
mod period;
mod registry;

pub use entries::{SeriesEntries, SeriesStoreSchema, V10Entries, V11Entries, V12Entries, V9Entries};
pub use key::Chunk;
pub use period::PeriodConfig;
pub use registry::SchemaConfig;

/// Default row shard fan-out for schema versions that support row sharding
pub(crate) const DEFAULT_ROW_SHARDS: u32 = 16;
