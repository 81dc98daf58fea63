//! # Timeshard
//!
//! A time-sharded schema registry and key-encoding engine for chunk-based
//! log and metric storage.
//!
//! Storage clusters reconfigure over time: new schema versions, new table
//! layouts, new backends. Data written under an old configuration must stay
//! readable forever, so the registry keeps every historical period and
//! resolves, for any timestamp, which schema version and table-naming policy
//! governs it.
//!
//! ## What this crate computes
//!
//! - **Periodic table names**: the physical index/chunk table shard covering a
//!   point in time, plus provisioning descriptors for every shard in a range
//! - **Daily buckets**: a query range split into calendar-day index partitions
//! - **Schema resolution**: which period, version, and strategy governs a time
//! - **External keys**: the version-specific string identity of a stored chunk
//!
//! It performs no I/O and talks to no backend; storage clients and table
//! provisioners consume its output.
//!
//! ## Usage
//!
//! ```
//! use timeshard::{PeriodConfig, PeriodicTableConfig, SchemaConfig, Timestamp};
//!
//! let mut registry = SchemaConfig::new(vec![PeriodConfig::new(
//!     "2020-01-01".parse().unwrap(),
//!     "bigtable",
//!     "",
//!     "v12",
//!     PeriodicTableConfig {
//!         prefix: "index_".to_string(),
//!         period: std::time::Duration::from_secs(7 * 24 * 3600),
//!         tags: Default::default(),
//!     },
//!     PeriodicTableConfig {
//!         prefix: "chunks_".to_string(),
//!         period: std::time::Duration::from_secs(7 * 24 * 3600),
//!         tags: Default::default(),
//!     },
//!     16,
//! )]);
//! registry.validate().unwrap();
//!
//! let t = Timestamp::from_unix(1_600_000_000);
//! let table = registry.chunk_table_for(t).unwrap();
//! assert_eq!(table, "chunks_2645");
//! ```
//!
//! The registry is built and validated once at startup, then shared read-only;
//! every resolution call is a pure function over that snapshot.

#![warn(missing_docs)]

pub mod bucket;
pub mod error;
pub mod schema;
pub mod table;
pub mod time;

pub use bucket::{daily_buckets, Bucket};
pub use error::{Error, Result};
pub use schema::{Chunk, PeriodConfig, SchemaConfig, SeriesEntries, SeriesStoreSchema};
pub use table::{PeriodicTableConfig, Provisioner, Tags};
pub use time::{DayTime, Timestamp, MILLIS_IN_DAY, SECONDS_IN_DAY};
