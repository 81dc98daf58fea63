//! Per-period schema configuration
//!
//! A period is one row of schema configuration: from its effective day onward,
//! it fixes the schema version, the index and chunk table families, and the
//! backends handling them, until the next period takes over.

use serde::{Deserialize, Serialize};

use crate::bucket::{daily_buckets, Bucket};
use crate::error::{Error, Result};
use crate::schema::entries::{SeriesEntries, SeriesStoreSchema, V10Entries, V11Entries, V12Entries, V9Entries};
use crate::schema::DEFAULT_ROW_SHARDS;
use crate::table::PeriodicTableConfig;
use crate::time::{DayTime, Timestamp, SECONDS_IN_DAY};

/// Object store backends that partition chunks into physical tables
///
/// Periods resolving to one of these must configure a chunk table prefix.
const PARTITIONED_OBJECT_STORES: &[&str] = &[
    "cassandra",
    "aws-dynamo",
    "bigtable-hashed",
    "gcp",
    "gcp-columnkey",
    "bigtable",
    "grpc-store",
];

/// Defines the schema and tables to use for a period of time
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodConfig {
    /// First day this period governs, inclusive
    pub from: DayTime,
    /// Type of index client to use
    #[serde(rename = "store")]
    pub index_type: String,
    /// Type of object client to use; if empty, defaults to the index type
    #[serde(rename = "object_store", default)]
    pub object_type: String,
    /// Schema version string, `v9` through `v12`
    pub schema: String,
    /// Table family holding the index
    #[serde(rename = "index")]
    pub index_tables: PeriodicTableConfig,
    /// Table family holding the chunks
    #[serde(rename = "chunks", default)]
    pub chunk_tables: PeriodicTableConfig,
    /// Shard fan-out for per-series row keys; zero means unsharded
    #[serde(default)]
    pub row_shards: u32,

    // Integer form of the schema version, memoized during registry validation
    // for hot-path use.
    #[serde(skip)]
    schema_int: Option<i32>,
}

impl PeriodConfig {
    /// Create a new period config
    pub fn new(
        from: DayTime,
        index_type: impl Into<String>,
        object_type: impl Into<String>,
        schema: impl Into<String>,
        index_tables: PeriodicTableConfig,
        chunk_tables: PeriodicTableConfig,
        row_shards: u32,
    ) -> Self {
        Self {
            from,
            index_type: index_type.into(),
            object_type: object_type.into(),
            schema: schema.into(),
            index_tables,
            chunk_tables,
            row_shards,
            schema_int: None,
        }
    }

    /// The object store handling this period's chunks
    ///
    /// Falls back to the index store type when no object store is set.
    pub fn resolved_object_store(&self) -> &str {
        if self.object_type.is_empty() {
            &self.index_type
        } else {
            &self.object_type
        }
    }

    /// Integer form of the schema version string
    ///
    /// Returns the memoized value when validation has already run; otherwise
    /// parses the trailing digits of `v<digits>`.
    pub fn version_as_int(&self) -> Result<i32> {
        match self.schema_int {
            Some(v) => Ok(v),
            None => parse_schema_version(&self.schema),
        }
    }

    /// Parse and store the integer schema version
    ///
    /// Called once during registry validation so concurrent readers never
    /// observe a half-computed memo.
    pub(crate) fn memoize_version(&mut self) -> Result<()> {
        self.schema_int = Some(parse_schema_version(&self.schema)?);
        Ok(())
    }

    /// Fill in the default row shard count for the configured schema version
    pub(crate) fn apply_defaults(&mut self) {
        if self.row_shards == 0 {
            self.row_shards = default_row_shards(&self.schema);
        }
    }

    /// Validate this period's configuration
    pub fn validate(&self) -> Result<()> {
        // Table periods must line up with the daily bucketing.
        for tables in [&self.index_tables, &self.chunk_tables] {
            if !tables.period.is_zero()
                && tables.period.as_secs() % SECONDS_IN_DAY as u64 != 0
            {
                return Err(Error::InvalidTablePeriod);
            }
        }

        if PARTITIONED_OBJECT_STORES.contains(&self.resolved_object_store())
            && self.chunk_tables.prefix.is_empty()
        {
            return Err(Error::MissingChunkPrefix);
        }

        self.create_schema()?;
        Ok(())
    }

    /// Build the version-specific bucketing and key strategy for this period
    pub fn create_schema(&self) -> Result<SeriesStoreSchema> {
        let entries = match self.schema.as_str() {
            "v9" => SeriesEntries::V9(V9Entries),
            "v10" | "v11" | "v12" => {
                if self.row_shards == 0 {
                    return Err(Error::row_shards_required(self.row_shards, &self.schema));
                }
                let v10 = V10Entries {
                    row_shards: self.row_shards,
                };
                match self.schema.as_str() {
                    "v10" => SeriesEntries::V10(v10),
                    "v11" => SeriesEntries::V11(V11Entries { inner: v10 }),
                    _ => SeriesEntries::V12(V12Entries {
                        inner: V11Entries { inner: v10 },
                    }),
                }
            }
            _ => return Err(Error::invalid_schema_version(&self.schema)),
        };
        Ok(SeriesStoreSchema::new(self.index_tables.clone(), entries))
    }

    /// Split `[from, through]` into daily index buckets for one user
    pub fn daily_buckets(&self, from: Timestamp, through: Timestamp, user_id: &str) -> Vec<Bucket> {
        daily_buckets(&self.index_tables, from, through, user_id)
    }
}

fn default_row_shards(schema: &str) -> u32 {
    match schema {
        "v1" | "v2" | "v3" | "v4" | "v5" | "v6" | "v9" => 0,
        _ => DEFAULT_ROW_SHARDS,
    }
}

fn parse_schema_version(schema: &str) -> Result<i32> {
    let digits = schema
        .strip_prefix('v')
        .ok_or_else(|| Error::invalid_schema_version(schema))?;
    digits
        .parse()
        .map_err(|_| Error::invalid_schema_version(schema))
}

/// Build a daily periodic table config for tests
#[cfg(test)]
pub(crate) fn daily_tables(prefix: &str) -> PeriodicTableConfig {
    PeriodicTableConfig {
        prefix: prefix.to_string(),
        period: std::time::Duration::from_secs(SECONDS_IN_DAY as u64),
        tags: Default::default(),
    }
}
