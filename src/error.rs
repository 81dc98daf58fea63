//! Error handling for timeshard
//!
//! This module provides the error type and result alias shared across the
//! crate. All variants except [`Error::NoPeriodForTime`] are terminal
//! configuration faults that must abort registry construction.

use thiserror::Error;

use crate::time::Timestamp;

/// Errors that can occur while building or querying a schema registry
#[derive(Error, Debug)]
pub enum Error {
    /// A day-aligned time string did not match `YYYY-MM-DD`
    #[error("invalid day format: {0:?} (expected YYYY-MM-DD)")]
    InvalidDayFormat(String),

    /// A schema version string was not of the form `v<digits>`
    #[error("invalid schema version: {0:?}")]
    InvalidSchemaVersion(String),

    /// A table sharding period was not a whole multiple of 24h
    #[error("the table period must be a multiple of 24h")]
    InvalidTablePeriod,

    /// The object store requires table partitioning but no chunk prefix was set
    #[error("schema config for chunks is missing the 'prefix' setting")]
    MissingChunkPrefix,

    /// Schema version requires a positive row shard count
    #[error("must have row_shards > 0 (current: {row_shards}) for schema ({schema})")]
    RowShardsRequired {
        /// Configured shard fan-out
        row_shards: u32,
        /// Schema version string of the offending period
        schema: String,
    },

    /// Period `from` times were not distinct and strictly increasing
    #[error("from time in schemas must be distinct and in increasing order")]
    NonMonotonicPeriods,

    /// A query time precedes every configured period
    #[error("no schema period found for time {0}")]
    NoPeriodForTime(Timestamp),
}

/// Result type for timeshard operations
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create a new invalid day format error
    pub fn invalid_day_format(input: impl Into<String>) -> Self {
        Self::InvalidDayFormat(input.into())
    }

    /// Create a new invalid schema version error
    pub fn invalid_schema_version(version: impl Into<String>) -> Self {
        Self::InvalidSchemaVersion(version.into())
    }

    /// Create a new row shards error
    pub fn row_shards_required(row_shards: u32, schema: impl Into<String>) -> Self {
        Self::RowShardsRequired {
            row_shards,
            schema: schema.into(),
        }
    }

    /// Check if this is a validation fault that must abort registry construction
    pub fn is_build_fault(&self) -> bool {
        !matches!(self, Self::NoPeriodForTime(_))
    }

    /// Check if this is the out-of-range query condition
    pub fn is_no_period(&self) -> bool {
        matches!(self, Self::NoPeriodForTime(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let err = Error::invalid_day_format("2020/01/01");
        assert!(matches!(err, Error::InvalidDayFormat(_)));
        assert!(err.is_build_fault());

        let err = Error::invalid_schema_version("v1x");
        assert!(matches!(err, Error::InvalidSchemaVersion(_)));

        let err = Error::row_shards_required(0, "v10");
        assert!(err.to_string().contains("row_shards > 0"));
        assert!(err.to_string().contains("v10"));
    }

    #[test]
    fn test_no_period_is_runtime_condition() {
        let err = Error::NoPeriodForTime(Timestamp::from_unix(0));
        assert!(err.is_no_period());
        assert!(!err.is_build_fault());
    }
}
