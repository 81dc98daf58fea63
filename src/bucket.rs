//! Calendar-day bucketing of query time ranges
//!
//! Index lookups are partitioned by UTC day. This module splits a time range
//! into one bucket per day, each carrying day-relative millisecond offsets, the
//! physical index table for that day, and the partition hash key.

use crate::table::PeriodicTableConfig;
use crate::time::{Timestamp, MILLIS_IN_DAY, SECONDS_IN_DAY};

/// One calendar-day partition of a time range
///
/// The hash key carries the bucket's day index; the range offsets are relative
/// to the bucket's own day start so they fit in a u32. For ranges spanning
/// multiple days the offsets are capped at the day boundaries: positive in the
/// first bucket, zero at the start of every later one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bucket {
    /// Start offset within the day, in milliseconds
    pub from: u32,
    /// End offset within the day, in milliseconds
    pub through: u32,
    /// Physical index table covering this day
    pub table_name: String,
    /// Partition hash key, `<user>:d<day index>`
    pub hash_key: String,
    /// Size of the bucket in milliseconds; used downstream when deleting series ids
    pub bucket_size: u32,
}

/// Split `[from, through]` into daily buckets for one user
///
/// Produces one bucket per UTC day overlapped by the range, in ascending day
/// order. Table names are resolved against `index_tables` at each day start.
pub fn daily_buckets(
    index_tables: &PeriodicTableConfig,
    from: Timestamp,
    through: Timestamp,
    user_id: &str,
) -> Vec<Bucket> {
    let from_day = from.unix() / SECONDS_IN_DAY;
    let through_day = through.unix() / SECONDS_IN_DAY;
    let mut result = Vec::new();

    for i in from_day..=through_day {
        let day_start_millis = i * MILLIS_IN_DAY;
        let relative_from = 0.max(from.millis() - day_start_millis);
        let relative_through = MILLIS_IN_DAY.min(through.millis() - day_start_millis);
        result.push(Bucket {
            from: relative_from as u32,
            through: relative_through as u32,
            table_name: index_tables.table_for(Timestamp::from_unix(i * SECONDS_IN_DAY)),
            hash_key: format!("{}:d{}", user_id, i),
            bucket_size: MILLIS_IN_DAY as u32,
        });
    }
    result
}
