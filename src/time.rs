//! Timestamp types for schema period math
//!
//! Provides a millisecond-resolution timestamp used for all range calculations,
//! and a day-aligned timestamp that marshals to/from the `YYYY-MM-DD` form used
//! in schema configuration.

use std::fmt;
use std::str::FromStr;
use chrono::{DateTime, NaiveDate, NaiveTime, TimeZone, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::Error;

/// Number of seconds in one UTC day
pub const SECONDS_IN_DAY: i64 = 24 * 60 * 60;

/// Number of milliseconds in one UTC day
pub const MILLIS_IN_DAY: i64 = SECONDS_IN_DAY * 1000;

/// A point in time with millisecond resolution, measured from the Unix epoch
///
/// All table-sharding and bucketing arithmetic runs on this type. Division by
/// period lengths deliberately truncates toward zero; shard routing for
/// already-persisted data depends on that convention, so it must not change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(i64);

impl Timestamp {
    /// Create a timestamp from milliseconds since the Unix epoch
    pub fn from_millis(millis: i64) -> Self {
        Self(millis)
    }

    /// Create a timestamp from whole seconds since the Unix epoch
    pub fn from_unix(secs: i64) -> Self {
        Self(secs * 1000)
    }

    /// Create a timestamp from a chrono UTC date-time, discarding sub-millisecond precision
    pub fn from_date_time(dt: &DateTime<Utc>) -> Self {
        Self(dt.timestamp_millis())
    }

    /// The current wall-clock time
    pub fn now() -> Self {
        Self(Utc::now().timestamp_millis())
    }

    /// Milliseconds since the Unix epoch
    pub fn millis(&self) -> i64 {
        self.0
    }

    /// Whole seconds since the Unix epoch, truncated toward zero
    pub fn unix(&self) -> i64 {
        self.0 / 1000
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A timestamp restricted to day granularity
///
/// Schema period boundaries are always day-granular. The wrapped timestamp is
/// guaranteed to sit on a UTC midnight; construction from an arbitrary
/// timestamp silently floors to the start of the day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DayTime(Timestamp);

impl DayTime {
    /// Create a day-aligned time from an arbitrary timestamp, flooring to UTC midnight
    pub fn from_timestamp(t: Timestamp) -> Self {
        Self(Timestamp::from_millis(
            t.millis().div_euclid(MILLIS_IN_DAY) * MILLIS_IN_DAY,
        ))
    }

    /// Wrap a timestamp verbatim, without flooring
    ///
    /// Used when splitting a schema period at a cutoff: the new boundary keeps
    /// the cutoff's exact position even when it is not day-aligned.
    pub(crate) fn from_raw(t: Timestamp) -> Self {
        Self(t)
    }

    /// Create a day-aligned time from a calendar date
    pub fn from_date(date: NaiveDate) -> Self {
        let midnight = date.and_time(NaiveTime::MIN).and_utc();
        Self(Timestamp::from_millis(midnight.timestamp_millis()))
    }

    /// The first instant of the day, as a full-resolution timestamp
    pub fn timestamp(&self) -> Timestamp {
        self.0
    }
}

impl FromStr for DayTime {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let date = NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .map_err(|_| Error::invalid_day_format(s))?;
        Ok(Self::from_date(date))
    }
}

impl fmt::Display for DayTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match Utc.timestamp_millis_opt(self.0.millis()).single() {
            Some(dt) => write!(f, "{}", dt.format("%Y-%m-%d")),
            None => Err(fmt::Error),
        }
    }
}

impl Serialize for DayTime {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for DayTime {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
