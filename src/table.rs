//! Periodic table naming and enumeration
//!
//! A periodic table family splits one logical table into physical shards, each
//! covering a fixed-length window of time since the Unix epoch. This module
//! computes the shard name for a point in time and enumerates the descriptors
//! needed to cover a time range, delegating capacity decisions to an external
//! provisioner.

use std::collections::HashMap;
use std::time::Duration;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::time::Timestamp;

/// Opaque labels passed through to the provisioner on every table descriptor
pub type Tags = HashMap<String, String>;

/// Configuration for a set of time-sharded tables
///
/// A zero period means the family is a single static table named exactly
/// `prefix`; otherwise the table for time `t` is `prefix` followed by the
/// decimal shard index `t / period`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PeriodicTableConfig {
    /// Table name prefix
    pub prefix: String,
    /// Length of the window covered by one shard; zero disables sharding
    pub period: Duration,
    /// Labels forwarded to the provisioner
    pub tags: Tags,
}

/// External capacity provisioner for periodic tables
///
/// Implementations build cloud-provider table descriptors; this crate only
/// decides which tables exist and whether each is in its active window.
pub trait Provisioner {
    /// Descriptor type produced for each table
    type Desc;

    /// How many inactive shards, counted back from the current shard, keep
    /// write autoscaling enabled
    fn inactive_write_scale_last_n(&self) -> i64;

    /// Build a descriptor for a shard whose window overlaps the present
    fn active_table(&self, name: &str, tags: &Tags) -> Self::Desc;

    /// Build a descriptor for a dormant shard
    fn inactive_table(&self, name: &str, tags: &Tags, disable_write_autoscale: bool)
        -> Self::Desc;
}

impl PeriodicTableConfig {
    /// Calculate the table shard name for a given point in time
    pub fn table_for(&self, t: Timestamp) -> String {
        if self.period.is_zero() {
            // non-periodic
            return self.prefix.clone();
        }
        let period_secs = self.period.as_secs() as i64;
        self.table_for_period(t.unix() / period_secs)
    }

    fn table_for_period(&self, i: i64) -> String {
        format!("{}{}", self.prefix, i)
    }

    /// Enumerate descriptors for every shard whose window intersects
    /// `[from, through]`, classified against the current wall-clock time
    ///
    /// See [`periodic_tables_at`](Self::periodic_tables_at) for the semantics;
    /// the clock is read exactly once per call.
    ///
    /// # Panics
    ///
    /// Panics if the sharding period is zero.
    pub fn periodic_tables<P: Provisioner>(
        &self,
        from: Timestamp,
        through: Timestamp,
        provisioner: &P,
        begin_grace: Duration,
        end_grace: Duration,
        retention: Duration,
    ) -> Vec<P::Desc> {
        self.periodic_tables_at(
            Timestamp::now(),
            from,
            through,
            provisioner,
            begin_grace,
            end_grace,
            retention,
        )
    }

    /// Enumerate shard descriptors for `[from, through]` against an explicit clock
    ///
    /// A shard is active when `now` falls within
    /// `[shard_start - begin_grace, shard_end + end_grace)`; active shards get
    /// the provisioner's active policy, dormant shards the inactive policy. A
    /// dormant shard further back than the provisioner's last-N window behind
    /// the current shard has write autoscaling disabled. When `through` lands
    /// exactly on a period boundary the boundary shard belongs to the next
    /// window and is excluded. A non-zero `retention` caps how far back the
    /// enumeration reaches; it never extends it.
    ///
    /// # Panics
    ///
    /// Panics if the sharding period is zero.
    #[allow(clippy::too_many_arguments)]
    pub fn periodic_tables_at<P: Provisioner>(
        &self,
        now: Timestamp,
        from: Timestamp,
        through: Timestamp,
        provisioner: &P,
        begin_grace: Duration,
        end_grace: Duration,
        retention: Duration,
    ) -> Vec<P::Desc> {
        let period_secs = self.period.as_secs() as i64;
        let begin_grace_secs = begin_grace.as_secs() as i64;
        let end_grace_secs = end_grace.as_secs() as i64;
        let now_secs = now.unix();

        let mut first_table = from.unix() / period_secs;
        let mut last_table = through.unix() / period_secs;
        let tables_to_keep = retention.as_secs() as i64 / period_secs;
        let now_table = now_secs / period_secs;

        // If the interval ends exactly on a period boundary, don't include the
        // upcoming period.
        if through.unix() % period_secs == 0 {
            last_table -= 1;
        }

        // Don't make tables further back than the configured retention.
        if !retention.is_zero() && last_table > tables_to_keep && last_table - first_table >= tables_to_keep
        {
            first_table = last_table - tables_to_keep;
        }

        let mut result = Vec::new();
        for i in first_table..=last_table {
            let table_name = self.table_for_period(i);

            // If now is within [start - begin_grace, end + end_grace), the
            // shard still needs write throughput.
            let start_secs = i * period_secs;
            let desc = if start_secs - begin_grace_secs <= now_secs
                && now_secs < start_secs + period_secs + end_grace_secs
            {
                debug!(table = %table_name, "table is active");
                provisioner.active_table(&table_name, &self.tags)
            } else {
                // Autoscaling is kept on the last N dormant shards, measured
                // against the shard the clock currently falls in.
                let disable_write_autoscale =
                    i < now_table - provisioner.inactive_write_scale_last_n();
                debug!(table = %table_name, disable_write_autoscale, "table is inactive");
                provisioner.inactive_table(&table_name, &self.tags, disable_write_autoscale)
            };
            result.push(desc);
        }
        result
    }
}
