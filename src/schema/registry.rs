//! The schema period registry
//!
//! Holds the ordered list of schema periods and resolves which one governs a
//! point in time. The registry is validated once at startup and then shared
//! read-only; the split operation is the one mutator and takes `&mut self` so
//! the borrow checker keeps it exclusive.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::schema::period::PeriodConfig;
use crate::time::{DayTime, Timestamp};

/// Ordered registry of schema periods
///
/// Periods must be sorted by effective day, strictly increasing; `validate`
/// enforces this along with each period's own checks. After validation the
/// registry is treated as immutable shared state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaConfig {
    /// The schema periods, sorted by `from` ascending
    pub configs: Vec<PeriodConfig>,
}

impl SchemaConfig {
    /// Create a registry from a period list
    pub fn new(configs: Vec<PeriodConfig>) -> Self {
        Self { configs }
    }

    /// Validate the registry, applying per-period defaults
    ///
    /// Any failure is a terminal configuration fault; there is no partial
    /// registry. Integer schema versions are memoized here so later resolution
    /// calls stay read-only.
    pub fn validate(&mut self) -> Result<()> {
        for i in 0..self.configs.len() {
            let period = &mut self.configs[i];
            period.apply_defaults();
            period.memoize_version()?;
            period.validate()?;

            if i + 1 < self.configs.len()
                && self.configs[i].from.timestamp() >= self.configs[i + 1].from.timestamp()
            {
                return Err(Error::NonMonotonicPeriods);
            }
        }
        Ok(())
    }

    /// The schema period governing a point in time
    pub fn schema_for_time(&self, t: Timestamp) -> Result<&PeriodConfig> {
        // Relies on the validated sort order: the governing period is the one
        // whose `from` is the last at or before t.
        for (i, config) in self.configs.iter().enumerate() {
            if t >= config.from.timestamp()
                && (i + 1 == self.configs.len() || t < self.configs[i + 1].from.timestamp())
            {
                return Ok(config);
            }
        }
        Err(Error::NoPeriodForTime(t))
    }

    /// The chunk table shard for a point in time
    pub fn chunk_table_for(&self, t: Timestamp) -> Result<String> {
        let config = self.schema_for_time(t)?;
        Ok(config.chunk_tables.table_for(t))
    }

    /// Call `f` on every period starting at or after `t`, splitting the period
    /// that straddles `t` so a boundary exists exactly there
    ///
    /// The straddling period is duplicated, the copy's `from` set to `t`, and
    /// the copy inserted immediately after the original; `f` then runs on the
    /// copy and everything later. Sortedness and `from`-uniqueness are
    /// preserved, and calling again with the same `t` finds the boundary
    /// already in place, so the operation is idempotent.
    pub fn for_each_after<F>(&mut self, t: Timestamp, mut f: F)
    where
        F: FnMut(&mut PeriodConfig),
    {
        let mut i = 0;
        while i < self.configs.len() {
            if t > self.configs[i].from.timestamp()
                && (i + 1 == self.configs.len() || t < self.configs[i + 1].from.timestamp())
            {
                let mut split = self.configs[i].clone();
                split.from = DayTime::from_raw(t);
                self.configs.insert(i + 1, split);
            }
            if self.configs[i].from.timestamp() >= t {
                f(&mut self.configs[i]);
            }
            i += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::period::daily_tables;
    use crate::time::MILLIS_IN_DAY;
    use proptest::prelude::*;

    fn period(from: &str, schema: &str) -> PeriodConfig {
        let row_shards = if schema == "v9" { 0 } else { 16 };
        PeriodConfig::new(
            from.parse().unwrap(),
            "bigtable",
            "",
            schema,
            daily_tables("index_"),
            daily_tables("chunks_"),
            row_shards,
        )
    }

    fn registry() -> SchemaConfig {
        let mut cfg = SchemaConfig::new(vec![
            period("2020-01-01", "v9"),
            period("2020-06-01", "v10"),
            period("2021-01-01", "v12"),
        ]);
        cfg.validate().unwrap();
        cfg
    }

    fn day(s: &str) -> Timestamp {
        s.parse::<DayTime>().unwrap().timestamp()
    }

    #[test]
    fn test_validate_accepts_increasing_periods() {
        registry();
    }

    #[test]
    fn test_validate_rejects_duplicate_from() {
        let mut cfg = SchemaConfig::new(vec![
            period("2020-01-01", "v9"),
            period("2020-01-01", "v10"),
        ]);
        assert!(matches!(cfg.validate(), Err(Error::NonMonotonicPeriods)));
    }

    #[test]
    fn test_validate_rejects_decreasing_from() {
        let mut cfg = SchemaConfig::new(vec![
            period("2020-06-01", "v9"),
            period("2020-01-01", "v10"),
        ]);
        assert!(matches!(cfg.validate(), Err(Error::NonMonotonicPeriods)));
    }

    #[test]
    fn test_validate_row_shard_rules() {
        let mut cfg = SchemaConfig::new(vec![period("2020-01-01", "v8")]);
        assert!(matches!(
            cfg.validate(),
            Err(Error::InvalidSchemaVersion(_))
        ));

        let mut cfg = SchemaConfig::new(vec![period("2020-01-01", "v9")]);
        assert!(cfg.validate().is_ok());
        assert_eq!(cfg.configs[0].row_shards, 0);

        // Registry validation fills the default fan-out before the per-period
        // check, so an unset v10 count passes with the default applied.
        let mut v10 = period("2020-01-01", "v10");
        v10.row_shards = 0;
        let mut cfg = SchemaConfig::new(vec![v10]);
        assert!(cfg.validate().is_ok());
        assert_eq!(cfg.configs[0].row_shards, 16);
    }

    #[test]
    fn test_schema_for_time_picks_governing_period() {
        let cfg = registry();

        assert_eq!(cfg.schema_for_time(day("2020-01-01")).unwrap().schema, "v9");
        assert_eq!(cfg.schema_for_time(day("2020-05-31")).unwrap().schema, "v9");
        assert_eq!(cfg.schema_for_time(day("2020-06-01")).unwrap().schema, "v10");
        // Last period governs everything after its from.
        assert_eq!(cfg.schema_for_time(day("2030-01-01")).unwrap().schema, "v12");
    }

    #[test]
    fn test_schema_for_time_before_first_period_fails() {
        let cfg = registry();
        let early = day("2019-12-31");
        assert!(matches!(
            cfg.schema_for_time(early),
            Err(Error::NoPeriodForTime(_))
        ));
    }

    #[test]
    fn test_chunk_table_for_resolves_through_governing_period() {
        let cfg = registry();
        let t = day("2020-01-02");
        let expected_index = t.millis() / MILLIS_IN_DAY;
        assert_eq!(
            cfg.chunk_table_for(t).unwrap(),
            format!("chunks_{}", expected_index)
        );

        assert!(cfg.chunk_table_for(day("2019-01-01")).is_err());
    }

    #[test]
    fn test_for_each_after_splits_straddling_period() {
        let mut cfg = registry();
        let cutoff = day("2020-03-01");

        let mut visited = Vec::new();
        cfg.for_each_after(cutoff, |p| visited.push(p.from.timestamp()));

        // The v9 period was split at the cutoff; the new boundary and both
        // later periods were visited.
        assert_eq!(cfg.configs.len(), 4);
        assert_eq!(cfg.configs[1].from.timestamp(), cutoff);
        assert_eq!(cfg.configs[1].schema, "v9");
        assert_eq!(
            visited,
            vec![cutoff, day("2020-06-01"), day("2021-01-01")]
        );

        // Still sorted with distinct boundaries.
        for pair in cfg.configs.windows(2) {
            assert!(pair[0].from.timestamp() < pair[1].from.timestamp());
        }
    }

    #[test]
    fn test_for_each_after_on_existing_boundary_does_not_split() {
        let mut cfg = registry();
        cfg.for_each_after(day("2020-06-01"), |_| {});
        assert_eq!(cfg.configs.len(), 3);
    }

    #[test]
    fn test_for_each_after_can_mutate_visited_periods() {
        let mut cfg = registry();
        cfg.for_each_after(day("2020-03-01"), |p| {
            p.index_type = "override".to_string();
        });

        assert_eq!(cfg.configs[0].index_type, "bigtable");
        for p in &cfg.configs[1..] {
            assert_eq!(p.index_type, "override");
        }
    }

    proptest! {
        /// Splitting twice at the same cutoff is the same as splitting once.
        #[test]
        fn prop_for_each_after_is_idempotent(offset_days in 0i64..400) {
            let cutoff = Timestamp::from_millis(
                day("2020-01-01").millis() + offset_days * MILLIS_IN_DAY,
            );

            let mut once = registry();
            once.for_each_after(cutoff, |_| {});

            let mut twice = registry();
            twice.for_each_after(cutoff, |_| {});
            twice.for_each_after(cutoff, |_| {});

            prop_assert_eq!(once.configs, twice.configs);
        }
    }
}
