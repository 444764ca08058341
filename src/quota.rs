//! Usage tracker — per-key, per-day quota accounting.
//!
//! Leaf component: knows nothing about rotation policy. One mutex guards
//! the whole bucket map so reads, writes, and pruning stay consistent —
//! no per-key locks. Days are UTC calendar days; after rollover the old
//! buckets simply stop matching and read as zero until pruned.

use chrono::{NaiveDate, Utc};
use std::collections::HashMap;
use std::sync::Mutex;

use crate::error::RotatorError;

/// Default daily quota ceiling, in units.
pub const DEFAULT_DAILY_QUOTA: u64 = 10_000;

/// Composite bucket key: (credential, UTC calendar day).
#[derive(Debug, Clone, Hash, PartialEq, Eq)]
struct UsageKey {
    key: String,
    day: NaiveDate,
}

/// Thread-safe store of per-key daily usage.
pub struct UsageTracker {
    buckets: Mutex<HashMap<UsageKey, u64>>,
    daily_quota: u64,
}

impl UsageTracker {
    pub fn new(daily_quota: u64) -> Self {
        Self {
            buckets: Mutex::new(HashMap::new()),
            // A zero ceiling has no meaningful percentage; clamp.
            daily_quota: daily_quota.max(1),
        }
    }

    /// The bucket day for "now".
    fn today() -> NaiveDate {
        Utc::now().date_naive()
    }

    /// Record `units` against `key` for today, creating the bucket if
    /// absent. Negative units are rejected before any bucket is touched.
    pub fn record_usage(&self, key: &str, units: i64) -> Result<(), RotatorError> {
        if units < 0 {
            return Err(RotatorError::InvalidUsage { units });
        }
        self.record_on(key, units as u64, Self::today());
        Ok(())
    }

    fn record_on(&self, key: &str, units: u64, day: NaiveDate) {
        let mut buckets = self.buckets.lock().unwrap();
        let bucket = buckets
            .entry(UsageKey {
                key: key.to_string(),
                day,
            })
            .or_insert(0);
        *bucket = bucket.saturating_add(units);
    }

    /// Usage percentage for `key` today, against the daily ceiling.
    /// Unknown keys and untouched days read as 0.0; never fails.
    pub fn usage_percentage(&self, key: &str) -> f64 {
        self.percentage_on(key, Self::today())
    }

    fn percentage_on(&self, key: &str, day: NaiveDate) -> f64 {
        let buckets = self.buckets.lock().unwrap();
        match buckets.get(&UsageKey {
            key: key.to_string(),
            day,
        }) {
            Some(units) => (*units as f64 / self.daily_quota as f64) * 100.0,
            None => 0.0,
        }
    }

    /// Drop every bucket whose day is not `today`. Idempotent.
    pub fn prune_stale(&self, today: NaiveDate) {
        let mut buckets = self.buckets.lock().unwrap();
        buckets.retain(|k, _| k.day == today);
    }
}
