//! Rotation manager — one "current key" over a validated pool.
//!
//! Rotation fires when the current key has been held past the configured
//! interval or has eaten through the quota threshold for the day.
//! Selection policy lives in [`select`]; usage bookkeeping is delegated
//! to [`crate::quota::UsageTracker`].

pub mod select;

use chrono::{DateTime, Duration, Utc};
use rand::Rng;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use zeroize::Zeroize;

use crate::audit::{mask_key, AuditEvent, AuditKind, AuditSink};
use crate::config::{RotatorConfig, SelectionStrategy};
use crate::error::RotatorError;
use crate::quota::UsageTracker;
use crate::validate::KeyValidator;

/// Mutable rotation state. The mutex around it is the rotation critical
/// section; the tracker has its own lock, always acquired inside this one.
#[derive(Debug)]
struct RotationState {
    current: usize,
    last_rotation: Option<DateTime<Utc>>,
}

/// Hands out the current credential from a validated pool, rotating on
/// time and quota triggers. Shareable across threads behind an `Arc`.
pub struct KeyRotationManager {
    /// Validated pool in rotation order. Immutable after construction.
    keys: Vec<String>,
    strategy: SelectionStrategy,
    rotation_interval: Duration,
    quota_threshold: f64,
    tracker: UsageTracker,
    state: Mutex<RotationState>,
    audit: Arc<dyn AuditSink>,
}

impl KeyRotationManager {
    /// Validate the pool and select the initial key.
    ///
    /// Every candidate is checked with `validator`; failures are audited
    /// and the key is dropped, never surfaced individually. Construction
    /// fails only when the configuration is rejected or the whole pool
    /// washes out.
    pub async fn new(
        config: RotatorConfig,
        validator: &dyn KeyValidator,
        audit: Arc<dyn AuditSink>,
    ) -> Result<Self, RotatorError> {
        config.validate()?;

        let mut keys = Vec::with_capacity(config.api_keys.len());
        for key in &config.api_keys {
            match validator.validate(key).await {
                Ok(()) => keys.push(key.clone()),
                Err(e) => {
                    audit.emit(AuditEvent {
                        kind: AuditKind::KeyRejected,
                        masked_key: mask_key(key),
                        detail: format!("discarded from pool: {}", e),
                    });
                }
            }
        }

        if keys.is_empty() {
            return Err(RotatorError::NoValidKey);
        }

        let current = match config.selection_strategy {
            SelectionStrategy::Sequential => 0,
            SelectionStrategy::Random => rand::thread_rng().gen_range(0..keys.len()),
        };

        let manager = Self {
            strategy: config.selection_strategy,
            rotation_interval: Duration::minutes(config.rotation_interval_minutes as i64),
            quota_threshold: config.quota_threshold,
            tracker: UsageTracker::new(config.daily_quota),
            state: Mutex::new(RotationState {
                current,
                last_rotation: Some(Utc::now()),
            }),
            audit,
            keys,
        };

        manager.audit.emit(AuditEvent {
            kind: AuditKind::InitialSelection,
            masked_key: mask_key(&manager.keys[current]),
            detail: "initial key selected".to_string(),
        });

        Ok(manager)
    }

    /// The current key, rotating first if a trigger fires.
    pub fn get_current_key(&self) -> Result<String, RotatorError> {
        self.current_key_at(Utc::now())
    }

    fn current_key_at(&self, now: DateTime<Utc>) -> Result<String, RotatorError> {
        let mut state = self.state.lock().unwrap();
        if self.should_rotate(&state, now) {
            self.rotate_locked(&mut state, now)?;
        }
        Ok(self.keys[state.current].clone())
    }

    /// Trigger check: key held past the interval, usage at or past the
    /// threshold, or no rotation timestamp at all.
    fn should_rotate(&self, state: &RotationState, now: DateTime<Utc>) -> bool {
        let Some(last) = state.last_rotation else {
            return true;
        };
        if now - last >= self.rotation_interval {
            return true;
        }
        self.tracker.usage_percentage(&self.keys[state.current]) >= self.quota_threshold
    }

    /// Rotate now, regardless of triggers.
    pub fn rotate_key(&self) -> Result<(), RotatorError> {
        let mut state = self.state.lock().unwrap();
        self.rotate_locked(&mut state, Utc::now())
    }

    /// The rotation step. On failure the state is left exactly as it was.
    fn rotate_locked(
        &self,
        state: &mut RotationState,
        now: DateTime<Utc>,
    ) -> Result<(), RotatorError> {
        let available: Vec<usize> = (0..self.keys.len())
            .filter(|&i| self.tracker.usage_percentage(&self.keys[i]) < self.quota_threshold)
            .collect();

        let next = match self.strategy {
            SelectionStrategy::Sequential => {
                select::next_sequential(self.keys.len(), state.current, &available)
            }
            SelectionStrategy::Random => select::pick_random(&available),
        }
        .ok_or(RotatorError::QuotaExceeded)?;

        let outgoing = mask_key(&self.keys[state.current]);
        let outgoing_usage = self.tracker.usage_percentage(&self.keys[state.current]);

        state.current = next;
        state.last_rotation = Some(now);

        self.audit.emit(AuditEvent {
            kind: AuditKind::Rotation,
            masked_key: mask_key(&self.keys[next]),
            detail: format!(
                "rotated off {} at {:.1}% of daily quota",
                outgoing, outgoing_usage
            ),
        });

        Ok(())
    }

    /// Book `units` against the current key. Negative units are rejected
    /// with nothing recorded.
    pub fn record_quota_usage(&self, units: i64) -> Result<(), RotatorError> {
        let key = {
            let state = self.state.lock().unwrap();
            self.keys[state.current].clone()
        };
        self.tracker.record_usage(&key, units)?;

        self.audit.emit(AuditEvent {
            kind: AuditKind::UsageRecorded,
            masked_key: mask_key(&key),
            detail: format!(
                "{} units recorded, at {:.1}% of daily quota",
                units,
                self.tracker.usage_percentage(&key)
            ),
        });
        Ok(())
    }

    /// Today's usage percentage for every pool key, keyed by masked
    /// credential.
    pub fn quota_status(&self) -> HashMap<String, f64> {
        self.keys
            .iter()
            .map(|k| (mask_key(k), self.tracker.usage_percentage(k)))
            .collect()
    }

    /// Drop usage buckets from previous days. Callers decide when; the
    /// percentage reads ignore stale days either way.
    pub fn prune_stale_usage(&self) {
        self.tracker.prune_stale(Utc::now().date_naive());
    }

    /// Number of keys that survived validation.
    pub fn pool_size(&self) -> usize {
        self.keys.len()
    }
}

impl Drop for KeyRotationManager {
    fn drop(&mut self) {
        for key in &mut self.keys {
            key.zeroize();
        }
    }
}
