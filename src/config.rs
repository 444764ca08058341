//! Pool configuration — caller-supplied, immutable after construction.
//!
//! Defaults: rotate hourly, mark a key unavailable at 90% of its daily
//! quota, walk the pool in order. Constraints are checked once by the
//! manager before any key is validated.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

use crate::error::RotatorError;

/// How the next key is chosen during rotation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SelectionStrategy {
    /// Round-robin in pool order, skipping exhausted keys.
    #[default]
    Sequential,
    /// Uniform pick among keys still under the threshold.
    Random,
}

/// Accepted pool size range. The bounds are part of the configuration so
/// deployments with smaller key inventories can narrow them.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PoolLimits {
    pub min_keys: usize,
    pub max_keys: usize,
}

impl Default for PoolLimits {
    fn default() -> Self {
        Self {
            min_keys: 100,
            max_keys: 10_000,
        }
    }
}

/// Configuration for a [`crate::pool::KeyRotationManager`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RotatorConfig {
    /// Candidate credentials, in rotation order. Must be distinct.
    pub api_keys: Vec<String>,
    /// Time-based rotation trigger, in minutes (1–1440).
    #[serde(default = "default_rotation_interval")]
    pub rotation_interval_minutes: u64,
    /// Usage percentage at which a key sits out the rest of the day, (0, 100].
    #[serde(default = "default_quota_threshold")]
    pub quota_threshold: f64,
    #[serde(default)]
    pub selection_strategy: SelectionStrategy,
    /// Daily quota ceiling per key, in units.
    #[serde(default = "default_daily_quota")]
    pub daily_quota: u64,
    #[serde(default)]
    pub pool_limits: PoolLimits,
}

fn default_rotation_interval() -> u64 {
    60
}

fn default_quota_threshold() -> f64 {
    90.0
}

fn default_daily_quota() -> u64 {
    crate::quota::DEFAULT_DAILY_QUOTA
}

impl RotatorConfig {
    /// Config with defaults for everything but the pool itself.
    pub fn new(api_keys: Vec<String>) -> Self {
        Self {
            api_keys,
            rotation_interval_minutes: default_rotation_interval(),
            quota_threshold: default_quota_threshold(),
            selection_strategy: SelectionStrategy::default(),
            daily_quota: default_daily_quota(),
            pool_limits: PoolLimits::default(),
        }
    }

    /// Load a config from a YAML file.
    pub fn from_yaml_file(path: &Path) -> Result<Self, RotatorError> {
        let raw = std::fs::read_to_string(path).map_err(|e| RotatorError::InvalidConfig {
            reason: format!("cannot read {}: {}", path.display(), e),
        })?;
        serde_yaml::from_str(&raw).map_err(|e| RotatorError::InvalidConfig {
            reason: format!("cannot parse {}: {}", path.display(), e),
        })
    }

    /// Check every constraint.
    pub fn validate(&self) -> Result<(), RotatorError> {
        let limits = self.pool_limits;
        if limits.min_keys == 0 || limits.min_keys > limits.max_keys {
            return Err(invalid(format!(
                "pool limits {}..{} are not a usable range",
                limits.min_keys, limits.max_keys
            )));
        }
        if self.api_keys.len() < limits.min_keys || self.api_keys.len() > limits.max_keys {
            return Err(invalid(format!(
                "pool has {} keys, expected between {} and {}",
                self.api_keys.len(),
                limits.min_keys,
                limits.max_keys
            )));
        }
        let distinct: HashSet<&String> = self.api_keys.iter().collect();
        if distinct.len() != self.api_keys.len() {
            return Err(invalid("pool contains duplicate keys".to_string()));
        }
        if !(1..=1440).contains(&self.rotation_interval_minutes) {
            return Err(invalid(format!(
                "rotation interval must be 1-1440 minutes, got {}",
                self.rotation_interval_minutes
            )));
        }
        if !self.quota_threshold.is_finite()
            || self.quota_threshold <= 0.0
            || self.quota_threshold > 100.0
        {
            return Err(invalid(format!(
                "quota threshold must be in (0, 100], got {}",
                self.quota_threshold
            )));
        }
        if self.daily_quota == 0 {
            return Err(invalid("daily quota ceiling must be positive".to_string()));
        }
        Ok(())
    }
}

fn invalid(reason: String) -> RotatorError {
    RotatorError::InvalidConfig { reason }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn small_pool_config(n: usize) -> RotatorConfig {
        let mut cfg = RotatorConfig::new((0..n).map(|i| format!("key-{}", i)).collect());
        cfg.pool_limits = PoolLimits {
            min_keys: 1,
            max_keys: 10,
        };
        cfg
    }

    #[test]
    fn test_defaults() {
        let cfg = RotatorConfig::new(vec![]);
        assert_eq!(cfg.rotation_interval_minutes, 60);
        assert_eq!(cfg.quota_threshold, 90.0);
        assert_eq!(cfg.selection_strategy, SelectionStrategy::Sequential);
        assert_eq!(cfg.daily_quota, 10_000);
        assert_eq!(cfg.pool_limits.min_keys, 100);
        assert_eq!(cfg.pool_limits.max_keys, 10_000);
    }

    #[test]
    fn test_pool_size_bounds() {
        // Default limits require at least 100 keys.
        let cfg = RotatorConfig::new(vec!["only-one".to_string()]);
        assert!(cfg.validate().is_err());

        let cfg = RotatorConfig::new((0..100).map(|i| format!("key-{}", i)).collect());
        assert!(cfg.validate().is_ok());

        // Narrowed limits accept a small pool.
        assert!(small_pool_config(3).validate().is_ok());
        assert!(small_pool_config(11).validate().is_err());
    }

    #[test]
    fn test_duplicate_keys_rejected() {
        let mut cfg = small_pool_config(3);
        cfg.api_keys[2] = cfg.api_keys[0].clone();
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn test_interval_bounds() {
        let mut cfg = small_pool_config(3);
        cfg.rotation_interval_minutes = 0;
        assert!(cfg.validate().is_err());
        cfg.rotation_interval_minutes = 1441;
        assert!(cfg.validate().is_err());
        cfg.rotation_interval_minutes = 1440;
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn test_threshold_bounds() {
        let mut cfg = small_pool_config(3);
        cfg.quota_threshold = 0.0;
        assert!(cfg.validate().is_err());
        cfg.quota_threshold = 100.1;
        assert!(cfg.validate().is_err());
        cfg.quota_threshold = f64::NAN;
        assert!(cfg.validate().is_err());
        cfg.quota_threshold = 100.0;
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn test_yaml_file_roundtrip() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            "api_keys:\n  - alpha-key\n  - bravo-key\nquota_threshold: 75.0\n\
             selection_strategy: random\npool_limits:\n  min_keys: 1\n  max_keys: 10\n"
        )
        .unwrap();

        let cfg = RotatorConfig::from_yaml_file(file.path()).unwrap();
        assert_eq!(cfg.api_keys.len(), 2);
        assert_eq!(cfg.quota_threshold, 75.0);
        assert_eq!(cfg.selection_strategy, SelectionStrategy::Random);
        // Unspecified fields fall back to defaults.
        assert_eq!(cfg.rotation_interval_minutes, 60);
        assert_eq!(cfg.daily_quota, 10_000);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn test_yaml_file_missing() {
        let err = RotatorConfig::from_yaml_file(Path::new("/nonexistent/keywheel.yaml"));
        assert!(matches!(err, Err(RotatorError::InvalidConfig { .. })));
    }
}
