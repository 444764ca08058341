//! keywheel — rotating API key pool with daily quota tracking.
//!
//! Hands out one "current" credential from a validated pool and rotates it
//! on two triggers: the key has been held past the configured interval, or
//! it has crossed the quota threshold for the UTC day. Usage accounting
//! lives in [`quota::UsageTracker`]; rotation policy in
//! [`pool::KeyRotationManager`]. Key validation and audit output are
//! injected collaborators, so the core does no I/O of its own.
//!
//! ```no_run
//! use std::sync::Arc;
//! use keywheel::{HttpProbeValidator, KeyRotationManager, RotatorConfig, TracingAudit};
//!
//! # async fn run() -> Result<(), keywheel::RotatorError> {
//! let keys = (0..100).map(|i| format!("key-{:035}", i)).collect();
//! let config = RotatorConfig::new(keys);
//! let validator = HttpProbeValidator::new("https://api.example.com/ping?key={key}");
//! let manager = KeyRotationManager::new(config, &validator, Arc::new(TracingAudit)).await?;
//!
//! let key = manager.get_current_key()?;
//! // ... call the service with `key` ...
//! manager.record_quota_usage(10)?;
//! # Ok(())
//! # }
//! ```

pub mod audit;
pub mod config;
pub mod error;
pub mod pool;
pub mod quota;
pub mod validate;

pub use audit::{mask_key, AuditEvent, AuditKind, AuditSink, MemoryAudit, TracingAudit};
pub use config::{PoolLimits, RotatorConfig, SelectionStrategy};
pub use error::RotatorError;
pub use pool::KeyRotationManager;
pub use quota::{UsageTracker, DEFAULT_DAILY_QUOTA};
pub use validate::{check_format, HttpProbeValidator, KeyValidator, KEY_LENGTH};
