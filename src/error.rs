//! Error taxonomy — one closed enum for every failure the crate surfaces.
//!
//! Per-key validation failures are swallowed at construction (audited, then
//! the key is dropped); only the aggregate `NoValidKey` escapes to the
//! caller. Rotation and usage-recording errors leave state untouched.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RotatorError {
    /// Configuration rejected before any key was touched.
    #[error("invalid configuration: {reason}")]
    InvalidConfig { reason: String },

    /// A single key failed the format check or the liveness probe.
    #[error("key validation failed: {reason}")]
    Validation { reason: String },

    /// No key in the pool survived validation.
    #[error("no valid API keys available")]
    NoValidKey,

    /// Every pool key is at or above the quota threshold for today.
    #[error("all API keys have exceeded the quota threshold")]
    QuotaExceeded,

    /// Caller reported negative usage units.
    #[error("usage units must be non-negative, got {units}")]
    InvalidUsage { units: i64 },
}
