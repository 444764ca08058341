//! Key validation — format check plus a liveness probe.
//!
//! The pool treats every failure the same way: the key is discarded.
//! Validators are injected so tests and embedders can swap in their own
//! implementation without touching the rotation core.

use async_trait::async_trait;

use crate::error::RotatorError;

/// Expected credential length for the upstream service.
pub const KEY_LENGTH: usize = 39;

/// Decides whether a single credential is usable.
#[async_trait]
pub trait KeyValidator: Send + Sync {
    /// Ok admits the key to the pool; any error discards it.
    async fn validate(&self, key: &str) -> Result<(), RotatorError>;
}

/// Check the credential shape: fixed length, alphanumeric plus `_` and `-`.
pub fn check_format(key: &str) -> Result<(), RotatorError> {
    if key.len() != KEY_LENGTH {
        return Err(RotatorError::Validation {
            reason: format!("expected {} characters, got {}", KEY_LENGTH, key.len()),
        });
    }
    if !key
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
    {
        return Err(RotatorError::Validation {
            reason: "key contains characters outside [A-Za-z0-9_-]".to_string(),
        });
    }
    Ok(())
}

/// Format check plus a GET probe against the live service.
///
/// The probe URL is a template with `{key}` standing in for the credential —
/// point it at the cheapest read endpoint the service offers. A 403 means
/// the service rejected the key; any other non-200 counts as a failed probe.
pub struct HttpProbeValidator {
    client: reqwest::Client,
    probe_url: String,
}

impl HttpProbeValidator {
    pub fn new(probe_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            probe_url: probe_url.into(),
        }
    }
}

#[async_trait]
impl KeyValidator for HttpProbeValidator {
    async fn validate(&self, key: &str) -> Result<(), RotatorError> {
        check_format(key)?;

        let url = self.probe_url.replace("{key}", key);
        let resp =
            self.client
                .get(&url)
                .send()
                .await
                .map_err(|e| RotatorError::Validation {
                    reason: format!("probe request failed: {}", e),
                })?;

        match resp.status().as_u16() {
            200 => Ok(()),
            403 => Err(RotatorError::Validation {
                reason: "service rejected the key".to_string(),
            }),
            status => Err(RotatorError::Validation {
                reason: format!("probe returned status {}", status),
            }),
        }
    }
}
