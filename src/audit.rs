//! Audit events — structured record of pool decisions.
//!
//! The manager never logs on its own; it emits events into an injected
//! [`AuditSink`]. The default sink forwards onto `tracing`. Delivery is
//! fire-and-forget: the core never depends on it succeeding, and keys
//! only ever appear in masked form.

use serde::Serialize;
use std::sync::Mutex;

/// What happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditKind {
    /// First key chosen at construction.
    InitialSelection,
    /// Current key switched.
    Rotation,
    /// A pool key failed validation and was discarded.
    KeyRejected,
    /// Usage units booked against a key.
    UsageRecorded,
}

/// One audit event.
#[derive(Debug, Clone, Serialize)]
pub struct AuditEvent {
    pub kind: AuditKind,
    pub masked_key: String,
    pub detail: String,
}

/// Sink for audit events.
pub trait AuditSink: Send + Sync {
    fn emit(&self, event: AuditEvent);
}

/// Forwards events onto `tracing` at a level matching their weight.
#[derive(Debug, Default)]
pub struct TracingAudit;

impl AuditSink for TracingAudit {
    fn emit(&self, event: AuditEvent) {
        match event.kind {
            AuditKind::InitialSelection | AuditKind::Rotation => {
                tracing::info!(kind = ?event.kind, key = %event.masked_key, "{}", event.detail);
            }
            AuditKind::KeyRejected => {
                tracing::warn!(key = %event.masked_key, "{}", event.detail);
            }
            AuditKind::UsageRecorded => {
                tracing::debug!(key = %event.masked_key, "{}", event.detail);
            }
        }
    }
}

/// Buffers events in memory, for tests and embedders that surface them
/// through their own channels.
#[derive(Debug, Default)]
pub struct MemoryAudit {
    events: Mutex<Vec<AuditEvent>>,
}

impl MemoryAudit {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything emitted so far.
    pub fn events(&self) -> Vec<AuditEvent> {
        self.events.lock().unwrap().clone()
    }
}

impl AuditSink for MemoryAudit {
    fn emit(&self, event: AuditEvent) {
        self.events.lock().unwrap().push(event);
    }
}

/// Mask a credential for logs and status output: first four and last four
/// characters visible, the middle redacted. Keys too short to mask safely
/// are fully redacted.
pub fn mask_key(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();
    if chars.len() <= 8 {
        return "****".to_string();
    }
    let head: String = chars[..4].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{}...{}", head, tail)
}
