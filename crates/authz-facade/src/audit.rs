//! Audit records and the sink abstraction (spec §4.7, §7 "Audit log
//! entries are best-effort").

use chrono::{DateTime, Utc};
use identity_core::ids::CorrelationId;
use policy_engine::DecisionKind;
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Clone, Serialize)]
pub struct AuditRecord {
    pub correlation_id: CorrelationId,
    pub subject_sub: Option<String>,
    pub decision: DecisionKind,
    pub matched_rule_ids: Vec<String>,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Error)]
pub enum AuditError {
    #[error("audit sink unavailable: {reason}")]
    Unavailable { reason: String },
}

/// Writes an [`AuditRecord`] somewhere durable. A failure here must never
/// propagate into the caller's decision (spec §7) — callers log and move
/// on, they never `?` this.
pub trait AuditSink: Send + Sync {
    fn record(&self, record: &AuditRecord) -> Result<(), AuditError>;
}

/// Emits the audit trail through `tracing`, matching every other
/// component's logging story rather than introducing a bespoke audit
/// log format.
#[derive(Debug, Default)]
pub struct TracingAuditSink;

impl AuditSink for TracingAuditSink {
    fn record(&self, record: &AuditRecord) -> Result<(), AuditError> {
        tracing::info!(
            correlation_id = %record.correlation_id,
            subject_sub = record.subject_sub.as_deref().unwrap_or(""),
            decision = ?record.decision,
            matched_rule_ids = ?record.matched_rule_ids,
            "authorization decision"
        );
        Ok(())
    }
}
