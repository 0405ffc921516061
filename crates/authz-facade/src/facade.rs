//! The authorization facade (spec §4.7): attaches a correlation id,
//! forwards to the rule engine, emits a best-effort audit record, and
//! returns the engine's decision verbatim.

use crate::audit::{AuditRecord, AuditSink};
use chrono::Utc;
use identity_core::ids::CorrelationId;
use policy_engine::{Decision, EvaluationRequest, RuleEngine};
use std::sync::Arc;
use tracing::{instrument, warn};

pub struct AuthorizationFacade {
    engine: RuleEngine,
    sink: Arc<dyn AuditSink>,
}

impl AuthorizationFacade {
    pub fn new(engine: RuleEngine, sink: Arc<dyn AuditSink>) -> Self {
        Self { engine, sink }
    }

    /// `correlation_id` is read from a request header by the caller and
    /// passed in; `None` means one is generated here (spec §4.7).
    #[instrument(skip(self, request, subject_sub))]
    pub fn evaluate(
        &self,
        request: EvaluationRequest,
        correlation_id: Option<CorrelationId>,
        subject_sub: Option<String>,
    ) -> Decision {
        let correlation_id = correlation_id.unwrap_or_default();
        let decision = self.engine.evaluate(&request);

        let record = AuditRecord {
            correlation_id,
            subject_sub,
            decision: decision.decision,
            matched_rule_ids: decision.reasons.clone(),
            timestamp: Utc::now(),
        };
        if let Err(err) = self.sink.record(&record) {
            warn!(error = %err, "failed to write audit record; decision is unaffected");
        }

        decision
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::AuditError;
    use parking_lot::Mutex;
    use policy_engine::{policy, DecisionKind, PolicyPublisher};
    use std::collections::HashMap;

    #[derive(Default)]
    struct RecordingSink {
        records: Mutex<Vec<AuditRecord>>,
    }

    impl AuditSink for RecordingSink {
        fn record(&self, record: &AuditRecord) -> Result<(), AuditError> {
            self.records.lock().push(record.clone());
            Ok(())
        }
    }

    struct FailingSink;

    impl AuditSink for FailingSink {
        fn record(&self, _record: &AuditRecord) -> Result<(), AuditError> {
            Err(AuditError::Unavailable {
                reason: "disk full".to_string(),
            })
        }
    }

    fn engine() -> RuleEngine {
        let set = policy::parse_document(
            r#"{ "policies": [{"ruleId": "R1", "effect": "Permit", "priority": 1,
                "condition": {"op": "eq", "path": "resource.type", "value": "x"}}] }"#,
        )
        .unwrap();
        RuleEngine::new(PolicyPublisher::new(set))
    }

    fn request() -> EvaluationRequest {
        EvaluationRequest {
            subject: HashMap::new(),
            resource: HashMap::from([("type".to_string(), serde_json::json!("x"))]),
            context: HashMap::new(),
            action: None,
        }
    }

    #[test]
    fn emits_an_audit_record_with_the_decisions_reasons() {
        let sink = Arc::new(RecordingSink::default());
        let facade = AuthorizationFacade::new(engine(), sink.clone());

        let decision = facade.evaluate(request(), None, Some("usr_1".to_string()));
        assert_eq!(decision.decision, DecisionKind::Permit);

        let records = sink.records.lock();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].subject_sub.as_deref(), Some("usr_1"));
        assert_eq!(records[0].matched_rule_ids, decision.reasons);
    }

    #[test]
    fn audit_sink_failure_does_not_alter_the_decision() {
        let facade = AuthorizationFacade::new(engine(), Arc::new(FailingSink));
        let decision = facade.evaluate(request(), None, None);
        assert_eq!(decision.decision, DecisionKind::Permit);
    }

    #[test]
    fn missing_correlation_id_is_generated() {
        let sink = Arc::new(RecordingSink::default());
        let facade = AuthorizationFacade::new(engine(), sink.clone());
        facade.evaluate(request(), None, None);
        assert!(!sink.records.lock()[0].correlation_id.0.is_empty());
    }
}
