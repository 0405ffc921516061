//! The Rule Engine / Policy Decision Point (spec §4.4).
//!
//! Combines matched rules under **deny-overrides with explicit-permit
//! preference and challenge escalation**: any matched Deny wins outright;
//! failing that, any matched Challenge; failing that, any matched Permit;
//! failing that, the implicit terminal deny. Precedence is effect-based,
//! not priority-based — priority only decides evaluation (and therefore
//! reporting) order, never which effect wins.

use crate::policy::{Effect, Policy, PolicyPublisher, Target, DEFAULT_DENY_RULE_ID};
use crate::predicate::{self, Bool3, EvalContext};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use tracing::instrument;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct EvaluationRequest {
    #[serde(default)]
    pub subject: HashMap<String, Value>,
    #[serde(default)]
    pub resource: HashMap<String, Value>,
    #[serde(default)]
    pub context: HashMap<String, Value>,
    #[serde(default)]
    pub action: Option<String>,
}

impl From<&EvaluationRequest> for EvalContext {
    fn from(request: &EvaluationRequest) -> Self {
        EvalContext {
            subject: request.subject.clone(),
            resource: request.resource.clone(),
            context: request.context.clone(),
            action: request.action.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub enum DecisionKind {
    Permit,
    Deny,
    Challenge,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Decision {
    pub decision: DecisionKind,
    pub reasons: Vec<String>,
    pub advice: Vec<String>,
    pub obligations: Vec<String>,
}

fn reason_for(rule_id: &str) -> String {
    format!("ruleId: {rule_id}")
}

fn target_matches(target: &Target, ctx: &EvalContext) -> Bool3 {
    let resource_ok = match &target.resource_type {
        None => Bool3::True,
        Some(expected) => match ctx.resolve("resource.type") {
            Some(actual) => Bool3::from_bool(actual.as_str() == Some(expected.as_str())),
            None => Bool3::Undefined,
        },
    };
    let action_ok = match &target.action {
        None => Bool3::True,
        Some(expected) => Bool3::from_bool(ctx.action.as_deref() == Some(expected.as_str())),
    };
    match (resource_ok, action_ok) {
        (Bool3::False, _) | (_, Bool3::False) => Bool3::False,
        (Bool3::Undefined, _) | (_, Bool3::Undefined) => Bool3::Undefined,
        (Bool3::True, Bool3::True) => Bool3::True,
    }
}

/// A rule matches iff `target ∧ condition` evaluates true; undefined at
/// the top is a non-match (spec §4.4 step 3).
fn rule_matches(policy: &Policy, ctx: &EvalContext) -> bool {
    let target_result = match &policy.target {
        Some(target) => target_matches(target, ctx),
        None => Bool3::True,
    };
    if target_result == Bool3::False {
        return false;
    }
    let condition_result = predicate::eval(&policy.condition, ctx);
    let combined = match (target_result, condition_result) {
        (Bool3::False, _) | (_, Bool3::False) => Bool3::False,
        (Bool3::Undefined, _) | (_, Bool3::Undefined) => Bool3::Undefined,
        (Bool3::True, Bool3::True) => Bool3::True,
    };
    combined.is_true()
}

fn collect_reasons_advice_obligations(rules: &[&Policy]) -> (Vec<String>, Vec<String>, Vec<String>) {
    let reasons = rules.iter().map(|r| reason_for(&r.rule_id)).collect();
    let mut advice = Vec::new();
    let mut obligations = Vec::new();
    for rule in rules {
        for a in &rule.advice {
            if !advice.contains(a) {
                advice.push(a.clone());
            }
        }
        for o in &rule.obligations {
            if !obligations.contains(o) {
                obligations.push(o.clone());
            }
        }
    }
    (reasons, advice, obligations)
}

fn default_deny_decision() -> Decision {
    Decision {
        decision: DecisionKind::Deny,
        reasons: vec![reason_for(DEFAULT_DENY_RULE_ID)],
        advice: vec![],
        obligations: vec![],
    }
}

/// Walks a published `PolicySet` snapshot and combines matched rules into
/// a single [`Decision`] (spec §4.4).
pub struct RuleEngine {
    publisher: PolicyPublisher,
}

impl RuleEngine {
    pub fn new(publisher: PolicyPublisher) -> Self {
        Self { publisher }
    }

    #[instrument(skip(self, request), fields(action = request.action.as_deref().unwrap_or("")))]
    pub fn evaluate(&self, request: &EvaluationRequest) -> Decision {
        let snapshot = self.publisher.snapshot();
        if snapshot.rules.is_empty() {
            // An empty set must never be read as "nothing forbids it".
            return default_deny_decision();
        }

        let ctx = EvalContext::from(request);
        let explicit_matches: Vec<&Policy> = snapshot
            .rules
            .iter()
            .filter(|rule| rule.rule_id != DEFAULT_DENY_RULE_ID)
            .filter(|rule| rule_matches(rule, &ctx))
            .collect();

        if let Some(deny_index) = explicit_matches.iter().position(|r| r.effect == Effect::Deny) {
            let contributing = &explicit_matches[..=deny_index];
            let (reasons, advice, obligations) = collect_reasons_advice_obligations(contributing);
            return Decision {
                decision: DecisionKind::Deny,
                reasons,
                advice,
                obligations,
            };
        }

        let challenge_matches: Vec<&Policy> = explicit_matches
            .iter()
            .filter(|r| r.effect == Effect::Challenge)
            .copied()
            .collect();
        if !challenge_matches.is_empty() {
            let (reasons, advice, obligations) = collect_reasons_advice_obligations(&challenge_matches);
            return Decision {
                decision: DecisionKind::Challenge,
                reasons,
                advice,
                obligations,
            };
        }

        if !explicit_matches.is_empty() {
            // No Deny, no Challenge matched: everything remaining is Permit.
            let (reasons, advice, obligations) = collect_reasons_advice_obligations(&explicit_matches);
            return Decision {
                decision: DecisionKind::Permit,
                reasons,
                advice,
                obligations,
            };
        }

        default_deny_decision()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy::{self, PolicyPublisher};
    use serde_json::json;

    fn engine_with(policies_json: &str) -> RuleEngine {
        let doc = format!(r#"{{ "policies": [{policies_json}] }}"#);
        let set = policy::parse_document(&doc).unwrap();
        RuleEngine::new(PolicyPublisher::new(set))
    }

    /// S1 — admin on non-prod permits.
    #[test]
    fn s1_admin_override_permits_on_non_prod() {
        let engine = engine_with(
            r#"{
                "ruleId": "ADMIN-OVERRIDE-01",
                "effect": "Permit",
                "priority": 100,
                "condition": {
                    "op": "all",
                    "args": [
                        {"op": "in", "path": "subject.groups", "values": ["ADMINS"]},
                        {"op": "neq", "path": "resource.env", "value": "prod"}
                    ]
                }
            }"#,
        );
        let request = EvaluationRequest {
            subject: HashMap::from([
                ("dept".to_string(), json!("IT")),
                ("groups".to_string(), json!(["ADMINS"])),
                ("riskScore".to_string(), json!(15)),
            ]),
            resource: HashMap::from([
                ("type".to_string(), json!("user_data")),
                ("env".to_string(), json!("dev")),
            ]),
            context: HashMap::from([
                ("geo".to_string(), json!("CL")),
                ("deviceTrusted".to_string(), json!(true)),
            ]),
            action: None,
        };
        let decision = engine.evaluate(&request);
        assert_eq!(decision.decision, DecisionKind::Permit);
        assert_eq!(decision.reasons, vec!["ruleId: ADMIN-OVERRIDE-01".to_string()]);
    }

    /// S2 — high risk triggers step-up.
    #[test]
    fn s2_high_risk_triggers_challenge() {
        let engine = engine_with(
            r#"{
                "ruleId": "RISK-STEPUP-01",
                "effect": "Challenge",
                "priority": 50,
                "condition": {"op": "gte", "path": "subject.riskScore", "value": 70.0}
            }"#,
        );
        let request = EvaluationRequest {
            subject: HashMap::from([
                ("dept".to_string(), json!("Finance")),
                ("riskScore".to_string(), json!(85)),
            ]),
            resource: HashMap::from([
                ("type".to_string(), json!("financial_data")),
                ("env".to_string(), json!("prod")),
            ]),
            context: HashMap::from([("geo".to_string(), json!("CL"))]),
            action: None,
        };
        let decision = engine.evaluate(&request);
        assert_eq!(decision.decision, DecisionKind::Challenge);
        assert!(decision.reasons.contains(&"ruleId: RISK-STEPUP-01".to_string()));
    }

    /// S3 — default deny.
    #[test]
    fn s3_no_matching_rule_is_default_deny() {
        let engine = engine_with(
            r#"{
                "ruleId": "UNRELATED-01",
                "effect": "Permit",
                "priority": 10,
                "condition": {"op": "eq", "path": "resource.type", "value": "user_data"}
            }"#,
        );
        let request = EvaluationRequest {
            subject: HashMap::from([("dept".to_string(), json!("Sales"))]),
            resource: HashMap::from([
                ("type".to_string(), json!("payroll")),
                ("env".to_string(), json!("prod")),
            ]),
            context: HashMap::from([("geo".to_string(), json!("CL"))]),
            action: None,
        };
        let decision = engine.evaluate(&request);
        assert_eq!(decision.decision, DecisionKind::Deny);
        assert_eq!(decision.reasons, vec!["ruleId: DEFAULT-DENY-01".to_string()]);
    }

    /// S4 — deny overrides permit.
    #[test]
    fn s4_deny_overrides_permit() {
        let engine = engine_with(
            r#"
            {
                "ruleId": "CRITICAL-DENY-01",
                "effect": "Deny",
                "priority": 90,
                "condition": {"op": "eq", "path": "resource.classification", "value": "critical"}
            },
            {
                "ruleId": "BROAD-PERMIT-01",
                "effect": "Permit",
                "priority": 10,
                "condition": {"op": "eq", "path": "resource.env", "value": "prod"}
            }
            "#,
        );
        let request = EvaluationRequest {
            subject: HashMap::new(),
            resource: HashMap::from([
                ("type".to_string(), json!("core_system")),
                ("env".to_string(), json!("prod")),
                ("classification".to_string(), json!("critical")),
            ]),
            context: HashMap::new(),
            action: None,
        };
        let decision = engine.evaluate(&request);
        assert_eq!(decision.decision, DecisionKind::Deny);
        assert_eq!(decision.reasons[0], "ruleId: CRITICAL-DENY-01");
    }

    #[test]
    fn deny_reasons_include_higher_priority_matches_that_preceded_it() {
        let engine = engine_with(
            r#"
            {
                "ruleId": "HIGH-PRIORITY-PERMIT",
                "effect": "Permit",
                "priority": 90,
                "condition": {"op": "eq", "path": "resource.env", "value": "prod"}
            },
            {
                "ruleId": "LOWER-PRIORITY-DENY",
                "effect": "Deny",
                "priority": 10,
                "condition": {"op": "eq", "path": "resource.env", "value": "prod"}
            }
            "#,
        );
        let request = EvaluationRequest {
            subject: HashMap::new(),
            resource: HashMap::from([("env".to_string(), json!("prod"))]),
            context: HashMap::new(),
            action: None,
        };
        let decision = engine.evaluate(&request);
        assert_eq!(decision.decision, DecisionKind::Deny);
        assert_eq!(
            decision.reasons,
            vec![
                "ruleId: HIGH-PRIORITY-PERMIT".to_string(),
                "ruleId: LOWER-PRIORITY-DENY".to_string()
            ]
        );
    }

    #[test]
    fn same_input_same_snapshot_is_deterministic() {
        let engine = engine_with(
            r#"{
                "ruleId": "R1",
                "effect": "Permit",
                "priority": 1,
                "condition": {"op": "eq", "path": "resource.type", "value": "x"}
            }"#,
        );
        let request = EvaluationRequest {
            subject: HashMap::new(),
            resource: HashMap::from([("type".to_string(), json!("x"))]),
            context: HashMap::new(),
            action: None,
        };
        let first = engine.evaluate(&request);
        let second = engine.evaluate(&request);
        assert_eq!(first.decision, second.decision);
        assert_eq!(first.reasons, second.reasons);
    }
}
