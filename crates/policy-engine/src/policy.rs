//! Policy documents, the published `PolicySet`, and the loader that turns
//! a JSON file into one (spec §3, §4.2).

use crate::predicate::PredicateExpression;
use identity_core::error::{IdentityError, Result};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::sync::Arc;
use tracing::{info, instrument, warn};

/// The id of the mandatory implicit terminal rule (spec §3).
pub const DEFAULT_DENY_RULE_ID: &str = "DEFAULT-DENY-01";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub enum Effect {
    Permit,
    Deny,
    Challenge,
}

/// A coarse filter on resource/action, applied before `condition` (spec
/// §3 "target"). Either field being absent means "any".
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Target {
    #[serde(default)]
    pub resource_type: Option<String>,
    #[serde(default)]
    pub action: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Policy {
    pub rule_id: String,
    pub effect: Effect,
    pub priority: i64,
    #[serde(default)]
    pub target: Option<Target>,
    pub condition: PredicateExpression,
    #[serde(default)]
    pub advice: Vec<String>,
    #[serde(default)]
    pub obligations: Vec<String>,
}

/// The raw JSON document shape from spec §6: `{ "policies": [...] }`.
#[derive(Debug, Deserialize)]
struct PolicyDocument {
    policies: Vec<RawPolicy>,
}

/// Mirrors [`Policy`] but with looser types so the loader can report a
/// precise `PolicySemanticError` rather than a generic `serde` failure.
#[derive(Debug, Deserialize)]
struct RawPolicy {
    #[serde(rename = "ruleId")]
    rule_id: String,
    effect: Effect,
    priority: i64,
    #[serde(default)]
    target: Option<Target>,
    condition: serde_json::Value,
    #[serde(default)]
    advice: Vec<String>,
    #[serde(default)]
    obligations: Vec<String>,
}

/// The ordered, immutable published set of rules. Always non-empty and
/// always terminates in [`DEFAULT_DENY_RULE_ID`] (spec §3 invariant).
#[derive(Debug, Clone)]
pub struct PolicySet {
    pub rules: Vec<Policy>,
}

impl PolicySet {
    fn default_deny_rule() -> Policy {
        Policy {
            rule_id: DEFAULT_DENY_RULE_ID.to_string(),
            effect: Effect::Deny,
            priority: i64::MIN,
            target: None,
            condition: PredicateExpression::All { args: vec![] },
            advice: vec![],
            obligations: vec![],
        }
    }

    /// Builds a set from already-validated policies: sorts by descending
    /// priority then lexicographic ruleId for stability, and appends the
    /// mandatory terminal deny (spec §4.2).
    fn from_validated(mut rules: Vec<Policy>) -> Self {
        rules.sort_by(|a, b| b.priority.cmp(&a.priority).then_with(|| a.rule_id.cmp(&b.rule_id)));
        rules.push(Self::default_deny_rule());
        PolicySet { rules }
    }

    /// An empty set except for the terminal deny — used as the safety net
    /// described in spec §4.4 ("If the PolicySet is somehow empty").
    pub fn empty() -> Self {
        PolicySet {
            rules: vec![Self::default_deny_rule()],
        }
    }
}

fn parse_condition(raw: &serde_json::Value, rule_id: &str) -> Result<PredicateExpression> {
    serde_json::from_value(raw.clone()).map_err(|source| IdentityError::PolicySemanticError {
        reason: format!("rule {rule_id}: invalid condition: {source}"),
    })
}

fn validate(raw: RawPolicy) -> Result<Policy> {
    if raw.rule_id.trim().is_empty() {
        return Err(IdentityError::PolicySemanticError {
            reason: "ruleId must not be empty".to_string(),
        });
    }
    if raw.rule_id == DEFAULT_DENY_RULE_ID {
        return Err(IdentityError::PolicySemanticError {
            reason: format!("ruleId {DEFAULT_DENY_RULE_ID} is reserved for the implicit terminal rule"),
        });
    }
    let condition = parse_condition(&raw.condition, &raw.rule_id)?;
    Ok(Policy {
        rule_id: raw.rule_id,
        effect: raw.effect,
        priority: raw.priority,
        target: raw.target,
        condition,
        advice: raw.advice,
        obligations: raw.obligations,
    })
}

/// Parses and validates a `{ "policies": [...] }` document into a fresh
/// [`PolicySet`]. Does not touch any previously published set — callers
/// decide whether and when to swap (spec §4.2 "On reload failure the
/// previously published set is retained").
pub fn parse_document(raw: &str) -> Result<PolicySet> {
    let document: PolicyDocument = serde_json::from_str(raw).map_err(|source| IdentityError::PolicyParseError {
        reason: source.to_string(),
    })?;

    let mut rule_ids = std::collections::HashSet::new();
    let mut rules = Vec::with_capacity(document.policies.len());
    for raw_policy in document.policies {
        let policy = validate(raw_policy)?;
        if !rule_ids.insert(policy.rule_id.clone()) {
            return Err(IdentityError::PolicySemanticError {
                reason: format!("duplicate ruleId {}", policy.rule_id),
            });
        }
        rules.push(policy);
    }

    Ok(PolicySet::from_validated(rules))
}

/// Loads a policy document from disk (spec §4.2 `PolicyIOError` /
/// `PolicyParseError` / `PolicySemanticError`).
#[instrument]
pub fn load_from_path(path: &Path) -> Result<PolicySet> {
    let raw = fs::read_to_string(path).map_err(|source| IdentityError::PolicyIOError {
        reason: format!("{}: {source}", path.display()),
    })?;
    parse_document(&raw)
}

/// Holds the currently-published `PolicySet` behind an atomic reference
/// swap, generalizing the teacher's
/// `Arc<RwLock<Option<Arc<EnhancedPolicy>>>>` single-policy pattern to a
/// whole ordered set (spec §4.2, §5, §9 "Immutable publication").
#[derive(Clone)]
pub struct PolicyPublisher {
    current: Arc<RwLock<Arc<PolicySet>>>,
}

impl PolicyPublisher {
    pub fn new(initial: PolicySet) -> Self {
        Self {
            current: Arc::new(RwLock::new(Arc::new(initial))),
        }
    }

    /// A single atomic read of the published set — the snapshot an
    /// evaluation must use throughout (spec §4.4 step 1, §5 "Ordering
    /// guarantees").
    pub fn snapshot(&self) -> Arc<PolicySet> {
        self.current.read().clone()
    }

    /// Loads and validates `path`, then swaps it in. On failure the
    /// previously published set is left untouched (spec §4.2).
    #[instrument(skip(self))]
    pub fn reload(&self, path: &Path) -> Result<()> {
        match load_from_path(path) {
            Ok(new_set) => {
                info!(rules = new_set.rules.len(), "publishing reloaded policy set");
                *self.current.write() = Arc::new(new_set);
                Ok(())
            }
            Err(err) => {
                warn!(error = %err, "policy reload failed, retaining previous set");
                Err(err)
            }
        }
    }
}
