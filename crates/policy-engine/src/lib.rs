pub mod engine;
pub mod policy;
pub mod predicate;

pub use engine::{Decision, DecisionKind, EvaluationRequest, RuleEngine};
pub use policy::{Effect, Policy, PolicySet, PolicyPublisher, Target, DEFAULT_DENY_RULE_ID};
pub use predicate::{Bool3, EvalContext, PredicateExpression};
