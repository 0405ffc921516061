//! The `PredicateExpression` tree and its three-valued evaluator (spec
//! §3, §4.3, §9 "Three-valued logic").
//!
//! Every comparator works over a `serde_json::Value` pulled out of an
//! attribute tuple by dotted path (`subject.groups`, `context.geo`, ...).
//! A missing path is *undefined*, and undefined propagates through
//! comparators by Kleene's three-valued logic rather than collapsing to
//! `false` — collapsing it would let a Permit rule with a missing
//! attribute silently fire (spec §9).

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// A three-valued boolean: true, false, or undefined (attribute missing or
/// incomparable).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bool3 {
    True,
    False,
    Undefined,
}

impl Bool3 {
    pub fn from_bool(b: bool) -> Self {
        if b {
            Bool3::True
        } else {
            Bool3::False
        }
    }

    pub fn is_true(self) -> bool {
        matches!(self, Bool3::True)
    }

    /// Kleene AND: `false` dominates, `undefined` dominates over `true`,
    /// `true ∧ true = true`.
    fn and(self, other: Bool3) -> Bool3 {
        use Bool3::*;
        match (self, other) {
            (False, _) | (_, False) => False,
            (Undefined, _) | (_, Undefined) => Undefined,
            (True, True) => True,
        }
    }

    /// Kleene OR: `true` dominates, `undefined` dominates over `false`.
    fn or(self, other: Bool3) -> Bool3 {
        use Bool3::*;
        match (self, other) {
            (True, _) | (_, True) => True,
            (Undefined, _) | (_, Undefined) => Undefined,
            (False, False) => False,
        }
    }

    fn not(self) -> Bool3 {
        match self {
            Bool3::True => Bool3::False,
            Bool3::False => Bool3::True,
            Bool3::Undefined => Bool3::Undefined,
        }
    }
}

/// The evaluation context: flattened `subject`/`resource`/`context` maps
/// plus the optional `action`.
#[derive(Debug, Clone, Default)]
pub struct EvalContext {
    pub subject: HashMap<String, Value>,
    pub resource: HashMap<String, Value>,
    pub context: HashMap<String, Value>,
    pub action: Option<String>,
}

impl EvalContext {
    /// Resolves a dotted `AttributePath` (spec §3) to a value, or `None`
    /// if any segment is missing. Only the three roots `subject`,
    /// `resource`, `context` are recognized; anything else is undefined.
    pub fn resolve(&self, path: &str) -> Option<Value> {
        let mut segments = path.split('.');
        let root = segments.next()?;
        let rest: Vec<&str> = segments.collect();
        let map = match root {
            "subject" => &self.subject,
            "resource" => &self.resource,
            "context" => &self.context,
            _ => return None,
        };
        if rest.is_empty() {
            return None;
        }
        let mut current = map.get(rest[0])?.clone();
        for segment in &rest[1..] {
            current = current.get(segment)?.clone();
        }
        Some(current)
    }
}

/// The recursive predicate tree (spec §3). Serialized as
/// `{ "op": "<name>", ... }` per spec §6's policy JSON grammar.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "lowercase")]
pub enum PredicateExpression {
    All { args: Vec<PredicateExpression> },
    Any { args: Vec<PredicateExpression> },
    Not { arg: Box<PredicateExpression> },
    Eq { path: String, value: Value },
    Neq { path: String, value: Value },
    In { path: String, values: Vec<Value> },
    Contains { path: String, value: Value },
    Gte { path: String, value: f64 },
    Gt { path: String, value: f64 },
    Lte { path: String, value: f64 },
    Lt { path: String, value: f64 },
    Between { path: String, lo: String, hi: String },
    Exists { path: String },
}

fn case_insensitive_eq(path: &str, a: &Value, b: &Value) -> bool {
    if path == "subject.userName" || path.ends_with(".userName") {
        if let (Some(a), Some(b)) = (a.as_str(), b.as_str()) {
            return a.eq_ignore_ascii_case(b);
        }
    }
    a == b
}

fn as_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.parse::<f64>().ok(),
        _ => None,
    }
}

fn compare_numeric(left: &Value, right: f64, cmp: impl Fn(f64, f64) -> bool) -> Bool3 {
    match as_number(left) {
        Some(l) => Bool3::from_bool(cmp(l, right)),
        None => Bool3::Undefined,
    }
}

/// Parses `"HH:MM"` into minute-of-day; `None` on a malformed string.
fn parse_minute_of_day(raw: &str) -> Option<u32> {
    let (h, m) = raw.split_once(':')?;
    let h: u32 = h.parse().ok()?;
    let m: u32 = m.parse().ok()?;
    if h > 23 || m > 59 {
        return None;
    }
    Some(h * 60 + m)
}

/// Resolves a time-of-day value to minute-of-day, accepting either an
/// `"HH:MM"` string or a pre-computed integer minute count.
fn as_minute_of_day(value: &Value) -> Option<u32> {
    match value {
        Value::String(s) => parse_minute_of_day(s),
        Value::Number(n) => n.as_u64().map(|v| v as u32),
        _ => None,
    }
}

fn list_values(value: &Value) -> Option<Vec<Value>> {
    match value {
        Value::Array(items) => Some(items.clone()),
        _ => None,
    }
}

/// Evaluates a single predicate node against an attribute tuple. Returns
/// `Bool3::Undefined` whenever the referenced attribute is missing or the
/// comparator's operands are not comparable — it never panics on data
/// shape (spec §4.4 "Failure semantics").
pub fn eval(expr: &PredicateExpression, ctx: &EvalContext) -> Bool3 {
    match expr {
        PredicateExpression::All { args } => args
            .iter()
            .map(|a| eval(a, ctx))
            .fold(Bool3::True, Bool3::and),
        PredicateExpression::Any { args } => args
            .iter()
            .map(|a| eval(a, ctx))
            .fold(Bool3::False, Bool3::or),
        PredicateExpression::Not { arg } => eval(arg, ctx).not(),
        PredicateExpression::Eq { path, value } => match ctx.resolve(path) {
            Some(actual) => Bool3::from_bool(case_insensitive_eq(path, &actual, value)),
            None => Bool3::Undefined,
        },
        PredicateExpression::Neq { path, value } => match ctx.resolve(path) {
            Some(actual) => Bool3::from_bool(!case_insensitive_eq(path, &actual, value)),
            None => Bool3::Undefined,
        },
        PredicateExpression::In { path, values } => match ctx.resolve(path) {
            Some(actual) => match list_values(&actual) {
                // Attribute itself is a set: true iff non-empty intersection.
                Some(items) => Bool3::from_bool(items.iter().any(|item| values.contains(item))),
                None => Bool3::from_bool(values.contains(&actual)),
            },
            None => Bool3::Undefined,
        },
        PredicateExpression::Contains { path, value } => match ctx.resolve(path) {
            Some(actual) => match list_values(&actual) {
                Some(items) => Bool3::from_bool(items.contains(value)),
                None => Bool3::Undefined,
            },
            None => Bool3::Undefined,
        },
        PredicateExpression::Gte { path, value } => match ctx.resolve(path) {
            Some(actual) => compare_numeric(&actual, *value, |a, b| a >= b),
            None => Bool3::Undefined,
        },
        PredicateExpression::Gt { path, value } => match ctx.resolve(path) {
            Some(actual) => compare_numeric(&actual, *value, |a, b| a > b),
            None => Bool3::Undefined,
        },
        PredicateExpression::Lte { path, value } => match ctx.resolve(path) {
            Some(actual) => compare_numeric(&actual, *value, |a, b| a <= b),
            None => Bool3::Undefined,
        },
        PredicateExpression::Lt { path, value } => match ctx.resolve(path) {
            Some(actual) => compare_numeric(&actual, *value, |a, b| a < b),
            None => Bool3::Undefined,
        },
        PredicateExpression::Between { path, lo, hi } => {
            let (Some(actual), Some(lo), Some(hi)) = (
                ctx.resolve(path).as_ref().and_then(as_minute_of_day),
                parse_minute_of_day(lo),
                parse_minute_of_day(hi),
            ) else {
                return Bool3::Undefined;
            };
            Bool3::from_bool(actual >= lo && actual <= hi)
        }
        PredicateExpression::Exists { path } => Bool3::from_bool(
            ctx.resolve(path).map(|v| !v.is_null()).unwrap_or(false),
        ),
    }
}
