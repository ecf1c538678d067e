//! Condition evaluation.
//!
//! `Condition::matches` tests a record (a JSON attribute bag) against a
//! condition tree. Evaluation is total: a path that does not resolve is an
//! absent value, and absent values simply fail most predicates. Nothing here
//! returns an error.
//!
//! Comparison rules shared by every operator:
//!
//! - a populated relation (`{"id": "U1", ...}`) compares equal to its
//!   identifier (`"U1"`), see [`path::identity`](crate::path::identity);
//! - numbers compare by numeric value, so `1` equals `1.0`; two integers
//!   compare exactly, without a detour through `f64`;
//! - an absent or `null` value equals only the `null` literal.

use serde_json::{Number, Value};
use tracing::trace;

use crate::condition::{Condition, Predicate};
use crate::path::{identity, resolve};

impl Condition {
    /// True if `record` satisfies this condition.
    pub fn matches(&self, record: &Value) -> bool {
        match self {
            Condition::And(parts) => parts.iter().all(|c| c.matches(record)),

            Condition::Field { path, predicate } => {
                let resolved = resolve(record, path);
                if resolved.is_none() {
                    trace!(path = %path, "condition path did not resolve");
                }
                predicate.evaluate(resolved.as_deref())
            }

            Condition::Not(inner) => !inner.matches(record),
        }
    }
}

impl Predicate {
    /// Apply this predicate to a resolved value (`None` when absent).
    pub fn evaluate(&self, value: Option<&Value>) -> bool {
        match self {
            Predicate::Eq(literal) => equals(value, literal),

            Predicate::Ne(literal) => !equals(value, literal),

            Predicate::In(set) => within(value, set),

            Predicate::Nin(set) => !within(value, set),

            Predicate::Not(inner) => !inner.evaluate(value),

            Predicate::Size(len) => match value {
                Some(Value::Array(items)) => items.len() == *len,
                _ => false,
            },

            Predicate::All(literals) => match value {
                Some(Value::Array(items)) => literals
                    .iter()
                    .all(|lit| items.iter().any(|item| same(item, lit))),
                _ => false,
            },

            Predicate::ElemMatch(condition) => match value {
                Some(Value::Array(items)) => items.iter().any(|item| condition.matches(item)),
                _ => false,
            },
        }
    }
}

/// `Eq` semantics: a sequence value matches when any element matches,
/// unless the literal is itself a sequence (whole-value comparison).
fn equals(value: Option<&Value>, literal: &Value) -> bool {
    match value {
        None => literal.is_null(),
        Some(Value::Array(items)) if !literal.is_array() => {
            items.iter().any(|item| same(item, literal))
        }
        Some(v) => same(v, literal),
    }
}

/// `In` semantics: the value, or any element of a sequence value, is a
/// member of `set`. An absent value is a member only of a set holding `null`.
fn within(value: Option<&Value>, set: &[Value]) -> bool {
    match value {
        None => set.iter().any(Value::is_null),
        Some(v @ Value::Array(items)) => {
            items.iter().any(|item| contains(set, item)) || contains(set, v)
        }
        Some(v) => contains(set, v),
    }
}

fn contains(set: &[Value], value: &Value) -> bool {
    set.iter().any(|lit| same(value, lit))
}

/// Equality under the shared comparison rules.
fn same(actual: &Value, literal: &Value) -> bool {
    scalar_eq(actual, literal) || scalar_eq(identity(actual), identity(literal))
}

fn scalar_eq(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => number_eq(x, y),
        _ => a == b,
    }
}

/// Integers compare exactly; `1` and `1.0` are still equal.
fn number_eq(x: &Number, y: &Number) -> bool {
    if x.is_f64() || y.is_f64() {
        return x.as_f64() == y.as_f64();
    }
    match (x.as_i64(), y.as_i64()) {
        (Some(x), Some(y)) => x == y,
        _ => x.as_u64().is_some() && x.as_u64() == y.as_u64(),
    }
}
