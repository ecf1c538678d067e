//! The condition expression tree.
//!
//! A condition scopes a rule to the records it applies to. It is a small
//! explicit tree rather than a free-form query object:
//!
//! ```rust,ignore
//! use warrant_condition::{Condition, Predicate};
//!
//! // { id: { $eq: "1" }, status: { $eq: "ACTIVE" } }
//! let own_active = Condition::eq("id", "1").and(Condition::eq("status", "ACTIVE"));
//!
//! // { coaches: { $elemMatch: { id: { $eq: "1" } } } }
//! let coached_by_me = Condition::elem_match("coaches", Condition::eq("id", "1"));
//! ```
//!
//! Documents written in the Mongo-style notation are parsed into the same
//! tree by [`Condition::from_json`].

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A structural predicate over a record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Condition {
    /// Every sub-condition holds. An empty conjunction always holds.
    And(Vec<Condition>),

    /// The value at `path` satisfies `predicate`.
    Field { path: String, predicate: Predicate },

    /// The wrapped condition does not hold.
    Not(Box<Condition>),
}

/// A test applied to the value a path resolves to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Predicate {
    /// Equal to the literal. On a sequence value: some element is equal.
    Eq(Value),
    /// Not `Eq`.
    Ne(Value),
    /// The value, or some element of a sequence value, is in the set.
    In(Vec<Value>),
    /// Not `In`.
    Nin(Vec<Value>),
    /// The wrapped predicate does not hold.
    Not(Box<Predicate>),
    /// The value is a sequence of exactly this length.
    Size(usize),
    /// The value is a sequence containing every literal.
    All(Vec<Value>),
    /// The value is a sequence with at least one element matching the
    /// sub-condition. Paths in the sub-condition are relative to the element.
    ElemMatch(Box<Condition>),
}

impl Condition {
    /// A condition that always holds.
    pub fn always() -> Self {
        Condition::And(Vec::new())
    }

    pub fn field(path: impl Into<String>, predicate: Predicate) -> Self {
        Condition::Field {
            path: path.into(),
            predicate,
        }
    }

    pub fn eq(path: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::field(path, Predicate::Eq(value.into()))
    }

    pub fn ne(path: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::field(path, Predicate::Ne(value.into()))
    }

    pub fn is_in<I, V>(path: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        Self::field(path, Predicate::In(values.into_iter().map(Into::into).collect()))
    }

    pub fn not_in<I, V>(path: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        Self::field(path, Predicate::Nin(values.into_iter().map(Into::into).collect()))
    }

    pub fn size(path: impl Into<String>, len: usize) -> Self {
        Self::field(path, Predicate::Size(len))
    }

    pub fn all_of<I, V>(path: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        Self::field(path, Predicate::All(values.into_iter().map(Into::into).collect()))
    }

    pub fn elem_match(path: impl Into<String>, condition: Condition) -> Self {
        Self::field(path, Predicate::ElemMatch(Box::new(condition)))
    }

    /// `path` holds a value that is none of `null`, `""`.
    ///
    /// Shorthand for the "relation is set" guard policies attach to
    /// affiliation paths.
    pub fn present(path: impl Into<String>) -> Self {
        Self::not_in(path, [Value::Null, Value::from("")])
    }

    /// Negate a condition.
    pub fn negate(condition: Condition) -> Self {
        Condition::Not(Box::new(condition))
    }

    /// Conjoin with `other`, flattening nested conjunctions.
    pub fn and(self, other: Condition) -> Self {
        let mut parts = match self {
            Condition::And(parts) => parts,
            single => vec![single],
        };
        match other {
            Condition::And(more) => parts.extend(more),
            single => parts.push(single),
        }
        Condition::And(parts)
    }

    /// Conjoin every condition in `conditions`.
    pub fn all(conditions: impl IntoIterator<Item = Condition>) -> Self {
        conditions
            .into_iter()
            .fold(Condition::always(), Condition::and)
    }
}

impl Predicate {
    pub fn not(predicate: Predicate) -> Self {
        Predicate::Not(Box::new(predicate))
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn and_flattens_nested_conjunctions() {
        let c = Condition::eq("a", 1)
            .and(Condition::eq("b", 2))
            .and(Condition::eq("c", 3).and(Condition::eq("d", 4)));

        match c {
            Condition::And(parts) => assert_eq!(parts.len(), 4),
            other => panic!("expected And, got {other:?}"),
        }
    }

    #[test]
    fn all_of_nothing_is_always() {
        assert_eq!(Condition::all(Vec::new()), Condition::always());
    }

    #[test]
    fn present_excludes_null_and_empty() {
        assert_eq!(
            Condition::present("institution.id"),
            Condition::field("institution.id", Predicate::Nin(vec![Value::Null, json!("")]))
        );
    }
}
