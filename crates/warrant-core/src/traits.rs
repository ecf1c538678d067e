//! Matcher seams of the decision algorithm.
//!
//! An `Ability` delegates two questions to pluggable matchers:
//!
//! - `FieldMatcher`: does a rule's field scope cover the requested field?
//! - `ConditionsMatcher`: does a rule's condition hold for the record?
//!
//! Both are chosen once on the builder and then shared by every query. They
//! must be pure: the same inputs always give the same answer, and nothing is
//! mutated, so an `Ability` can be queried from many threads at once.

use std::fmt;

use serde_json::Value;

use warrant_condition::Condition;

/// Decides whether a declared field pattern covers a requested field.
pub trait FieldMatcher: fmt::Debug + Send + Sync {
    /// True if `pattern` (one entry of a rule's field set) covers `field`.
    fn matches(&self, pattern: &str, field: &str) -> bool;

    /// True if a rule scoped to `fields` applies to `field`.
    ///
    /// An empty field set is a wildcard: the rule applies to every field.
    fn applies(&self, fields: &[String], field: &str) -> bool {
        fields.is_empty() || fields.iter().any(|pattern| self.matches(pattern, field))
    }
}

/// Decides whether a rule's condition holds for a record.
pub trait ConditionsMatcher: fmt::Debug + Send + Sync {
    fn matches(&self, condition: &Condition, record: &Value) -> bool;
}

/// The default conditions matcher: evaluates the structural condition tree.
#[derive(Debug, Clone, Copy, Default)]
pub struct StructuralMatcher;

impl ConditionsMatcher for StructuralMatcher {
    fn matches(&self, condition: &Condition, record: &Value) -> bool {
        condition.matches(record)
    }
}
