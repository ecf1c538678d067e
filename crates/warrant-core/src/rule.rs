//! Rules.
//!
//! A `Rule` is one allow/deny statement: an effect, the subject type it is
//! about, the actions it covers, an optional field scope and an optional
//! condition. Rules are created through the
//! [`AbilityBuilder`](crate::builder::AbilityBuilder) and never change
//! afterwards.

use serde::Serialize;

use warrant_condition::Condition;
use warrant_contracts::{Action, Effect, SubjectKind};

/// One allow/deny statement.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Rule<K> {
    pub(crate) effect: Effect,
    pub(crate) subject: K,
    pub(crate) actions: Vec<Action>,
    /// Empty means every field.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub(crate) fields: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) condition: Option<Condition>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) reason: Option<String>,
}

impl<K: SubjectKind> Rule<K> {
    pub(crate) fn new(effect: Effect, subject: K, actions: Vec<Action>) -> Self {
        Self {
            effect,
            subject,
            actions,
            fields: Vec::new(),
            condition: None,
            reason: None,
        }
    }

    pub fn effect(&self) -> Effect {
        self.effect
    }

    pub fn subject(&self) -> K {
        self.subject
    }

    pub fn actions(&self) -> &[Action] {
        &self.actions
    }

    /// The field scope. Empty when the rule covers every field.
    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    pub fn condition(&self) -> Option<&Condition> {
        self.condition.as_ref()
    }

    /// Human-readable explanation attached with `because`.
    pub fn reason(&self) -> Option<&str> {
        self.reason.as_deref()
    }

    /// True for a `Deny` rule.
    pub fn is_inverted(&self) -> bool {
        self.effect.is_deny()
    }

    /// True if the rule is about `subject` and covers `action`.
    pub fn applies_to(&self, subject: K, action: Action) -> bool {
        self.subject == subject && self.actions.contains(&action)
    }

    /// True if the rule is scoped to specific fields.
    pub fn is_field_scoped(&self) -> bool {
        !self.fields.is_empty()
    }
}
