//! The policy builder.
//!
//! Policy tables accumulate rules with `allow` and `deny`, refine each with
//! `fields`, `when` and `because`, then call `build` once:
//!
//! ```rust,ignore
//! let mut builder = AbilityBuilder::new();
//!
//! builder
//!     .allow(Kind::User, [Action::Read])
//!     .fields(["id", "email", "first_name"])
//!     .when(Condition::eq("id", principal_id));
//!
//! builder
//!     .deny(Kind::User, [Action::Read])
//!     .fields(["password"])
//!     .because("passwords are never readable");
//!
//! let ability = builder.build()?;
//! ```
//!
//! Order matters: the decision is taken by the last matching rule, so broad
//! denials go first, the grants that carve exceptions out of them after, and
//! the statements nothing may override last.
//!
//! `build` only checks structure (every rule has an action, field names are
//! not blank). Conflicting rules are legal; precedence resolves them.

use std::sync::Arc;

use tracing::debug;

use warrant_condition::Condition;
use warrant_contracts::{Action, Effect, SubjectKind, WarrantError, WarrantResult};

use crate::ability::Ability;
use crate::field::ExactFieldMatcher;
use crate::rule::Rule;
use crate::traits::{ConditionsMatcher, FieldMatcher, StructuralMatcher};

/// Single-owner accumulator of rules, consumed by `build`.
#[derive(Debug)]
pub struct AbilityBuilder<K> {
    rules: Vec<Rule<K>>,
    field_matcher: Arc<dyn FieldMatcher>,
    conditions_matcher: Arc<dyn ConditionsMatcher>,
}

impl<K: SubjectKind> AbilityBuilder<K> {
    /// An empty builder using exact field matching and the structural
    /// condition matcher.
    pub fn new() -> Self {
        Self {
            rules: Vec::new(),
            field_matcher: Arc::new(ExactFieldMatcher),
            conditions_matcher: Arc::new(StructuralMatcher),
        }
    }

    /// Replace the field matcher used by the built ability.
    pub fn with_field_matcher(mut self, matcher: impl FieldMatcher + 'static) -> Self {
        self.field_matcher = Arc::new(matcher);
        self
    }

    /// Replace the conditions matcher used by the built ability.
    pub fn with_conditions_matcher(mut self, matcher: impl ConditionsMatcher + 'static) -> Self {
        self.conditions_matcher = Arc::new(matcher);
        self
    }

    /// Append a rule granting `actions` on `subject`.
    pub fn allow<A>(&mut self, subject: K, actions: A) -> RuleBuilder<'_, K>
    where
        A: IntoIterator<Item = Action>,
    {
        self.push(Effect::Allow, subject, actions)
    }

    /// Append a rule withholding `actions` on `subject`.
    pub fn deny<A>(&mut self, subject: K, actions: A) -> RuleBuilder<'_, K>
    where
        A: IntoIterator<Item = Action>,
    {
        self.push(Effect::Deny, subject, actions)
    }

    /// Number of rules accumulated so far.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Validate the accumulated rules and freeze them into an `Ability`.
    ///
    /// Returns `WarrantError::InvalidRule` for a rule without actions or
    /// with a blank field name.
    pub fn build(self) -> WarrantResult<Ability<K>> {
        for (index, rule) in self.rules.iter().enumerate() {
            if rule.actions.is_empty() {
                return Err(WarrantError::InvalidRule {
                    reason: format!(
                        "rule #{index} ({} {}) has no actions",
                        rule.effect, rule.subject
                    ),
                });
            }
            if let Some(blank) = rule.fields.iter().position(|f| f.trim().is_empty()) {
                return Err(WarrantError::InvalidRule {
                    reason: format!(
                        "rule #{index} ({} {}) has a blank field name at position {blank}",
                        rule.effect, rule.subject
                    ),
                });
            }
        }

        debug!(rule_count = self.rules.len(), "rule set built");

        Ok(Ability::new(
            self.rules,
            self.field_matcher,
            self.conditions_matcher,
        ))
    }

    fn push<A>(&mut self, effect: Effect, subject: K, actions: A) -> RuleBuilder<'_, K>
    where
        A: IntoIterator<Item = Action>,
    {
        let mut actions: Vec<Action> = actions.into_iter().collect();
        actions.sort_unstable();
        actions.dedup();

        let index = self.rules.len();
        self.rules.push(Rule::new(effect, subject, actions));
        RuleBuilder {
            rule: &mut self.rules[index],
        }
    }
}

impl<K: SubjectKind> Default for AbilityBuilder<K> {
    fn default() -> Self {
        Self::new()
    }
}

/// Refines the rule most recently appended to an `AbilityBuilder`.
#[derive(Debug)]
pub struct RuleBuilder<'b, K> {
    rule: &'b mut Rule<K>,
}

impl<K: SubjectKind> RuleBuilder<'_, K> {
    /// Scope the rule to the listed fields. An empty list keeps it
    /// record-wide.
    pub fn fields<I, F>(self, fields: I) -> Self
    where
        I: IntoIterator<Item = F>,
        F: Into<String>,
    {
        self.rule.fields = fields.into_iter().map(Into::into).collect();
        self
    }

    /// Restrict the rule to records matching `condition`.
    pub fn when(self, condition: Condition) -> Self {
        self.rule.condition = Some(condition);
        self
    }

    /// Attach a human-readable reason, surfaced by `Ability::explain`.
    pub fn because(self, reason: impl Into<String>) -> Self {
        self.rule.reason = Some(reason.into());
        self
    }
}
