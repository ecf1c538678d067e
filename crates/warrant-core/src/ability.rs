//! The rule set and its decision algorithm.
//!
//! An `Ability` is the ordered, immutable rule list built for one principal.
//! A query `(action, subject, field?)` is answered as follows:
//!
//!   1. keep rules about the subject's type
//!   2. keep rules covering the action
//!   3. keep rules whose field scope covers the field
//!   4. keep rules whose condition holds for the subject
//!   5. the last surviving rule decides; no survivor means `Deny`
//!
//! Two kinds of query leave part of a rule undetermined:
//!
//! - a record-level query (no field) against a field-scoped rule, and
//! - a type-level query (a subject type, no record) against a conditional rule.
//!
//! In both cases an `Allow` rule stays eligible (the principal may act on
//! *some* field, or on *some* record of that type) while a `Deny` rule does
//! not (withholding some fields or some records withholds neither the whole
//! record nor the whole type).
//!
//! Queries never fail. A subject whose attributes cannot be produced matches
//! only unconditional rules.

use std::borrow::Cow;
use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

use warrant_contracts::{Action, Effect, Subject, SubjectKind};

use crate::rule::Rule;
use crate::traits::{ConditionsMatcher, FieldMatcher};

/// What a query is evaluated against.
#[derive(Debug, Clone, Copy)]
enum Target<'a> {
    /// A subject type with no record instance.
    Type,
    /// A record's attribute bag.
    Record(&'a Value),
    /// A record whose attributes could not be produced.
    Unavailable,
}

/// The outcome of a query together with the rule that produced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Explanation {
    pub effect: Effect,
    /// Position of the deciding rule; `None` when no rule matched.
    pub rule_index: Option<usize>,
    /// The deciding rule's `because` text, if any.
    pub reason: Option<String>,
}

/// An immutable, principal-scoped rule set.
///
/// Cheap to clone (the matchers are shared) and safe to query from many
/// threads at once.
#[derive(Debug, Clone, Serialize)]
pub struct Ability<K> {
    rules: Vec<Rule<K>>,
    #[serde(skip)]
    field_matcher: Arc<dyn FieldMatcher>,
    #[serde(skip)]
    conditions_matcher: Arc<dyn ConditionsMatcher>,
}

impl<K: SubjectKind> Ability<K> {
    pub(crate) fn new(
        rules: Vec<Rule<K>>,
        field_matcher: Arc<dyn FieldMatcher>,
        conditions_matcher: Arc<dyn ConditionsMatcher>,
    ) -> Self {
        Self {
            rules,
            field_matcher,
            conditions_matcher,
        }
    }

    /// Rules in declaration order.
    pub fn rules(&self) -> &[Rule<K>] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    // ── Decisions ─────────────────────────────────────────────────────────────

    /// Decide `action` on `subject`, optionally narrowed to one field.
    pub fn decide<S>(&self, action: Action, subject: &S, field: Option<&str>) -> Effect
    where
        S: Subject<Kind = K> + ?Sized,
    {
        self.explain(action, subject, field).effect
    }

    /// Decide `action` on the subject type `kind` itself, without a record.
    pub fn decide_type(&self, action: Action, kind: K, field: Option<&str>) -> Effect {
        self.decision(action, kind, Target::Type, field).effect
    }

    /// True if `action` is permitted on `subject` as a whole.
    pub fn can<S>(&self, action: Action, subject: &S) -> bool
    where
        S: Subject<Kind = K> + ?Sized,
    {
        self.decide(action, subject, None).is_allow()
    }

    /// True if `action` is not permitted on `subject` as a whole.
    pub fn cannot<S>(&self, action: Action, subject: &S) -> bool
    where
        S: Subject<Kind = K> + ?Sized,
    {
        !self.can(action, subject)
    }

    /// True if `action` is permitted on `field` of `subject`.
    pub fn can_field<S>(&self, action: Action, subject: &S, field: impl AsRef<str>) -> bool
    where
        S: Subject<Kind = K> + ?Sized,
    {
        self.decide(action, subject, Some(field.as_ref())).is_allow()
    }

    /// True if `action` is not permitted on `field` of `subject`.
    pub fn cannot_field<S>(&self, action: Action, subject: &S, field: impl AsRef<str>) -> bool
    where
        S: Subject<Kind = K> + ?Sized,
    {
        !self.can_field(action, subject, field)
    }

    /// True if `action` is permitted on some record of type `kind`.
    pub fn can_type(&self, action: Action, kind: K) -> bool {
        self.decide_type(action, kind, None).is_allow()
    }

    /// True if `action` is permitted on no record of type `kind`.
    pub fn cannot_type(&self, action: Action, kind: K) -> bool {
        !self.can_type(action, kind)
    }

    /// Decide and report which rule decided.
    pub fn explain<S>(&self, action: Action, subject: &S, field: Option<&str>) -> Explanation
    where
        S: Subject<Kind = K> + ?Sized,
    {
        let kind = subject.subject_type();
        let attributes = attributes_of(subject);
        let target = match &attributes {
            Some(value) => Target::Record(value.as_ref()),
            None => Target::Unavailable,
        };
        self.decision(action, kind, target, field)
    }

    /// The rule that decides the query, if any.
    pub fn relevant_rule_for<S>(
        &self,
        action: Action,
        subject: &S,
        field: Option<&str>,
    ) -> Option<&Rule<K>>
    where
        S: Subject<Kind = K> + ?Sized,
    {
        self.explain(action, subject, field)
            .rule_index
            .map(|index| &self.rules[index])
    }

    /// Rules that could answer the query before conditions are considered,
    /// latest first.
    pub fn rules_for<'a>(
        &'a self,
        action: Action,
        kind: K,
        field: Option<&'a str>,
    ) -> impl Iterator<Item = &'a Rule<K>> + 'a {
        self.candidates(action, kind, field).map(|(_, rule)| rule)
    }

    /// Of `fields`, those `action` is permitted on for `subject`.
    pub fn permitted_fields_of<S, I, F>(&self, action: Action, subject: &S, fields: I) -> Vec<F>
    where
        S: Subject<Kind = K> + ?Sized,
        I: IntoIterator<Item = F>,
        F: AsRef<str>,
    {
        let kind = subject.subject_type();
        let attributes = attributes_of(subject);
        let target = match &attributes {
            Some(value) => Target::Record(value.as_ref()),
            None => Target::Unavailable,
        };
        fields
            .into_iter()
            .filter(|field| {
                self.decision(action, kind, target, Some(field.as_ref()))
                    .effect
                    .is_allow()
            })
            .collect()
    }

    // ── Internal helpers ──────────────────────────────────────────────────────

    fn decision(
        &self,
        action: Action,
        kind: K,
        target: Target<'_>,
        field: Option<&str>,
    ) -> Explanation {
        let found = self
            .candidates(action, kind, field)
            .find(|(_, rule)| self.condition_eligible(rule, target));

        match found {
            Some((index, rule)) => {
                debug!(
                    action = %action,
                    subject_type = %kind,
                    field = ?field,
                    rule_index = index,
                    effect = %rule.effect,
                    "rule matched"
                );
                Explanation {
                    effect: rule.effect,
                    rule_index: Some(index),
                    reason: rule.reason.clone(),
                }
            }
            None => {
                debug!(
                    action = %action,
                    subject_type = %kind,
                    field = ?field,
                    "no rule matched; denying by default"
                );
                Explanation {
                    effect: Effect::Deny,
                    rule_index: None,
                    reason: None,
                }
            }
        }
    }

    /// Steps 1-3 of the algorithm, latest rule first.
    fn candidates<'a>(
        &'a self,
        action: Action,
        kind: K,
        field: Option<&'a str>,
    ) -> impl Iterator<Item = (usize, &'a Rule<K>)> + 'a {
        self.rules
            .iter()
            .enumerate()
            .rev()
            .filter(move |(_, rule)| rule.applies_to(kind, action))
            .filter(move |(_, rule)| self.field_eligible(rule, field))
    }

    fn field_eligible(&self, rule: &Rule<K>, field: Option<&str>) -> bool {
        if !rule.is_field_scoped() {
            return true;
        }
        match field {
            Some(field) => self.field_matcher.applies(&rule.fields, field),
            None => rule.effect.is_allow(),
        }
    }

    fn condition_eligible(&self, rule: &Rule<K>, target: Target<'_>) -> bool {
        let Some(condition) = &rule.condition else {
            return true;
        };
        match target {
            Target::Record(record) => self.conditions_matcher.matches(condition, record),
            Target::Type => rule.effect.is_allow(),
            Target::Unavailable => false,
        }
    }
}

fn attributes_of<S: Subject + ?Sized>(subject: &S) -> Option<Cow<'_, Value>> {
    match subject.attributes() {
        Ok(attributes) => Some(attributes),
        Err(e) => {
            warn!(
                subject_type = %subject.subject_type(),
                error = %e,
                "subject attributes unavailable; conditional rules will not match"
            );
            None
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use std::fmt;

    use serde_json::json;

    use warrant_condition::Condition;
    use warrant_contracts::{Action, Effect, Record};

    use crate::builder::AbilityBuilder;
    use crate::field::GlobFieldMatcher;

    // ── Helpers ───────────────────────────────────────────────────────────────

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize)]
    pub(crate) enum Kind {
        User,
        Behavior,
    }

    impl fmt::Display for Kind {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            match self {
                Kind::User => f.write_str("User"),
                Kind::Behavior => f.write_str("Behavior"),
            }
        }
    }

    fn user(attrs: serde_json::Value) -> Record<Kind> {
        Record::new(Kind::User, attrs)
    }

    const READ: [Action; 1] = [Action::Read];
    const UPDATE: [Action; 1] = [Action::Update];

    // ── 1. default-closed ─────────────────────────────────────────────────────

    #[test]
    fn empty_rule_set_denies_everything() {
        let ability = AbilityBuilder::<Kind>::new().build().unwrap();
        let subject = user(json!({ "id": "1" }));

        for action in Action::ALL {
            assert_eq!(ability.decide(action, &subject, None), Effect::Deny);
            assert_eq!(ability.decide(action, &subject, Some("email")), Effect::Deny);
            assert!(ability.cannot_type(action, Kind::User));
        }
    }

    // ── 2. last match wins ────────────────────────────────────────────────────

    #[test]
    fn later_deny_overrides_earlier_allow() {
        let mut b = AbilityBuilder::new();
        b.allow(Kind::User, READ).fields(["email"]);
        b.deny(Kind::User, READ).fields(["email"]);
        let ability = b.build().unwrap();

        assert!(ability.cannot_field(Action::Read, &user(json!({})), "email"));
    }

    #[test]
    fn reversing_declaration_order_flips_the_decision() {
        let mut b = AbilityBuilder::new();
        b.deny(Kind::User, READ).fields(["email"]);
        b.allow(Kind::User, READ).fields(["email"]);
        let ability = b.build().unwrap();

        assert!(ability.can_field(Action::Read, &user(json!({})), "email"));
    }

    #[test]
    fn broad_deny_then_narrow_allow_grants_the_exception() {
        let mut b = AbilityBuilder::new();
        b.deny(Kind::User, READ);
        b.allow(Kind::User, READ).when(Condition::eq("id", "1"));
        let ability = b.build().unwrap();

        assert!(ability.can(Action::Read, &user(json!({ "id": "1" }))));
        assert!(ability.cannot(Action::Read, &user(json!({ "id": "2" }))));
    }

    // ── 3. field scoping ──────────────────────────────────────────────────────

    #[test]
    fn field_less_allow_covers_every_field() {
        let mut b = AbilityBuilder::new();
        b.allow(Kind::User, READ).when(Condition::eq("id", "1"));
        let ability = b.build().unwrap();
        let me = user(json!({ "id": "1" }));

        for field in ["id", "email", "never_mentioned_anywhere"] {
            assert!(ability.can_field(Action::Read, &me, field));
        }
        assert!(ability.can(Action::Read, &me));
    }

    #[test]
    fn multi_field_rule_keeps_a_single_position() {
        let mut b = AbilityBuilder::new();
        b.deny(Kind::User, READ).fields(["email"]);
        b.allow(Kind::User, READ).fields(["id", "email", "first_name"]);
        let ability = b.build().unwrap();
        let subject = user(json!({}));

        assert!(ability.can_field(Action::Read, &subject, "email"));
        assert!(ability.can_field(Action::Read, &subject, "id"));
        assert!(ability.cannot_field(Action::Read, &subject, "password"));
    }

    #[test]
    fn record_level_query_sees_field_scoped_allows_but_not_denies() {
        let mut b = AbilityBuilder::new();
        b.allow(Kind::User, READ).fields(["email"]);
        b.deny(Kind::User, READ).fields(["password"]);
        let ability = b.build().unwrap();
        let subject = user(json!({}));

        // Some field is readable, so the record is.
        assert!(ability.can(Action::Read, &subject));
        let rule = ability.relevant_rule_for(Action::Read, &subject, None).unwrap();
        assert_eq!(rule.effect(), Effect::Allow);
    }

    #[test]
    fn field_scoped_deny_alone_does_not_grant_the_record() {
        let mut b = AbilityBuilder::new();
        b.deny(Kind::User, READ).fields(["password"]);
        let ability = b.build().unwrap();

        assert!(ability.cannot(Action::Read, &user(json!({}))));
    }

    // ── 4. conditions ─────────────────────────────────────────────────────────

    #[test]
    fn ownership_gated_update() {
        let mut b = AbilityBuilder::new();
        b.allow(Kind::User, UPDATE)
            .fields(["first_name", "last_name", "password"])
            .when(Condition::eq("id", "1").and(Condition::eq("status", "ACTIVE")));
        let ability = b.build().unwrap();

        let me = user(json!({ "id": "1", "status": "ACTIVE" }));
        let other = user(json!({ "id": "2", "status": "ACTIVE" }));

        assert!(ability.can_field(Action::Update, &me, "first_name"));
        assert!(ability.cannot_field(Action::Update, &me, "email"));
        for field in ["first_name", "last_name", "password", "email"] {
            assert!(ability.cannot_field(Action::Update, &other, field));
        }
        assert!(ability.cannot(Action::Update, &other));
    }

    #[test]
    fn conditional_deny_only_applies_to_matching_records() {
        let mut b = AbilityBuilder::new();
        b.allow(Kind::User, READ);
        b.deny(Kind::User, READ).when(Condition::ne("id", "1"));
        let ability = b.build().unwrap();

        assert!(ability.can(Action::Read, &user(json!({ "id": "1" }))));
        assert!(ability.cannot(Action::Read, &user(json!({ "id": "2" }))));
    }

    // ── 5. subject types ──────────────────────────────────────────────────────

    #[test]
    fn rules_never_cross_subject_types() {
        let mut b = AbilityBuilder::new();
        b.allow(Kind::User, READ);
        let ability = b.build().unwrap();

        assert!(ability.can(Action::Read, &user(json!({}))));
        assert!(ability.cannot(Action::Read, &Record::new(Kind::Behavior, json!({}))));
    }

    #[test]
    fn type_level_queries_see_conditional_allows_but_not_denies() {
        let mut b = AbilityBuilder::new();
        b.allow(Kind::Behavior, [Action::Delete]).when(Condition::eq("user.id", "1"));
        b.deny(Kind::Behavior, [Action::Delete]).when(Condition::eq("locked", true));
        b.deny(Kind::Behavior, [Action::Create]);
        let ability = b.build().unwrap();

        assert!(ability.can_type(Action::Delete, Kind::Behavior));
        assert!(ability.cannot_type(Action::Create, Kind::Behavior));
        assert!(ability.cannot_type(Action::Read, Kind::Behavior));
    }

    // ── 6. explanations and helpers ───────────────────────────────────────────

    #[test]
    fn explain_reports_the_deciding_rule() {
        let mut b = AbilityBuilder::new();
        b.allow(Kind::User, READ);
        b.deny(Kind::User, READ)
            .fields(["password"])
            .because("passwords are never readable");
        let ability = b.build().unwrap();
        let subject = user(json!({}));

        let e = ability.explain(Action::Read, &subject, Some("password"));
        assert_eq!(e.effect, Effect::Deny);
        assert_eq!(e.rule_index, Some(1));
        assert_eq!(e.reason.as_deref(), Some("passwords are never readable"));

        let e = ability.explain(Action::Read, &subject, Some("email"));
        assert_eq!(e.rule_index, Some(0));

        let e = ability.explain(Action::Delete, &subject, None);
        assert_eq!(e, super::Explanation { effect: Effect::Deny, rule_index: None, reason: None });
    }

    #[test]
    fn rules_for_lists_candidates_latest_first() {
        let mut b = AbilityBuilder::new();
        b.allow(Kind::User, READ).because("first");
        b.allow(Kind::User, UPDATE).because("other action");
        b.deny(Kind::User, READ).fields(["password"]).because("second");
        let ability = b.build().unwrap();

        let reasons: Vec<_> = ability
            .rules_for(Action::Read, Kind::User, Some("password"))
            .filter_map(|r| r.reason())
            .collect();
        assert_eq!(reasons, vec!["second", "first"]);
    }

    #[test]
    fn permitted_fields_filters_a_field_universe() {
        let mut b = AbilityBuilder::new();
        b.allow(Kind::User, READ).when(Condition::eq("id", "1"));
        b.deny(Kind::User, READ).fields(["password"]);
        let ability = b.build().unwrap();

        let permitted = ability.permitted_fields_of(
            Action::Read,
            &user(json!({ "id": "1" })),
            ["id", "email", "password"],
        );
        assert_eq!(permitted, vec!["id", "email"]);
    }

    #[test]
    fn glob_field_matcher_is_used_when_configured() {
        let mut b = AbilityBuilder::new().with_field_matcher(GlobFieldMatcher::new());
        b.allow(Kind::User, READ).fields(["address.*"]);
        let ability = b.build().unwrap();

        assert!(ability.can_field(Action::Read, &user(json!({})), "address.city"));
        assert!(ability.cannot_field(Action::Read, &user(json!({})), "email"));
    }

    // ── 7. build-time validation ──────────────────────────────────────────────

    #[test]
    fn rule_without_actions_is_rejected() {
        let mut b = AbilityBuilder::new();
        b.allow(Kind::User, Vec::<Action>::new());
        let err = b.build().unwrap_err();
        assert!(err.to_string().contains("has no actions"));
    }

    #[test]
    fn blank_field_name_is_rejected() {
        let mut b = AbilityBuilder::new();
        b.allow(Kind::User, READ).fields(["id", "  "]);
        let err = b.build().unwrap_err();
        assert!(err.to_string().contains("blank field name"));
    }

    #[test]
    fn rule_sets_serialize_as_data() {
        let mut b = AbilityBuilder::new();
        b.allow(Kind::User, [Action::Read, Action::ReadAll])
            .when(Condition::eq("id", "1"));
        let ability = b.build().unwrap();

        let json = serde_json::to_value(&ability).unwrap();
        assert_eq!(json["rules"][0]["effect"], "allow");
        assert_eq!(json["rules"][0]["actions"], json!(["read", "readAll"]));
        assert!(json["rules"][0].get("fields").is_none());
    }

    #[test]
    fn ability_is_shareable_across_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<super::Ability<Kind>>();
    }

    // ── 8. properties ─────────────────────────────────────────────────────────

    mod properties {
        use proptest::prelude::*;

        use super::*;

        fn arb_action() -> impl Strategy<Value = Action> {
            prop_oneof![
                Just(Action::Create),
                Just(Action::Read),
                Just(Action::ReadAll),
                Just(Action::Update),
                Just(Action::Delete),
            ]
        }

        proptest! {
            #[test]
            fn empty_rule_set_is_closed(
                action in arb_action(),
                id in "[a-z0-9]{1,8}",
                field in proptest::option::of("[a-z_]{1,12}"),
            ) {
                let ability = AbilityBuilder::<Kind>::new().build().unwrap();
                let subject = user(json!({ "id": id }));
                prop_assert_eq!(ability.decide(action, &subject, field.as_deref()), Effect::Deny);
            }

            #[test]
            fn unscoped_allow_permits_any_field(
                field in "[a-z_]{1,12}",
                id in "[a-z0-9]{1,8}",
            ) {
                let mut b = AbilityBuilder::new();
                b.allow(Kind::User, READ).when(Condition::eq("id", id.clone()));
                let ability = b.build().unwrap();

                let subject = user(json!({ "id": id }));
                let permitted = ability.can_field(Action::Read, &subject, &field);
                prop_assert!(permitted);
            }

            #[test]
            fn repeated_queries_agree(
                action in arb_action(),
                id in "[0-3]",
                field in proptest::option::of(prop_oneof![Just("email"), Just("password")]),
            ) {
                let mut b = AbilityBuilder::new();
                b.deny(Kind::User, Action::ALL);
                b.allow(Kind::User, READ).when(Condition::eq("id", "1"));
                b.deny(Kind::User, READ).fields(["password"]);
                let ability = b.build().unwrap();
                let subject = user(json!({ "id": id }));

                let first = ability.explain(action, &subject, field);
                for _ in 0..3 {
                    prop_assert_eq!(&ability.explain(action, &subject, field), &first);
                }
            }
        }
    }
}
