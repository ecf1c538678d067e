//! Documented access scenarios for the coaching organisation.
//!
//! Each scenario pairs a principal and a query with the decision the policy
//! must produce. The same list drives the integration tests (against both
//! the code table and the TOML document) and the demo's `scenarios` command.

use serde::Serialize;

use warrant_contracts::{Action, Effect, WarrantResult};
use warrant_core::Ability;

use crate::models::{Behavior, User};
use crate::subject::CoachingSubject;

pub mod behavior;
pub mod user;

/// What a scenario's query is about.
#[derive(Debug, Clone)]
pub enum Target {
    User(User),
    Behavior(Behavior),
    /// A subject type with no record, e.g. "may this principal create
    /// behaviors at all?".
    Kind(CoachingSubject),
}

#[derive(Debug, Clone)]
pub struct Scenario {
    pub name: &'static str,
    pub principal: User,
    pub target: Target,
    pub action: Action,
    pub field: Option<&'static str>,
    pub expected: Effect,
}

impl Scenario {
    /// Decide the scenario's query against `ability`.
    pub fn evaluate(&self, ability: &Ability<CoachingSubject>) -> Outcome {
        let (actual, reason) = match &self.target {
            Target::User(record) => {
                let e = ability.explain(self.action, record, self.field);
                (e.effect, e.reason)
            }
            Target::Behavior(record) => {
                let e = ability.explain(self.action, record, self.field);
                (e.effect, e.reason)
            }
            Target::Kind(kind) => (ability.decide_type(self.action, *kind, self.field), None),
        };

        Outcome {
            name: self.name,
            action: self.action,
            field: self.field,
            expected: self.expected,
            actual,
            reason,
        }
    }
}

/// The result of evaluating one scenario.
#[derive(Debug, Clone, Serialize)]
pub struct Outcome {
    pub name: &'static str,
    pub action: Action,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<&'static str>,
    pub expected: Effect,
    pub actual: Effect,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl Outcome {
    pub fn passed(&self) -> bool {
        self.expected == self.actual
    }
}

/// Every documented scenario, user scenarios first.
pub fn all() -> Vec<Scenario> {
    let mut scenarios = user::scenarios();
    scenarios.extend(behavior::scenarios());
    scenarios
}

/// Evaluate `scenarios`, building each principal's rule set with `define`.
pub fn run<F>(scenarios: &[Scenario], define: F) -> WarrantResult<Vec<Outcome>>
where
    F: Fn(&User) -> WarrantResult<Ability<CoachingSubject>>,
{
    scenarios
        .iter()
        .map(|scenario| Ok(scenario.evaluate(&define(&scenario.principal)?)))
        .collect()
}

// ── Construction helpers ──────────────────────────────────────────────────────

/// One scenario per field in `fields`, all expecting `expected`.
pub(crate) fn per_field(
    name: &'static str,
    principal: &User,
    target: Target,
    action: Action,
    fields: &[&'static str],
    expected: Effect,
) -> Vec<Scenario> {
    fields
        .iter()
        .map(|&field| Scenario {
            name,
            principal: principal.clone(),
            target: target.clone(),
            action,
            field: Some(field),
            expected,
        })
        .collect()
}

/// A single scenario about the whole record (or type).
pub(crate) fn whole(
    name: &'static str,
    principal: &User,
    target: Target,
    action: Action,
    expected: Effect,
) -> Scenario {
    Scenario {
        name,
        principal: principal.clone(),
        target,
        action,
        field: None,
        expected,
    }
}
