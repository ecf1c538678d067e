//! Policy document schema.
//!
//! A `PolicyDocument` is deserialized from TOML and holds an ordered list of
//! `RuleSpec`s. Order is significant: rules are appended to the rule set in
//! declaration order and the last matching rule decides.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use warrant_contracts::{Action, Effect};

/// A single rule as written in a policy document.
///
/// Example in TOML:
/// ```toml
/// [[rules]]
/// effect = "allow"
/// subject = "User"
/// actions = ["update"]
/// fields = ["first_name", "last_name", "password"]
/// reason = "users may edit their own profile"
/// when = { roles = { "$in" = ["PARENT", "COACH"] } }
/// [rules.conditions]
/// id = "${principal.id}"
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RuleSpec {
    pub effect: Effect,

    /// Subject type name, parsed into the caller's subject enum.
    pub subject: String,

    pub actions: Vec<Action>,

    /// Field scope. Omitted or empty means every field.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<String>,

    /// Free text surfaced by `Ability::explain`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,

    /// Guard evaluated against the principal when the document is compiled.
    /// A rule whose guard does not match is left out of the rule set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub when: Option<Value>,

    /// Condition evaluated against the subject record at decision time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conditions: Option<Value>,

    /// Substitute `null` for placeholders the principal cannot resolve
    /// instead of failing.
    #[serde(default)]
    pub optional_vars: bool,
}

/// The top-level structure deserialized from a TOML policy file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PolicyDocument {
    /// Ordered list of rules. Last match wins.
    #[serde(default)]
    pub rules: Vec<RuleSpec>,
}
