//! Rule effects.
//!
//! Every rule either grants or withholds an action. The engine is
//! deny-by-default: a query no rule answers resolves to `Effect::Deny`.

use std::fmt;

use serde::{Deserialize, Serialize};

/// What a matching rule decides.
///
/// Written in lower case in policy documents:
/// ```toml
/// effect = "allow"
/// effect = "deny"
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Effect {
    /// The action is permitted.
    Allow,
    /// The action is withheld. Also the outcome when no rule matches.
    #[default]
    Deny,
}

impl Effect {
    /// True for `Effect::Allow`.
    pub fn is_allow(self) -> bool {
        matches!(self, Effect::Allow)
    }

    /// True for `Effect::Deny`.
    pub fn is_deny(self) -> bool {
        matches!(self, Effect::Deny)
    }
}

impl fmt::Display for Effect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Effect::Allow => f.write_str("allow"),
            Effect::Deny => f.write_str("deny"),
        }
    }
}
