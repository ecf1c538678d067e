//! The closed action vocabulary.
//!
//! Policies authorize one of a small, fixed set of operations. Keeping the
//! set closed means a typo in a policy document fails at load time instead of
//! silently producing a rule that never matches.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::WarrantError;

/// An operation a principal wants to perform on a subject.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Action {
    #[serde(rename = "create")]
    Create,
    #[serde(rename = "read")]
    Read,
    /// Bulk read. Part of the vocabulary, not used by the reference policy.
    #[serde(rename = "readAll")]
    ReadAll,
    #[serde(rename = "update")]
    Update,
    #[serde(rename = "delete")]
    Delete,
}

impl Action {
    /// Every action, in declaration order.
    pub const ALL: [Action; 5] = [
        Action::Create,
        Action::Read,
        Action::ReadAll,
        Action::Update,
        Action::Delete,
    ];

    /// The wire name used in policy documents and logs.
    pub fn as_str(self) -> &'static str {
        match self {
            Action::Create => "create",
            Action::Read => "read",
            Action::ReadAll => "readAll",
            Action::Update => "update",
            Action::Delete => "delete",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Action {
    type Err = WarrantError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Action::ALL
            .into_iter()
            .find(|a| a.as_str() == s)
            .ok_or_else(|| WarrantError::InvalidRule {
                reason: format!("unknown action '{s}'"),
            })
    }
}
