//! Subject types of the coaching domain and their detection.

use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use warrant_contracts::{serialize_attributes, Subject, WarrantError, WarrantResult};

use crate::models::{Behavior, ChangeGoals, Institution, Municipality, User};

/// The closed set of record types rules can be written about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CoachingSubject {
    User,
    Behavior,
    Institution,
    Municipality,
    ChangeGoals,
}

impl CoachingSubject {
    pub const ALL: [CoachingSubject; 5] = [
        CoachingSubject::User,
        CoachingSubject::Behavior,
        CoachingSubject::Institution,
        CoachingSubject::Municipality,
        CoachingSubject::ChangeGoals,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            CoachingSubject::User => "User",
            CoachingSubject::Behavior => "Behavior",
            CoachingSubject::Institution => "Institution",
            CoachingSubject::Municipality => "Municipality",
            CoachingSubject::ChangeGoals => "ChangeGoals",
        }
    }
}

impl fmt::Display for CoachingSubject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Case-insensitive, so command-line input like `behavior` is accepted.
impl FromStr for CoachingSubject {
    type Err = WarrantError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| WarrantError::UnknownSubjectType { name: s.to_string() })
    }
}

macro_rules! impl_subject {
    ($($ty:ident),* $(,)?) => {
        $(
            impl Subject for $ty {
                type Kind = CoachingSubject;

                fn subject_type(&self) -> CoachingSubject {
                    CoachingSubject::$ty
                }

                fn attributes(&self) -> WarrantResult<Cow<'_, Value>> {
                    serialize_attributes(self)
                }
            }
        )*
    };
}

impl_subject!(User, Behavior, Institution, Municipality, ChangeGoals);
