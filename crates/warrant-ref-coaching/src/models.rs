//! Domain records of the coaching organisation.
//!
//! Relations (`user`, `coaches`, `institution`, ...) arrive either as a bare
//! identifier or as the populated record, depending on how the caller loaded
//! them. [`Relation`] keeps whichever form it was given and serializes it
//! back unchanged; the condition matcher treats both forms alike.
//!
//! Older payloads carry a single `role` and a single `coach`. Both are read
//! into the canonical `roles` / `coaches` sets.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

// ── Relations ─────────────────────────────────────────────────────────────────

/// A record with a stable identifier.
pub trait Identified {
    fn id(&self) -> &str;
}

/// A reference to another record: its id, or the record itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Relation<T> {
    Id(String),
    Populated(Box<T>),
}

impl<T: Identified> Relation<T> {
    pub fn id(&self) -> &str {
        match self {
            Relation::Id(id) => id,
            Relation::Populated(record) => record.id(),
        }
    }
}

impl<T> From<&str> for Relation<T> {
    fn from(id: &str) -> Self {
        Relation::Id(id.to_string())
    }
}

impl<T> From<String> for Relation<T> {
    fn from(id: String) -> Self {
        Relation::Id(id)
    }
}

// ── Enumerations ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserRole {
    Parent,
    Coach,
    TreatmentCentre,
    Admin,
}

impl UserRole {
    pub const ALL: [UserRole; 4] = [
        UserRole::Parent,
        UserRole::Coach,
        UserRole::TreatmentCentre,
        UserRole::Admin,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            UserRole::Parent => "PARENT",
            UserRole::Coach => "COACH",
            UserRole::TreatmentCentre => "TREATMENT_CENTRE",
            UserRole::Admin => "ADMIN",
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<UserRole> for Value {
    fn from(role: UserRole) -> Self {
        Value::from(role.as_str())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserStatus {
    #[default]
    Active,
    Inactive,
    Suspended,
}

impl UserStatus {
    pub const ALL: [UserStatus; 3] =
        [UserStatus::Active, UserStatus::Inactive, UserStatus::Suspended];

    pub fn as_str(self) -> &'static str {
        match self {
            UserStatus::Active => "ACTIVE",
            UserStatus::Inactive => "INACTIVE",
            UserStatus::Suspended => "SUSPENDED",
        }
    }
}

impl fmt::Display for UserStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<UserStatus> for Value {
    fn from(status: UserStatus) -> Self {
        Value::from(status.as_str())
    }
}

// ── Records ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Municipality {
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_created: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Institution {
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_created: Option<DateTime<Utc>>,
    pub municipality: Option<Relation<Municipality>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct User {
    pub id: String,
    pub password: String,
    pub email: String,
    pub email_verified: bool,
    pub first_name: String,
    pub last_name: String,
    #[serde(alias = "role", deserialize_with = "one_or_many")]
    pub roles: Vec<UserRole>,
    pub status: UserStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_created: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_access: Option<DateTime<Utc>>,
    #[serde(alias = "coach", deserialize_with = "one_or_many")]
    pub coaches: Vec<Relation<User>>,
    pub municipality: Option<Relation<Municipality>>,
    pub institution: Option<Relation<Institution>>,
}

impl User {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }

    pub fn with_roles(mut self, roles: impl IntoIterator<Item = UserRole>) -> Self {
        self.roles = roles.into_iter().collect();
        self
    }

    pub fn with_status(mut self, status: UserStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_institution(mut self, institution: impl Into<Relation<Institution>>) -> Self {
        self.institution = Some(institution.into());
        self
    }

    pub fn with_coaches<R>(mut self, coaches: impl IntoIterator<Item = R>) -> Self
    where
        R: Into<Relation<User>>,
    {
        self.coaches = coaches.into_iter().map(Into::into).collect();
        self
    }

    pub fn has_role(&self, role: UserRole) -> bool {
        self.roles.contains(&role)
    }

    pub fn has_any_role(&self, roles: &[UserRole]) -> bool {
        roles.iter().any(|role| self.has_role(*role))
    }

    /// The institution's id, whichever form the relation is in. An empty id
    /// counts as no institution.
    pub fn institution_id(&self) -> Option<&str> {
        self.institution
            .as_ref()
            .map(Relation::id)
            .filter(|id| !id.is_empty())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Behavior {
    pub id: String,
    pub behavior: String,
    pub description: String,
    pub user: Option<Relation<User>>,
    pub desired: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_created: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_updated: Option<DateTime<Utc>>,
    pub observation_methods: Vec<String>,
    pub observers: Vec<Relation<User>>,
}

impl Behavior {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }

    pub fn owned_by(mut self, user: impl Into<Relation<User>>) -> Self {
        self.user = Some(user.into());
        self
    }

    pub fn with_observers<R>(mut self, observers: impl IntoIterator<Item = R>) -> Self
    where
        R: Into<Relation<User>>,
    {
        self.observers = observers.into_iter().map(Into::into).collect();
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChangeGoals {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_created: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_updated: Option<DateTime<Utc>>,
    pub user: Option<Relation<User>>,
    pub goal_description_parent: String,
    pub goal_description_child: String,
}

impl Identified for User {
    fn id(&self) -> &str {
        &self.id
    }
}

impl Identified for Institution {
    fn id(&self) -> &str {
        &self.id
    }
}

impl Identified for Municipality {
    fn id(&self) -> &str {
        &self.id
    }
}

impl From<User> for Relation<User> {
    fn from(user: User) -> Self {
        Relation::Populated(Box::new(user))
    }
}

impl From<Institution> for Relation<Institution> {
    fn from(institution: Institution) -> Self {
        Relation::Populated(Box::new(institution))
    }
}

// ── Legacy adapters ───────────────────────────────────────────────────────────

/// Accept a single value, a list, or `null` for a list-valued field.
fn one_or_many<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany<T> {
        Many(Vec<T>),
        One(T),
    }

    Ok(match Option::<OneOrMany<T>>::deserialize(deserializer)? {
        None => Vec::new(),
        Some(OneOrMany::Many(items)) => items,
        Some(OneOrMany::One(item)) => vec![item],
    })
}
