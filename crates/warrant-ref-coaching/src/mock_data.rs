//! Fixture records for the coaching reference domain.
//!
//! All data in this module is hardcoded and fictional. Ids are short strings
//! (`"1"`, `"2"`, ...) so scenarios read like the situations they describe.

use crate::models::{Behavior, Institution, Relation, User, UserRole, UserStatus};

// ── Organisation ──────────────────────────────────────────────────────────────

/// The institution every fixture user belongs to unless stated otherwise.
pub const HOME_INSTITUTION: &str = "I1";

/// An institution no fixture principal belongs to.
pub const OTHER_INSTITUTION: &str = "I2";

pub fn institution(id: &str) -> Institution {
    Institution {
        id: id.to_string(),
        name: format!("Institution {id}"),
        municipality: Some(Relation::Id("M1".to_string())),
        ..Institution::default()
    }
}

// ── Principals ────────────────────────────────────────────────────────────────

/// An active principal with `roles` in the home institution.
pub fn principal(id: &str, roles: &[UserRole]) -> User {
    User::new(id)
        .with_roles(roles.iter().copied())
        .with_institution(HOME_INSTITUTION)
}

/// A principal holding no roles at all.
pub fn roleless(id: &str) -> User {
    User::new(id).with_institution(HOME_INSTITUTION)
}

// ── Records ───────────────────────────────────────────────────────────────────

/// A fully populated user record, as returned by the user store.
pub fn user_record(id: &str, roles: &[UserRole], status: UserStatus) -> User {
    User {
        email: format!("user{id}@example.org"),
        email_verified: true,
        first_name: format!("First{id}"),
        last_name: format!("Last{id}"),
        password: "$2b$10$fixturehash".to_string(),
        ..User::new(id)
            .with_roles(roles.iter().copied())
            .with_status(status)
            .with_institution(HOME_INSTITUTION)
    }
}

/// A parent coached by `coach`, with the coach relation as a bare id.
pub fn coached_parent(id: &str, coach: &str) -> User {
    user_record(id, &[UserRole::Parent], UserStatus::Active).with_coaches([coach])
}

/// The same as [`coached_parent`], with every relation populated.
pub fn coached_parent_populated(id: &str, coach: &str) -> User {
    let mut parent = user_record(id, &[UserRole::Parent], UserStatus::Active)
        .with_coaches([User::new(coach)]);
    parent.institution = Some(institution(HOME_INSTITUTION).into());
    parent
}

/// A behavior owned by `owner`, embedded as a populated record.
pub fn behavior_of(id: &str, owner: User) -> Behavior {
    Behavior {
        behavior: "Bedtime routine".to_string(),
        description: "Goes to bed without arguing".to_string(),
        desired: true,
        observation_methods: vec!["diary".to_string()],
        ..Behavior::new(id).owned_by(owner)
    }
}
