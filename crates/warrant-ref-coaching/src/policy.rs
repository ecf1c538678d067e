//! The organisation's role policy.
//!
//! `define_ability_for` turns a principal into the rule set the application
//! consults. Rules are grouped per subject type and action; within a group
//! the order is: broad denials, role grants, then the narrow denials that
//! must override the grants.
//!
//! Relations are always addressed as `<relation>.id`; the path resolver
//! matches that against both a bare id and a populated record, so each grant
//! is written once.
//!
//! The same table ships as a TOML document (`policies/coaching.toml`) and
//! can be compiled with [`define_ability_from_document`].

use serde_json::Value;
use tracing::debug;

use warrant_condition::Condition;
use warrant_contracts::{Action, WarrantResult};
use warrant_core::{Ability, AbilityBuilder};
use warrant_policy::TomlPolicy;

use crate::fields::{BehaviorField, UserField};
use crate::models::{User, UserRole, UserStatus};
use crate::subject::CoachingSubject::{self, Behavior, User as UserKind};

/// The policy document equivalent to [`define_ability_for`].
pub const COACHING_POLICY: &str = include_str!("../policies/coaching.toml");

/// User fields everyone with access to a full profile may read.
const PROFILE_FIELDS: [UserField; 12] = [
    UserField::Id,
    UserField::EmailVerified,
    UserField::Email,
    UserField::FirstName,
    UserField::LastName,
    UserField::DateCreated,
    UserField::LastAccess,
    UserField::Roles,
    UserField::Status,
    UserField::Coaches,
    UserField::Municipality,
    UserField::Institution,
];

/// User fields a principal may never change on their own profile.
const LOCKED_PROFILE_FIELDS: [UserField; 10] = [
    UserField::Id,
    UserField::Email,
    UserField::EmailVerified,
    UserField::Roles,
    UserField::Status,
    UserField::DateCreated,
    UserField::LastAccess,
    UserField::Coaches,
    UserField::Municipality,
    UserField::Institution,
];

const EDITABLE_PROFILE_FIELDS: [UserField; 3] =
    [UserField::Password, UserField::FirstName, UserField::LastName];

const BEHAVIOR_TEXT_FIELDS: [BehaviorField; 3] = [
    BehaviorField::Behavior,
    BehaviorField::Description,
    BehaviorField::ObservationMethods,
];

/// Build the rule set for `principal`.
pub fn define_ability_for(principal: &User) -> WarrantResult<Ability<CoachingSubject>> {
    let me = principal.id.as_str();
    let institution = principal.institution_id();
    let has_any_role = principal.has_any_role(&UserRole::ALL);
    let no_roles = principal.roles.is_empty();
    let is = |role| principal.has_role(role);

    let mut b = AbilityBuilder::new();

    // ── User: create ──────────────────────────────────────────────────────────

    b.deny(UserKind, [Action::Create])
        .because("accounts are created through registration");

    // ── User: update ──────────────────────────────────────────────────────────

    if has_any_role {
        b.allow(UserKind, [Action::Update])
            .fields(EDITABLE_PROFILE_FIELDS)
            .when(Condition::eq("id", me).and(Condition::eq("status", UserStatus::Active)));

        b.deny(UserKind, [Action::Update])
            .fields(LOCKED_PROFILE_FIELDS)
            .when(Condition::eq("id", me))
            .because("account metadata is managed by the organisation");
    }

    if is(UserRole::TreatmentCentre) {
        b.allow(UserKind, [Action::Update])
            .fields([UserField::Coaches])
            .when(Condition::all([
                Condition::ne("id", me),
                Condition::is_in("roles", [UserRole::Parent]),
                Condition::is_in("status", UserStatus::ALL),
                same_institution("institution.id", institution),
            ]));
    }

    if is(UserRole::Admin) {
        for managed in [
            Condition::is_in(
                "roles",
                [UserRole::Parent, UserRole::Coach, UserRole::TreatmentCentre],
            ),
            Condition::size("roles", 0),
        ] {
            b.allow(UserKind, [Action::Update])
                .fields([UserField::Roles, UserField::Status])
                .when(Condition::all([
                    Condition::ne("id", me),
                    managed,
                    Condition::is_in("status", UserStatus::ALL),
                    Condition::present("institution.id"),
                ]));
        }
    }

    // ── User: delete ──────────────────────────────────────────────────────────

    if has_any_role {
        b.allow(UserKind, [Action::Delete])
            .when(Condition::eq("id", me).and(Condition::eq("status", UserStatus::Active)));
    }

    // ── User: read ────────────────────────────────────────────────────────────

    if is(UserRole::Admin) {
        b.allow(UserKind, [Action::Read])
            .fields(PROFILE_FIELDS)
            .when(Condition::eq("id", me));

        for managed in [
            Condition::is_in(
                "roles",
                [UserRole::Parent, UserRole::Coach, UserRole::TreatmentCentre],
            ),
            Condition::size("roles", 0),
        ] {
            b.allow(UserKind, [Action::Read])
                .fields(PROFILE_FIELDS)
                .when(managed.and(Condition::present("institution.id")));
        }
    }

    if is(UserRole::TreatmentCentre) {
        b.allow(UserKind, [Action::Read])
            .fields(PROFILE_FIELDS)
            .when(Condition::eq("id", me));

        b.allow(UserKind, [Action::Read])
            .fields([
                UserField::Id,
                UserField::Email,
                UserField::FirstName,
                UserField::LastName,
                UserField::DateCreated,
                UserField::Roles,
                UserField::Coaches,
                UserField::Municipality,
                UserField::Institution,
            ])
            .when(
                Condition::is_in("roles", [UserRole::Parent, UserRole::Coach])
                    .and(same_institution("institution.id", institution)),
            );
    }

    if is(UserRole::Parent) {
        b.allow(UserKind, [Action::Read])
            .fields(PROFILE_FIELDS)
            .when(Condition::eq("id", me));

        b.deny(UserKind, [Action::Read])
            .when(Condition::ne("id", me))
            .because("parents only see their own profile");
    }

    if is(UserRole::Coach) {
        b.allow(UserKind, [Action::Read])
            .fields([
                UserField::Id,
                UserField::Email,
                UserField::FirstName,
                UserField::LastName,
                UserField::DateCreated,
                UserField::Municipality,
                UserField::Institution,
                UserField::Coaches,
            ])
            .when(Condition::all([
                Condition::eq("status", UserStatus::Active),
                Condition::ne("id", me),
                Condition::is_in("roles", [UserRole::Parent]),
                Condition::elem_match("coaches", Condition::eq("id", me)),
                same_institution("institution.id", institution),
            ]));

        b.allow(UserKind, [Action::Read])
            .fields(PROFILE_FIELDS)
            .when(Condition::eq("id", me));
    }

    b.deny(UserKind, [Action::Read])
        .fields([UserField::Password])
        .because("passwords are never readable");

    // ── Behavior: create ──────────────────────────────────────────────────────

    if no_roles {
        b.deny(Behavior, [Action::Create]);
    }

    if is(UserRole::Parent) {
        b.allow(Behavior, [Action::Create]).fields([
            BehaviorField::Behavior,
            BehaviorField::Description,
            BehaviorField::Desired,
            BehaviorField::Observers,
        ]);

        b.deny(Behavior, [Action::Create]).fields([
            BehaviorField::Id,
            BehaviorField::User,
            BehaviorField::DateCreated,
            BehaviorField::DateUpdated,
        ]);
    }

    // ── Behavior: update ──────────────────────────────────────────────────────

    if no_roles {
        b.deny(Behavior, [Action::Update]);
    }

    if is(UserRole::Coach) {
        b.allow(Behavior, [Action::Update])
            .fields([BehaviorField::Observers])
            .when(
                Condition::all_of("user.coaches", [me])
                    .and(same_institution("user.institution.id", institution)),
            );
    }

    if is(UserRole::Parent) {
        b.allow(Behavior, [Action::Update])
            .fields(BEHAVIOR_TEXT_FIELDS)
            .when(Condition::eq("user.id", me));

        b.allow(Behavior, [Action::Update])
            .fields(BEHAVIOR_TEXT_FIELDS)
            .when(
                Condition::all_of("observers", [me])
                    .and(same_institution("user.institution.id", institution)),
            );

        b.deny(Behavior, [Action::Update])
            .fields([BehaviorField::Id, BehaviorField::Desired, BehaviorField::User])
            .when(Condition::eq("user.id", me));
    }

    // ── Behavior: read ────────────────────────────────────────────────────────

    if no_roles {
        b.deny(Behavior, [Action::Read]);
    }

    if is(UserRole::Parent) {
        b.allow(Behavior, [Action::Read])
            .fields(BehaviorField::ALL.iter().copied())
            .when(Condition::eq("user.id", me));

        b.allow(Behavior, [Action::Read])
            .fields(BehaviorField::ALL.iter().copied())
            .when(Condition::all_of("observers", [me]));
    }

    if is(UserRole::Coach) {
        b.allow(Behavior, [Action::Read])
            .fields(BehaviorField::ALL.iter().copied())
            .when(
                Condition::all_of("user.coaches", [me])
                    .and(same_institution("user.institution.id", institution)),
            );
    }

    // ── Behavior: delete ──────────────────────────────────────────────────────

    if no_roles {
        b.deny(Behavior, [Action::Delete]);
    }

    if is(UserRole::Parent) {
        b.allow(Behavior, [Action::Delete]).when(Condition::eq("user.id", me));
    }

    debug!(principal_id = %me, roles = ?principal.roles, rules = b.len(), "policy table applied");

    b.build()
}

/// Compile [`COACHING_POLICY`] for `principal`.
pub fn define_ability_from_document(principal: &User) -> WarrantResult<Ability<CoachingSubject>> {
    TomlPolicy::from_toml_str(COACHING_POLICY)?.build_for(principal)
}

/// `path` is set and equals the principal's institution. Never matches for a
/// principal without one.
fn same_institution(path: &str, institution: Option<&str>) -> Condition {
    Condition::eq(path, institution.map_or(Value::Null, Value::from)).and(Condition::present(path))
}
