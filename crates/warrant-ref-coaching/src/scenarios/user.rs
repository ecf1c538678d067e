//! Scenarios about `User` records.

use warrant_contracts::{Action, Effect};

use super::{per_field, whole, Scenario, Target};
use crate::mock_data::{
    coached_parent, coached_parent_populated, principal, user_record, OTHER_INSTITUTION,
};
use crate::models::{UserRole, UserStatus};
use crate::subject::CoachingSubject;

const OWN_NAME_FIELDS: &[&str] = &["first_name", "last_name", "password"];

const OWN_PROFILE_FIELDS: &[&str] = &[
    "id",
    "email_verified",
    "roles",
    "first_name",
    "last_name",
    "date_created",
    "last_access",
    "status",
    "email",
    "coaches",
];

const CONTACT_FIELDS: &[&str] = &["id", "email", "first_name", "last_name", "date_created"];

pub fn scenarios() -> Vec<Scenario> {
    let mut s = Vec::new();
    coach(&mut s);
    parent(&mut s);
    admin(&mut s);
    treatment_centre(&mut s);
    s
}

fn coach(s: &mut Vec<Scenario>) {
    use Effect::{Allow, Deny};

    let me = principal("1", &[UserRole::Coach]);
    let mine = user_record("1", &[UserRole::Coach], UserStatus::Active);

    s.extend(per_field(
        "coach reads contact fields of a coached parent",
        &me,
        Target::User(coached_parent("2", "1")),
        Action::Read,
        CONTACT_FIELDS,
        Allow,
    ));
    s.extend(per_field(
        "coach reads a coached parent with populated relations",
        &me,
        Target::User(coached_parent_populated("2", "1")),
        Action::Read,
        CONTACT_FIELDS,
        Allow,
    ));
    s.extend(per_field(
        "coach cannot read private fields of a coached parent",
        &me,
        Target::User(coached_parent("2", "1")),
        Action::Read,
        &["password", "email_verified", "status"],
        Deny,
    ));
    s.extend(per_field(
        "coach cannot read a coached parent in another institution",
        &me,
        Target::User(coached_parent("2", "1").with_institution(OTHER_INSTITUTION)),
        Action::Read,
        &["id", "email"],
        Deny,
    ));
    s.push(whole(
        "coach cannot create users",
        &me,
        Target::Kind(CoachingSubject::User),
        Action::Create,
        Deny,
    ));
    s.push(whole(
        "coach cannot create a user record",
        &me,
        Target::User(user_record("9", &[], UserStatus::Active)),
        Action::Create,
        Deny,
    ));
    s.extend(per_field(
        "coach updates own name and password",
        &me,
        Target::User(mine.clone()),
        Action::Update,
        OWN_NAME_FIELDS,
        Allow,
    ));
    s.extend(per_field(
        "coach cannot update own email",
        &me,
        Target::User(mine.clone()),
        Action::Update,
        &["email"],
        Deny,
    ));
    s.extend(per_field(
        "coach reads own profile",
        &me,
        Target::User(mine.clone()),
        Action::Read,
        OWN_PROFILE_FIELDS,
        Allow,
    ));
    s.extend(per_field(
        "coach cannot read own password",
        &me,
        Target::User(mine),
        Action::Read,
        &["password"],
        Deny,
    ));
    s.extend(per_field(
        "coach cannot read another coach",
        &me,
        Target::User(user_record("2", &[UserRole::Coach], UserStatus::Active)),
        Action::Read,
        CONTACT_FIELDS,
        Deny,
    ));
    s.extend(per_field(
        "coach cannot read a parent they do not coach",
        &me,
        Target::User(user_record("2", &[UserRole::Parent], UserStatus::Active)),
        Action::Read,
        CONTACT_FIELDS,
        Deny,
    ));
}

fn parent(s: &mut Vec<Scenario>) {
    use Effect::{Allow, Deny};

    let me = principal("1", &[UserRole::Parent]);
    let mine = user_record("1", &[UserRole::Parent], UserStatus::Active);

    s.extend(per_field(
        "parent updates own name and password",
        &me,
        Target::User(mine.clone()),
        Action::Update,
        OWN_NAME_FIELDS,
        Allow,
    ));
    s.extend(per_field(
        "suspended parent cannot update own profile",
        &me,
        Target::User(user_record("1", &[UserRole::Parent], UserStatus::Suspended)),
        Action::Update,
        OWN_NAME_FIELDS,
        Deny,
    ));
    s.extend(per_field(
        "parent cannot update someone else's profile",
        &me,
        Target::User(user_record("2", &[UserRole::Parent], UserStatus::Active)),
        Action::Update,
        &["first_name", "last_name", "password", "email"],
        Deny,
    ));
    s.extend(per_field(
        "parent reads own profile",
        &me,
        Target::User(mine.clone()),
        Action::Read,
        OWN_PROFILE_FIELDS,
        Allow,
    ));
    s.extend(per_field(
        "parent cannot read own password",
        &me,
        Target::User(mine.clone()),
        Action::Read,
        &["password"],
        Deny,
    ));
    s.push(whole(
        "parent deletes own active account",
        &me,
        Target::User(mine),
        Action::Delete,
        Allow,
    ));
    s.push(whole(
        "parent cannot create users",
        &me,
        Target::Kind(CoachingSubject::User),
        Action::Create,
        Deny,
    ));
    s.extend(per_field(
        "parent cannot read a coach",
        &me,
        Target::User(user_record("2", &[UserRole::Coach], UserStatus::Active)),
        Action::Read,
        CONTACT_FIELDS,
        Deny,
    ));
    s.extend(per_field(
        "parent cannot read another parent",
        &me,
        Target::User(user_record("2", &[UserRole::Parent], UserStatus::Active)),
        Action::Read,
        CONTACT_FIELDS,
        Deny,
    ));
    s.push(whole(
        "parent cannot read another parent's record at all",
        &me,
        Target::User(user_record("2", &[UserRole::Parent], UserStatus::Active)),
        Action::Read,
        Deny,
    ));
}

fn admin(s: &mut Vec<Scenario>) {
    use Effect::{Allow, Deny};

    let me = principal("1", &[UserRole::Admin]);

    s.extend(per_field(
        "admin updates own name and password",
        &me,
        Target::User(user_record("1", &[UserRole::Admin], UserStatus::Active)),
        Action::Update,
        OWN_NAME_FIELDS,
        Allow,
    ));
    s.push(whole(
        "admin cannot create users",
        &me,
        Target::Kind(CoachingSubject::User),
        Action::Create,
        Deny,
    ));
    s.extend(per_field(
        "admin updates roles and status of a suspended parent",
        &me,
        Target::User(user_record("2", &[UserRole::Parent], UserStatus::Suspended)),
        Action::Update,
        &["roles", "status"],
        Allow,
    ));
    s.extend(per_field(
        "admin cannot reassign a parent's coaches",
        &me,
        Target::User(user_record("2", &[UserRole::Parent], UserStatus::Suspended)),
        Action::Update,
        &["coaches"],
        Deny,
    ));
    s.extend(per_field(
        "admin assigns roles to a user without any",
        &me,
        Target::User(user_record("2", &[], UserStatus::Inactive)),
        Action::Update,
        &["roles"],
        Allow,
    ));
    s.extend(per_field(
        "admin cannot change another admin's roles",
        &me,
        Target::User(user_record("3", &[UserRole::Admin], UserStatus::Active)),
        Action::Update,
        &["roles", "status"],
        Deny,
    ));
    s.extend(per_field(
        "admin reads a parent",
        &me,
        Target::User(user_record("2", &[UserRole::Parent], UserStatus::Active)),
        Action::Read,
        &["id", "email", "first_name", "last_name", "date_created", "roles", "coaches"],
        Allow,
    ));
    s.extend(per_field(
        "admin reads a coach",
        &me,
        Target::User(user_record("2", &[UserRole::Coach], UserStatus::Active)),
        Action::Read,
        CONTACT_FIELDS,
        Allow,
    ));
    s.extend(per_field(
        "admin cannot read passwords",
        &me,
        Target::User(user_record("2", &[UserRole::Parent], UserStatus::Active)),
        Action::Read,
        &["password"],
        Deny,
    ));

    let mut unplaced = user_record("2", &[UserRole::Parent], UserStatus::Active);
    unplaced.institution = None;
    s.extend(per_field(
        "admin cannot read a user outside any institution",
        &me,
        Target::User(unplaced),
        Action::Read,
        &["email"],
        Deny,
    ));
}

fn treatment_centre(s: &mut Vec<Scenario>) {
    use Effect::{Allow, Deny};

    let me = principal("1", &[UserRole::TreatmentCentre]);

    s.extend(per_field(
        "treatment centre assigns coaches to a parent in its institution",
        &me,
        Target::User(user_record("2", &[UserRole::Parent], UserStatus::Inactive)),
        Action::Update,
        &["coaches"],
        Allow,
    ));
    s.extend(per_field(
        "treatment centre cannot assign coaches in another institution",
        &me,
        Target::User(
            user_record("2", &[UserRole::Parent], UserStatus::Active)
                .with_institution(OTHER_INSTITUTION),
        ),
        Action::Update,
        &["coaches"],
        Deny,
    ));
    s.extend(per_field(
        "treatment centre reads a coach in its institution",
        &me,
        Target::User(user_record("2", &[UserRole::Coach], UserStatus::Active)),
        Action::Read,
        &["email", "roles", "coaches"],
        Allow,
    ));
    s.extend(per_field(
        "treatment centre cannot read a coach's status",
        &me,
        Target::User(user_record("2", &[UserRole::Coach], UserStatus::Active)),
        Action::Read,
        &["status", "last_access"],
        Deny,
    ));
}
