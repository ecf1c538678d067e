//! Scenarios about `Behavior` records.

use warrant_contracts::{Action, Effect};

use super::{per_field, whole, Scenario, Target};
use crate::mock_data::{
    behavior_of, coached_parent, coached_parent_populated, principal, roleless, user_record,
    OTHER_INSTITUTION,
};
use crate::models::{User, UserRole, UserStatus};
use crate::subject::CoachingSubject;

const TEXT_FIELDS: &[&str] = &["behavior", "description", "observation_methods"];

pub fn scenarios() -> Vec<Scenario> {
    let mut s = Vec::new();
    without_roles(&mut s);
    parent(&mut s);
    coach(&mut s);
    s
}

fn without_roles(s: &mut Vec<Scenario>) {
    let me = roleless("1");

    for action in [Action::Create, Action::Read, Action::Update, Action::Delete] {
        s.push(whole(
            "principal without roles has no access to behaviors",
            &me,
            Target::Kind(CoachingSubject::Behavior),
            action,
            Effect::Deny,
        ));
    }
    s.extend(per_field(
        "principal without roles cannot read even their own behavior",
        &me,
        Target::Behavior(behavior_of("B1", User::new("1"))),
        Action::Read,
        &["description"],
        Effect::Deny,
    ));
}

fn parent(s: &mut Vec<Scenario>) {
    use Effect::{Allow, Deny};

    let me = principal("1", &[UserRole::Parent]);
    let own = behavior_of("B1", User::new("1"));
    let other_parent = user_record("2", &[UserRole::Parent], UserStatus::Active);

    s.push(whole(
        "parent may create behaviors",
        &me,
        Target::Kind(CoachingSubject::Behavior),
        Action::Create,
        Allow,
    ));
    s.extend(per_field(
        "parent fills in a new behavior",
        &me,
        Target::Kind(CoachingSubject::Behavior),
        Action::Create,
        &["behavior", "description", "desired", "observers"],
        Allow,
    ));
    s.extend(per_field(
        "parent cannot set server-managed behavior fields",
        &me,
        Target::Kind(CoachingSubject::Behavior),
        Action::Create,
        &["id", "user", "date_created", "date_updated"],
        Deny,
    ));
    s.extend(per_field(
        "parent reads own behavior",
        &me,
        Target::Behavior(own.clone()),
        Action::Read,
        &["id", "behavior", "description", "desired", "observers"],
        Allow,
    ));
    s.extend(per_field(
        "parent reads a behavior they observe",
        &me,
        Target::Behavior(behavior_of("B2", other_parent.clone()).with_observers(["1"])),
        Action::Read,
        &["description"],
        Allow,
    ));
    s.extend(per_field(
        "parent reads a behavior they observe, observers populated",
        &me,
        Target::Behavior(behavior_of("B2", other_parent.clone()).with_observers([User::new("1")])),
        Action::Read,
        &["description"],
        Allow,
    ));
    s.extend(per_field(
        "parent cannot read another parent's behavior",
        &me,
        Target::Behavior(behavior_of("B2", other_parent.clone())),
        Action::Read,
        &["description"],
        Deny,
    ));
    s.extend(per_field(
        "parent edits the text of own behavior",
        &me,
        Target::Behavior(own.clone()),
        Action::Update,
        TEXT_FIELDS,
        Allow,
    ));
    s.extend(per_field(
        "parent cannot change ownership or desirability of own behavior",
        &me,
        Target::Behavior(own.clone()),
        Action::Update,
        &["id", "desired", "user"],
        Deny,
    ));
    s.extend(per_field(
        "observing parent edits the text of a behavior",
        &me,
        Target::Behavior(behavior_of("B2", other_parent.clone()).with_observers(["1"])),
        Action::Update,
        TEXT_FIELDS,
        Allow,
    ));
    s.push(whole(
        "parent deletes own behavior",
        &me,
        Target::Behavior(own),
        Action::Delete,
        Allow,
    ));
    s.push(whole(
        "parent cannot delete another parent's behavior",
        &me,
        Target::Behavior(behavior_of("B2", other_parent)),
        Action::Delete,
        Deny,
    ));
}

fn coach(s: &mut Vec<Scenario>) {
    use Effect::{Allow, Deny};

    let me = principal("1", &[UserRole::Coach]);

    s.extend(per_field(
        "coach reads behaviors of a coached parent",
        &me,
        Target::Behavior(behavior_of("B1", coached_parent("2", "1"))),
        Action::Read,
        &["behavior", "description", "observers"],
        Allow,
    ));
    s.extend(per_field(
        "coach reads behaviors of a coached parent, relations populated",
        &me,
        Target::Behavior(behavior_of("B1", coached_parent_populated("2", "1"))),
        Action::Read,
        &["behavior", "description"],
        Allow,
    ));
    s.extend(per_field(
        "coach cannot read behaviors across institutions",
        &me,
        Target::Behavior(behavior_of(
            "B1",
            coached_parent("2", "1").with_institution(OTHER_INSTITUTION),
        )),
        Action::Read,
        &["description"],
        Deny,
    ));
    s.extend(per_field(
        "coach assigns observers to a coached parent's behavior",
        &me,
        Target::Behavior(behavior_of("B1", coached_parent("2", "1"))),
        Action::Update,
        &["observers"],
        Allow,
    ));
    s.extend(per_field(
        "coach cannot edit a behavior's text",
        &me,
        Target::Behavior(behavior_of("B1", coached_parent("2", "1"))),
        Action::Update,
        TEXT_FIELDS,
        Deny,
    ));
    s.push(whole(
        "coach cannot delete behaviors",
        &me,
        Target::Behavior(behavior_of("B1", coached_parent("2", "1"))),
        Action::Delete,
        Deny,
    ));
}
