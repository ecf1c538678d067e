//! The documented scenarios, evaluated against the code policy table and
//! the TOML policy document.

use serde_json::{json, Value};
use warrant_contracts::{Action, Effect};
use warrant_ref_coaching::mock_data::{
    behavior_of, coached_parent, coached_parent_populated, institution, principal, roleless,
    user_record, HOME_INSTITUTION, OTHER_INSTITUTION,
};
use warrant_ref_coaching::scenarios::{self, Outcome};
use warrant_ref_coaching::{
    define_ability_for, define_ability_from_document, CoachingSubject, User, UserField, UserRole,
    UserStatus,
};

fn failures(outcomes: &[Outcome]) -> Vec<String> {
    outcomes
        .iter()
        .filter(|o| !o.passed())
        .map(|o| {
            format!(
                "{} [{} {:?}]: expected {}, got {}",
                o.name, o.action, o.field, o.expected, o.actual
            )
        })
        .collect()
}

// ── Scenario grid ─────────────────────────────────────────────────────────────

#[test]
fn every_scenario_holds_for_the_code_table() {
    let outcomes = scenarios::run(&scenarios::all(), define_ability_for).unwrap();
    let failed = failures(&outcomes);
    assert!(failed.is_empty(), "failing scenarios:\n{}", failed.join("\n"));
}

#[test]
fn every_scenario_holds_for_the_policy_document() {
    let outcomes = scenarios::run(&scenarios::all(), define_ability_from_document).unwrap();
    let failed = failures(&outcomes);
    assert!(failed.is_empty(), "failing scenarios:\n{}", failed.join("\n"));
}

#[test]
fn code_table_and_document_agree_rule_for_rule() {
    for roles in [
        vec![],
        vec![UserRole::Parent],
        vec![UserRole::Coach],
        vec![UserRole::TreatmentCentre],
        vec![UserRole::Admin],
        vec![UserRole::Parent, UserRole::Coach],
    ] {
        let principal = principal("1", &roles);
        let code = define_ability_for(&principal).unwrap();
        let document = define_ability_from_document(&principal).unwrap();

        assert_eq!(code.len(), document.len(), "rule count differs for {roles:?}");
        for (index, (a, b)) in code.rules().iter().zip(document.rules()).enumerate() {
            assert_eq!(a.effect(), b.effect());
            assert_eq!(a.subject(), b.subject());
            assert_eq!(a.actions(), b.actions());
            assert_eq!(a.fields(), b.fields());
            assert_eq!(a.condition().is_some(), b.condition().is_some());

            for record in fixtures(a.subject()) {
                assert_eq!(
                    a.condition().map(|c| c.matches(&record)),
                    b.condition().map(|c| c.matches(&record)),
                    "rule #{index} conditions disagree for {roles:?} on {record}"
                );
            }
        }
    }
}

/// Records of `kind` covering owned, coached, populated, foreign and
/// unplaced shapes, as attribute bags.
fn fixtures(kind: CoachingSubject) -> Vec<Value> {
    fn bag<T: serde::Serialize>(record: T) -> Value {
        serde_json::to_value(record).unwrap()
    }

    let mut unplaced = user_record("2", &[UserRole::Parent], UserStatus::Active);
    unplaced.institution = None;

    let users = vec![
        user_record("1", &[UserRole::Parent], UserStatus::Active),
        user_record("1", &[UserRole::Coach], UserStatus::Suspended),
        user_record("2", &[UserRole::Parent], UserStatus::Active),
        user_record("2", &[UserRole::Parent], UserStatus::Suspended),
        user_record("2", &[UserRole::Coach], UserStatus::Active),
        user_record("2", &[UserRole::TreatmentCentre], UserStatus::Active),
        user_record("3", &[UserRole::Admin], UserStatus::Active),
        user_record("2", &[], UserStatus::Inactive),
        user_record("2", &[UserRole::Parent], UserStatus::Active)
            .with_institution(OTHER_INSTITUTION),
        coached_parent("2", "1"),
        coached_parent_populated("2", "1"),
        coached_parent("2", "1").with_institution(OTHER_INSTITUTION),
        unplaced,
    ];

    match kind {
        CoachingSubject::User => users.into_iter().map(bag).collect(),
        CoachingSubject::Behavior => {
            let stranger = user_record("2", &[UserRole::Parent], UserStatus::Active);
            let foreign = coached_parent("2", "1").with_institution(OTHER_INSTITUTION);
            vec![
                bag(behavior_of("B1", User::new("1"))),
                bag(behavior_of("B2", stranger.clone())),
                bag(behavior_of("B2", stranger).with_observers(["1"])),
                bag(behavior_of("B3", coached_parent("2", "1"))),
                bag(behavior_of("B3", coached_parent_populated("2", "1"))),
                bag(behavior_of("B4", foreign)),
            ]
        }
        CoachingSubject::Institution => vec![
            bag(institution(HOME_INSTITUTION)),
            bag(institution(OTHER_INSTITUTION)),
        ],
        _ => vec![json!({}), json!({ "id": "1" })],
    }
}

// ── Named properties ──────────────────────────────────────────────────────────

#[test]
fn password_is_hidden_even_on_own_record() {
    let me = principal("1", &[UserRole::Parent]);
    let ability = define_ability_for(&me).unwrap();
    let own = user_record("1", &[UserRole::Parent], UserStatus::Active);

    assert_eq!(ability.decide(Action::Read, &own, Some("email")), Effect::Allow);
    assert_eq!(ability.decide(Action::Read, &own, Some("password")), Effect::Deny);
}

#[test]
fn ownership_gates_profile_updates() {
    let me = principal("1", &[UserRole::Coach]);
    let ability = define_ability_for(&me).unwrap();

    let own = user_record("1", &[UserRole::Coach], UserStatus::Active);
    let other = user_record("2", &[UserRole::Coach], UserStatus::Active);

    assert!(ability.can_field(Action::Update, &own, UserField::FirstName));
    for field in UserField::ALL {
        assert!(ability.cannot_field(Action::Update, &other, field));
    }
}

#[test]
fn no_roles_means_no_behavior_creation() {
    let ability = define_ability_for(&roleless("1")).unwrap();
    assert!(ability.cannot_type(Action::Create, CoachingSubject::Behavior));
}

#[test]
fn permitted_fields_filter_what_a_coach_sees() {
    let ability = define_ability_for(&principal("1", &[UserRole::Coach])).unwrap();
    let parent = coached_parent("2", "1");

    let visible =
        ability.permitted_fields_of(Action::Read, &parent, UserField::ALL.iter().copied());
    assert_eq!(
        visible,
        vec![
            UserField::Id,
            UserField::Email,
            UserField::FirstName,
            UserField::LastName,
            UserField::DateCreated,
            UserField::Coaches,
            UserField::Municipality,
            UserField::Institution,
        ]
    );
}

#[test]
fn legacy_payloads_are_decided_like_canonical_ones() {
    let ability = define_ability_for(&principal("1", &[UserRole::Coach])).unwrap();

    let legacy: User = serde_json::from_value(json!({
        "id": "2",
        "role": "PARENT",
        "status": "ACTIVE",
        "coach": "1",
        "institution": "I1",
    }))
    .unwrap();

    let field: UserField = "coach".parse().unwrap();
    assert!(ability.can_field(Action::Read, &legacy, field));
    assert!(ability.can_field(Action::Read, &legacy, UserField::Email));
}

#[test]
fn deciding_rule_carries_its_reason() {
    let ability = define_ability_for(&principal("1", &[UserRole::Parent])).unwrap();
    let stranger = user_record("2", &[UserRole::Parent], UserStatus::Active);

    let e = ability.explain(Action::Read, &stranger, None);
    assert_eq!(e.effect, Effect::Deny);
    assert_eq!(e.reason.as_deref(), Some("parents only see their own profile"));
}
