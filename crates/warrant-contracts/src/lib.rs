//! # warrant-contracts
//!
//! Shared vocabulary for the warrant access-control engine.
//!
//! All crates in the workspace import from here. No decision logic lives in
//! this crate, only the action and effect vocabularies, the subject-type
//! traits, and the error type.

pub mod action;
pub mod effect;
pub mod error;
pub mod subject;

pub use action::Action;
pub use effect::Effect;
pub use error::{WarrantError, WarrantResult};
pub use subject::{serialize_attributes, Record, Subject, SubjectKind};

#[cfg(test)]
mod tests {
    use std::fmt;

    use serde::Serialize;
    use serde_json::json;

    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    enum Kind {
        Note,
    }

    impl fmt::Display for Kind {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("Note")
        }
    }

    #[derive(Serialize)]
    struct Note {
        id: String,
        tags: Vec<String>,
    }

    impl Subject for Note {
        type Kind = Kind;

        fn subject_type(&self) -> Kind {
            Kind::Note
        }

        fn attributes(&self) -> WarrantResult<std::borrow::Cow<'_, serde_json::Value>> {
            serialize_attributes(self)
        }
    }

    // ── Action ───────────────────────────────────────────────────────────────

    #[test]
    fn action_wire_names_round_trip_through_from_str() {
        for action in Action::ALL {
            assert_eq!(action.as_str().parse::<Action>().unwrap(), action);
        }
    }

    #[test]
    fn action_read_all_uses_camel_case_on_the_wire() {
        let json = serde_json::to_string(&Action::ReadAll).unwrap();
        assert_eq!(json, "\"readAll\"");

        let decoded: Action = serde_json::from_str("\"readAll\"").unwrap();
        assert_eq!(decoded, Action::ReadAll);
    }

    #[test]
    fn unknown_action_is_rejected() {
        let err = "manage".parse::<Action>().unwrap_err();
        assert!(err.to_string().contains("unknown action 'manage'"));

        assert!(serde_json::from_str::<Action>("\"publish\"").is_err());
    }

    // ── Effect ───────────────────────────────────────────────────────────────

    #[test]
    fn effect_defaults_to_deny() {
        assert_eq!(Effect::default(), Effect::Deny);
        assert!(Effect::default().is_deny());
        assert!(Effect::Allow.is_allow());
    }

    #[test]
    fn effect_parses_lowercase() {
        let allow: Effect = serde_json::from_str("\"allow\"").unwrap();
        let deny: Effect = serde_json::from_str("\"deny\"").unwrap();
        assert_eq!(allow, Effect::Allow);
        assert_eq!(deny, Effect::Deny);
        assert_eq!(Effect::Allow.to_string(), "allow");
    }

    // ── Subject ──────────────────────────────────────────────────────────────

    #[test]
    fn serialized_subject_exposes_its_fields() {
        let note = Note {
            id: "n1".to_string(),
            tags: vec!["a".to_string()],
        };

        assert_eq!(note.subject_type(), Kind::Note);
        let attrs = note.attributes().unwrap();
        assert_eq!(attrs.as_ref(), &json!({ "id": "n1", "tags": ["a"] }));
    }

    #[test]
    fn record_borrows_its_attributes() {
        let record = Record::new(Kind::Note, json!({ "id": "n2" }));
        let attrs = record.attributes().unwrap();

        assert!(matches!(attrs, std::borrow::Cow::Borrowed(_)));
        assert_eq!(record.subject_type(), Kind::Note);
        assert_eq!(record.value()["id"], "n2");
    }

    #[test]
    fn subject_references_delegate() {
        let record = Record::new(Kind::Note, json!({}));
        let by_ref = &record;
        assert_eq!(Subject::subject_type(&by_ref), Kind::Note);
    }

    // ── Error display messages ───────────────────────────────────────────────

    #[test]
    fn error_messages_carry_their_context() {
        let err = WarrantError::InvalidRule {
            reason: "rule 3 has no actions".to_string(),
        };
        assert!(err.to_string().contains("invalid rule"));
        assert!(err.to_string().contains("rule 3 has no actions"));

        let err = WarrantError::UnresolvedVariable {
            name: "principal.institution.id".to_string(),
        };
        assert!(err.to_string().contains("principal.institution.id"));

        let err = WarrantError::UnknownSubjectType {
            name: "Invoice".to_string(),
        };
        assert!(err.to_string().contains("unknown subject type 'Invoice'"));
    }
}
