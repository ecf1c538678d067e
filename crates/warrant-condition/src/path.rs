//! Dotted-path resolution over attribute bags.
//!
//! A path such as `"user.institution.id"` is walked one segment at a time:
//!
//! - an object is indexed by the segment name;
//! - an array is indexed when the segment is numeric (`"observers.0"`) and
//!   otherwise projected: the rest of the path is resolved against every
//!   element and the results are collected (one level of nested arrays is
//!   flattened);
//! - `null` and missing keys end the walk with no value.
//!
//! ## Bare-identifier relations
//!
//! A relation may be stored either populated (`"institution": {"id": "I1"}`)
//! or as its bare identifier (`"institution": "I1"`). When the walk reaches a
//! scalar and the only segment left is [`ID_KEY`], the scalar is taken as the
//! resolved value, so `"institution.id"` resolves to `"I1"` in both shapes.
//! Any other segment below a scalar does not resolve.

use std::borrow::Cow;

use serde_json::Value;

/// The key a populated relation carries its identifier under.
pub const ID_KEY: &str = "id";

/// Resolve `path` against `record`.
///
/// Returns `None` when any segment is missing or the final value is `null`.
/// Projections over arrays produce an owned array; everything else borrows.
pub fn resolve<'v>(record: &'v Value, path: &str) -> Option<Cow<'v, Value>> {
    let segments: Vec<&str> = path.split('.').collect();
    resolve_segments(record, &segments)
}

fn resolve_segments<'v>(current: &'v Value, segments: &[&str]) -> Option<Cow<'v, Value>> {
    let Some((head, rest)) = segments.split_first() else {
        return match current {
            Value::Null => None,
            v => Some(Cow::Borrowed(v)),
        };
    };

    match current {
        Value::Object(map) => resolve_segments(map.get(*head)?, rest),

        Value::Array(items) => {
            if let Ok(index) = head.parse::<usize>() {
                return resolve_segments(items.get(index)?, rest);
            }

            let mut projected = Vec::new();
            for item in items {
                match resolve_segments(item, segments) {
                    Some(Cow::Owned(Value::Array(inner))) => projected.extend(inner),
                    Some(Cow::Borrowed(Value::Array(inner))) => {
                        projected.extend(inner.iter().cloned())
                    }
                    Some(v) => projected.push(v.into_owned()),
                    None => {}
                }
            }

            if projected.is_empty() {
                None
            } else {
                Some(Cow::Owned(Value::Array(projected)))
            }
        }

        Value::Null => None,

        // A relation stored as its bare identifier.
        scalar => {
            if segments == [ID_KEY] {
                Some(Cow::Borrowed(scalar))
            } else {
                None
            }
        }
    }
}

/// The identity a value compares by: a populated relation compares by its
/// `id`, anything else by itself.
pub fn identity(value: &Value) -> &Value {
    match value {
        Value::Object(map) => map.get(ID_KEY).unwrap_or(value),
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn resolves_top_level_and_nested_keys() {
        let record = json!({ "id": "1", "user": { "id": "7", "institution": { "id": "I1" } } });

        assert_eq!(resolve(&record, "id").unwrap().as_ref(), &json!("1"));
        assert_eq!(resolve(&record, "user.institution.id").unwrap().as_ref(), &json!("I1"));
    }

    #[test]
    fn missing_and_null_do_not_resolve() {
        let record = json!({ "institution": null, "user": {} });

        assert!(resolve(&record, "institution").is_none());
        assert!(resolve(&record, "institution.id").is_none());
        assert!(resolve(&record, "user.id").is_none());
        assert!(resolve(&record, "nope.deeper").is_none());
    }

    #[test]
    fn bare_identifier_satisfies_id_segment() {
        let flat = json!({ "institution": "I1" });
        let populated = json!({ "institution": { "id": "I1", "name": "North" } });

        assert_eq!(resolve(&flat, "institution.id").unwrap().as_ref(), &json!("I1"));
        assert_eq!(resolve(&populated, "institution.id").unwrap().as_ref(), &json!("I1"));
    }

    #[test]
    fn bare_identifier_does_not_satisfy_other_segments() {
        let record = json!({ "user": "7" });
        assert!(resolve(&record, "user.coaches").is_none());
        assert!(resolve(&record, "user.institution.id").is_none());
    }

    #[test]
    fn arrays_index_numerically_and_project_otherwise() {
        let record = json!({
            "observers": [{ "id": "U1" }, "U2", { "name": "no id" }]
        });

        assert_eq!(resolve(&record, "observers.1").unwrap().as_ref(), &json!("U2"));
        assert_eq!(
            resolve(&record, "observers.id").unwrap().as_ref(),
            &json!(["U1", "U2"])
        );
        assert!(resolve(&record, "observers.7").is_none());
    }

    #[test]
    fn projection_flattens_one_level() {
        let record = json!({ "teams": [{ "members": ["a", "b"] }, { "members": ["c"] }] });
        assert_eq!(
            resolve(&record, "teams.members").unwrap().as_ref(),
            &json!(["a", "b", "c"])
        );
    }

    #[test]
    fn identity_unwraps_populated_relations() {
        assert_eq!(identity(&json!({ "id": "U1", "email": "x" })), &json!("U1"));
        assert_eq!(identity(&json!("U1")), &json!("U1"));
        assert_eq!(identity(&json!({ "name": "n" })), &json!({ "name": "n" }));
    }
}
