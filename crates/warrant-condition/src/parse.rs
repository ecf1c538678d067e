//! Parsing conditions from the Mongo-style document notation.
//!
//! Policy documents express conditions the way query documents are usually
//! written:
//!
//! ```json
//! {
//!   "id": { "$ne": "1" },
//!   "roles": { "$in": ["PARENT"] },
//!   "status": "ACTIVE",
//!   "coaches": { "$elemMatch": { "id": { "$eq": "1" } } }
//! }
//! ```
//!
//! Keys are field paths (implicitly ANDed); a bare literal means `$eq`.
//! Supported field operators: `$eq`, `$ne`, `$in`, `$nin`, `$not`, `$size`,
//! `$all`, `$elemMatch`. Supported top-level operators: `$and`, `$nor`,
//! `$not`. Anything else is rejected at load time.
//!
//! `$exists` is accepted as sugar for formats without a null literal (TOML):
//! `{ "$exists": true }` reads as `{ "$nin": [null] }` and
//! `{ "$exists": false }` as `{ "$in": [null] }`.

use serde_json::{Map, Value};

use warrant_contracts::error::{WarrantError, WarrantResult};

use crate::condition::{Condition, Predicate};

impl Condition {
    /// Parse a Mongo-style condition document.
    pub fn from_json(document: &Value) -> WarrantResult<Self> {
        let Value::Object(map) = document else {
            return Err(invalid(format!(
                "condition must be an object, got {document}"
            )));
        };
        parse_document(map)
    }
}

fn parse_document(map: &Map<String, Value>) -> WarrantResult<Condition> {
    let mut parts = Vec::with_capacity(map.len());

    for (key, value) in map {
        match key.as_str() {
            "$and" => {
                for sub in as_array(key, value)? {
                    parts.push(Condition::from_json(sub)?);
                }
            }
            "$nor" => {
                for sub in as_array(key, value)? {
                    parts.push(Condition::negate(Condition::from_json(sub)?));
                }
            }
            "$not" => parts.push(Condition::negate(Condition::from_json(value)?)),
            op if op.starts_with('$') => {
                return Err(invalid(format!("unsupported top-level operator '{op}'")));
            }
            path => parts.extend(parse_field(path, value)?),
        }
    }

    Ok(match parts.len() {
        1 => parts.remove(0),
        _ => Condition::And(parts),
    })
}

/// Parse the value side of one `path: ...` entry into one condition per
/// operator.
fn parse_field(path: &str, value: &Value) -> WarrantResult<Vec<Condition>> {
    match operator_map(value) {
        Some(ops) => ops
            .iter()
            .map(|(op, operand)| {
                parse_operator(op, operand).map(|predicate| Condition::field(path, predicate))
            })
            .collect(),
        None => Ok(vec![Condition::eq(path, value.clone())]),
    }
}

fn parse_operator(op: &str, operand: &Value) -> WarrantResult<Predicate> {
    let predicate = match op {
        "$eq" => Predicate::Eq(operand.clone()),
        "$ne" => Predicate::Ne(operand.clone()),
        "$in" => Predicate::In(as_array(op, operand)?.to_vec()),
        "$nin" => Predicate::Nin(as_array(op, operand)?.to_vec()),
        "$all" => Predicate::All(as_array(op, operand)?.to_vec()),
        "$size" => {
            let len = operand.as_u64().ok_or_else(|| {
                invalid(format!("'$size' expects a non-negative integer, got {operand}"))
            })?;
            Predicate::Size(len as usize)
        }
        "$elemMatch" => Predicate::ElemMatch(Box::new(Condition::from_json(operand)?)),
        "$exists" => match operand.as_bool() {
            Some(true) => Predicate::Nin(vec![Value::Null]),
            Some(false) => Predicate::In(vec![Value::Null]),
            None => return Err(invalid(format!("'$exists' expects a boolean, got {operand}"))),
        },
        "$not" => {
            let ops = operator_map(operand).ok_or_else(|| {
                invalid(format!("'$not' expects an operator object, got {operand}"))
            })?;
            let mut entries = ops.iter();
            match (entries.next(), entries.next()) {
                (Some((inner_op, inner_operand)), None) => {
                    Predicate::not(parse_operator(inner_op, inner_operand)?)
                }
                _ => {
                    return Err(invalid(format!(
                        "'$not' expects exactly one operator, got {}",
                        ops.len()
                    )));
                }
            }
        }
        other => return Err(invalid(format!("unsupported operator '{other}'"))),
    };
    Ok(predicate)
}

/// An object whose keys are all operators, or `None` for a literal.
fn operator_map(value: &Value) -> Option<&Map<String, Value>> {
    match value {
        Value::Object(map) if !map.is_empty() && map.keys().all(|k| k.starts_with('$')) => {
            Some(map)
        }
        _ => None,
    }
}

fn as_array<'v>(op: &str, value: &'v Value) -> WarrantResult<&'v [Value]> {
    value
        .as_array()
        .map(Vec::as_slice)
        .ok_or_else(|| invalid(format!("'{op}' expects an array, got {value}")))
}

fn invalid(reason: String) -> WarrantError {
    WarrantError::InvalidCondition { reason }
}
