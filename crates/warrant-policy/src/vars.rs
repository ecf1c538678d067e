//! `${...}` placeholder substitution.
//!
//! Policy documents refer to the principal through placeholders:
//!
//! - `${principal}`: the whole principal
//! - `${principal.<path>}`: a value resolved with the condition path rules,
//!   so `${principal.institution.id}` works whether the institution is a
//!   bare id or an embedded object
//!
//! A string that is exactly one placeholder is replaced by the resolved JSON
//! value (keeping arrays and numbers intact). Placeholders embedded in longer
//! strings are rendered as text.

use serde_json::Value;

use warrant_condition::{identity, resolve};
use warrant_contracts::{WarrantError, WarrantResult};

const ROOT: &str = "principal";

/// Replace every placeholder in `template` with values from `principal`.
///
/// With `optional` set, unresolvable placeholders become `null` (or the
/// empty string inside longer text) instead of failing.
pub fn substitute(template: &Value, principal: &Value, optional: bool) -> WarrantResult<Value> {
    match template {
        Value::String(s) => substitute_str(s, principal, optional),
        Value::Array(items) => items
            .iter()
            .map(|item| substitute(item, principal, optional))
            .collect::<WarrantResult<Vec<_>>>()
            .map(Value::Array),
        Value::Object(map) => map
            .iter()
            .map(|(k, v)| Ok((k.clone(), substitute(v, principal, optional)?)))
            .collect::<WarrantResult<serde_json::Map<_, _>>>()
            .map(Value::Object),
        other => Ok(other.clone()),
    }
}

fn substitute_str(s: &str, principal: &Value, optional: bool) -> WarrantResult<Value> {
    if let Some(name) = whole_placeholder(s) {
        return match lookup(name, principal)? {
            Some(value) => Ok(value),
            None if optional => Ok(Value::Null),
            None => Err(unresolved(name)),
        };
    }

    if !s.contains("${") {
        return Ok(Value::String(s.to_string()));
    }

    let mut out = String::with_capacity(s.len());
    let mut rest = s;
    while let Some(start) = rest.find("${") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        let Some(end) = after.find('}') else {
            return Err(WarrantError::InvalidCondition {
                reason: format!("unterminated placeholder in '{s}'"),
            });
        };
        let name = &after[..end];
        match lookup(name, principal)? {
            Some(value) => out.push_str(&render(&value)),
            None if optional => {}
            None => return Err(unresolved(name)),
        }
        rest = &after[end + 1..];
    }
    out.push_str(rest);
    Ok(Value::String(out))
}

/// `Some(name)` if `s` is exactly `${name}`.
fn whole_placeholder(s: &str) -> Option<&str> {
    let name = s.strip_prefix("${")?.strip_suffix('}')?;
    (!name.contains('}')).then_some(name)
}

fn lookup(name: &str, principal: &Value) -> WarrantResult<Option<Value>> {
    let name = name.trim();
    if name == ROOT {
        return Ok(Some(principal.clone()));
    }
    match name.strip_prefix(ROOT).and_then(|p| p.strip_prefix('.')) {
        Some(path) if !path.is_empty() => Ok(resolve(principal, path).map(|v| v.into_owned())),
        _ => Err(unresolved(name)),
    }
}

fn render(value: &Value) -> String {
    match identity(value) {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn unresolved(name: &str) -> WarrantError {
    WarrantError::UnresolvedVariable {
        name: name.to_string(),
    }
}
