//! Compiling policy documents into rule sets.
//!
//! `TomlPolicy` loads a `PolicyDocument` from a TOML string or file and
//! builds a principal-scoped `Ability` from it.
//!
//! Compilation, per rule in declaration order:
//!
//! 1. Parse `subject` into the caller's subject enum.
//! 2. Substitute `${principal...}` placeholders in `when` and `conditions`.
//! 3. If `when` is present and does not match the principal, skip the rule.
//! 4. Parse `conditions` and append the rule to the builder.
//!
//! Errors are reported at compile time; the resulting `Ability` never fails.

use std::path::Path;
use std::str::FromStr;

use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use warrant_condition::Condition;
use warrant_contracts::{Effect, SubjectKind, WarrantError, WarrantResult};
use warrant_core::{Ability, AbilityBuilder};

use crate::rule::{PolicyDocument, RuleSpec};
use crate::vars::substitute;

/// A parsed policy document, ready to be compiled for any principal.
///
/// ```rust,ignore
/// use warrant_policy::TomlPolicy;
///
/// let policy = TomlPolicy::from_file(Path::new("policies/coaching.toml"))?;
/// let ability = policy.build_for::<CoachingSubject>(&principal)?;
/// ```
#[derive(Debug, Clone)]
pub struct TomlPolicy {
    document: PolicyDocument,
}

impl TomlPolicy {
    /// Parse `s` as TOML and build a `TomlPolicy`.
    ///
    /// Returns `WarrantError::ConfigError` if the TOML is malformed or does
    /// not match the expected `PolicyDocument` schema.
    pub fn from_toml_str(s: &str) -> WarrantResult<Self> {
        let document: PolicyDocument = toml::from_str(s).map_err(|e| WarrantError::ConfigError {
            reason: format!("failed to parse policy TOML: {}", e),
        })?;
        debug!(rule_count = document.rules.len(), "policy document loaded");
        Ok(Self { document })
    }

    /// Read the file at `path` and parse it as a TOML policy document.
    ///
    /// Returns `WarrantError::ConfigError` if the file cannot be read or its
    /// contents are not a valid policy document.
    pub fn from_file(path: &Path) -> WarrantResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| WarrantError::ConfigError {
            reason: format!("failed to read policy file '{}': {}", path.display(), e),
        })?;
        Self::from_toml_str(&contents)
    }

    pub fn document(&self) -> &PolicyDocument {
        &self.document
    }

    /// Compile the document into a rule set for `principal`.
    ///
    /// Fails with `UnknownSubjectType` when a rule names a subject `K` does
    /// not know, `UnresolvedVariable` when a placeholder has no value on the
    /// principal, `InvalidCondition` for a malformed condition, and
    /// `InvalidRule` when the resulting rules fail the builder's checks.
    pub fn build_for<K, P>(&self, principal: &P) -> WarrantResult<Ability<K>>
    where
        K: SubjectKind + FromStr,
        P: Serialize + ?Sized,
    {
        let principal = serde_json::to_value(principal).map_err(|e| WarrantError::Attributes {
            reason: format!("failed to serialize principal: {}", e),
        })?;

        let mut builder = AbilityBuilder::new();
        let mut skipped = 0usize;

        for (index, spec) in self.document.rules.iter().enumerate() {
            let kind: K = spec.subject.parse().map_err(|_| WarrantError::UnknownSubjectType {
                name: spec.subject.clone(),
            })?;

            if let Some(guard) = &spec.when {
                let guard = compile(guard, &principal, spec)?;
                if !guard.matches(&principal) {
                    debug!(
                        rule_index = index,
                        subject = %spec.subject,
                        "rule guard does not match principal; skipped"
                    );
                    skipped += 1;
                    continue;
                }
            }

            let condition = spec
                .conditions
                .as_ref()
                .map(|c| compile(c, &principal, spec))
                .transpose()?;

            let actions = spec.actions.iter().copied();
            let mut rule = match spec.effect {
                Effect::Allow => builder.allow(kind, actions),
                Effect::Deny => builder.deny(kind, actions),
            };
            rule = rule.fields(spec.fields.iter().cloned());
            if let Some(condition) = condition {
                rule = rule.when(condition);
            }
            if let Some(reason) = &spec.reason {
                rule.because(reason.clone());
            }
        }

        debug!(rule_count = builder.len(), skipped, "policy document compiled");

        builder.build()
    }
}

fn compile(template: &Value, principal: &Value, spec: &RuleSpec) -> WarrantResult<Condition> {
    let document = substitute(template, principal, spec.optional_vars)?;
    Condition::from_json(&document)
}
