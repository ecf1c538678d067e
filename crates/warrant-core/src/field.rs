//! Field matchers.
//!
//! A rule may be scoped to a subset of its subject's fields. The field
//! matcher answers whether that scope covers the field a query names. An
//! empty scope is a wildcard and covers every field.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use globset::{GlobBuilder, GlobMatcher};
use tracing::warn;

use crate::traits::FieldMatcher;

/// Exact membership: a field is covered when it is listed verbatim.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExactFieldMatcher;

impl FieldMatcher for ExactFieldMatcher {
    fn matches(&self, pattern: &str, field: &str) -> bool {
        pattern == field
    }
}

/// Glob patterns over dotted field names, compiled with `globset`.
///
/// Dots are path separators: `*` matches any run of characters within one
/// segment, `**` matches across segments. `address.*` covers `address.city`
/// but not `address.geo.lat`; `address.**` covers both. The rest of the
/// globset syntax (`?`, classes, alternation) is available too.
///
/// Each pattern is compiled once, on first use, and cached for later
/// queries. A pattern that fails to compile is logged and then matched
/// literally.
#[derive(Debug, Default)]
pub struct GlobFieldMatcher {
    compiled: RwLock<HashMap<String, Option<GlobMatcher>>>,
}

impl GlobFieldMatcher {
    pub fn new() -> Self {
        Self::default()
    }

    fn matcher(&self, pattern: &str) -> Option<GlobMatcher> {
        let cached = self
            .compiled
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(pattern)
            .cloned();
        if let Some(matcher) = cached {
            return matcher;
        }

        let mut compiled = self.compiled.write().unwrap_or_else(PoisonError::into_inner);
        compiled
            .entry(pattern.to_owned())
            .or_insert_with(|| compile(pattern))
            .clone()
    }
}

impl FieldMatcher for GlobFieldMatcher {
    fn matches(&self, pattern: &str, field: &str) -> bool {
        if !pattern.contains(GLOB_META) {
            return pattern == field;
        }
        match self.matcher(pattern) {
            Some(glob) => glob.is_match(as_path(field)),
            None => pattern == field,
        }
    }
}

const GLOB_META: [char; 4] = ['*', '?', '[', '{'];

fn as_path(name: &str) -> String {
    name.replace('.', "/")
}

fn compile(pattern: &str) -> Option<GlobMatcher> {
    match GlobBuilder::new(&as_path(pattern)).literal_separator(true).build() {
        Ok(glob) => Some(glob.compile_matcher()),
        Err(e) => {
            warn!(pattern, error = %e, "invalid field glob; matching it literally");
            None
        }
    }
}

/// Whether a rule scoped to `fields` applies to `requested`, by exact
/// membership.
pub fn field_applies(fields: &[String], requested: &str) -> bool {
    ExactFieldMatcher.applies(fields, requested)
}
