//! Subject-type plumbing.
//!
//! Rules never cross subject types, so every record the engine sees must map
//! to exactly one type tag. Applications declare their tags as a plain enum
//! implementing [`SubjectKind`] and implement [`Subject`] for each record
//! type with an exhaustive `match`, which makes the mapping total at compile
//! time.

use std::borrow::Cow;
use std::fmt;
use std::hash::Hash;

use serde::Serialize;
use serde_json::Value;

use crate::error::{WarrantError, WarrantResult};

/// A subject-type tag (e.g. `User`, `Behavior`).
pub trait SubjectKind: Copy + Eq + Hash + fmt::Debug + fmt::Display + Send + Sync + 'static {}

impl<T> SubjectKind for T where
    T: Copy + Eq + Hash + fmt::Debug + fmt::Display + Send + Sync + 'static
{
}

/// A record that can be checked for permission.
pub trait Subject {
    /// The tag enum this record belongs to.
    type Kind: SubjectKind;

    /// Detect the record's subject type. Must be pure and total.
    fn subject_type(&self) -> Self::Kind;

    /// The attribute bag conditions are evaluated against.
    ///
    /// Relations may appear either as a bare identifier or as an embedded
    /// object; the condition matcher accepts both.
    fn attributes(&self) -> WarrantResult<Cow<'_, Value>>;
}

impl<S: Subject + ?Sized> Subject for &S {
    type Kind = S::Kind;

    fn subject_type(&self) -> Self::Kind {
        (**self).subject_type()
    }

    fn attributes(&self) -> WarrantResult<Cow<'_, Value>> {
        (**self).attributes()
    }
}

/// Serialize a domain value into its attribute bag.
///
/// Intended for `Subject::attributes` implementations on `Serialize` types.
pub fn serialize_attributes<T: Serialize + ?Sized>(
    value: &T,
) -> WarrantResult<Cow<'static, Value>> {
    serde_json::to_value(value)
        .map(Cow::Owned)
        .map_err(|e| WarrantError::Attributes {
            reason: e.to_string(),
        })
}

/// A loosely typed subject: a tag plus a JSON attribute bag.
///
/// Useful when the caller already holds JSON (e.g. a document fetched from a
/// store) and has no dedicated domain type for it.
#[derive(Debug, Clone, PartialEq)]
pub struct Record<K> {
    kind: K,
    attributes: Value,
}

impl<K: SubjectKind> Record<K> {
    pub fn new(kind: K, attributes: Value) -> Self {
        Self { kind, attributes }
    }

    pub fn kind(&self) -> K {
        self.kind
    }

    pub fn value(&self) -> &Value {
        &self.attributes
    }
}

impl<K: SubjectKind> Subject for Record<K> {
    type Kind = K;

    fn subject_type(&self) -> K {
        self.kind
    }

    fn attributes(&self) -> WarrantResult<Cow<'_, Value>> {
        Ok(Cow::Borrowed(&self.attributes))
    }
}
