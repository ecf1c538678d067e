//! # warrant-condition
//!
//! The structural condition language of the warrant engine.
//!
//! A [`Condition`] is a small expression tree (field predicates, conjunction,
//! negation, element matching) evaluated against a record's JSON attribute
//! bag. Evaluation never fails: paths that do not resolve are absent values.
//!
//! ## Quick start
//!
//! ```rust,ignore
//! use serde_json::json;
//! use warrant_condition::Condition;
//!
//! let coached_by_me = Condition::all_of("user.coaches", ["C1"])
//!     .and(Condition::eq("user.institution.id", "I1"));
//!
//! assert!(coached_by_me.matches(&json!({
//!     "user": { "coaches": ["C1"], "institution": "I1" }
//! })));
//! ```
//!
//! Relations may be stored as a bare identifier or a populated object; see
//! [`path`] for how dotted paths treat both.

pub mod condition;
pub mod matcher;
pub mod parse;
pub mod path;

pub use condition::{Condition, Predicate};
pub use path::{identity, resolve, ID_KEY};
