//! # warrant-policy
//!
//! Declarative policy documents for the warrant engine.
//!
//! ## Overview
//!
//! This crate provides [`TomlPolicy`], which reads an ordered list of rules
//! from TOML and compiles it into an [`Ability`](warrant_core::Ability) for a
//! given principal. Conditions use the Mongo-style notation understood by
//! [`Condition::from_json`](warrant_condition::Condition::from_json), and may
//! refer to the principal through `${principal.<path>}` placeholders.
//!
//! ## Quick start
//!
//! ```rust,ignore
//! use std::path::Path;
//! use warrant_policy::TomlPolicy;
//!
//! let policy = TomlPolicy::from_file(Path::new("policies/coaching.toml"))?;
//! let ability = policy.build_for::<CoachingSubject>(&principal)?;
//! ```
//!
//! ## Rule order
//!
//! Rules are appended in declaration order and the last matching rule
//! decides. A rule whose `when` guard does not match the principal is left
//! out entirely.

pub mod engine;
pub mod rule;
pub mod vars;

pub use engine::TomlPolicy;
pub use rule::{PolicyDocument, RuleSpec};

// ── Tests ─────────────────────────────────────────────────────────────────────
