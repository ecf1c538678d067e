//! # warrant-core
//!
//! Rule sets and the decision algorithm.
//!
//! This crate provides:
//! - `AbilityBuilder`, which accumulates allow/deny rules in declaration order
//! - `Ability`, the immutable rule set answering `can` / `cannot` queries
//! - The matcher seams (`FieldMatcher`, `ConditionsMatcher`) and their
//!   default implementations
//!
//! ## Usage
//!
//! ```rust,ignore
//! use warrant_core::AbilityBuilder;
//! use warrant_contracts::Action;
//!
//! let mut builder = AbilityBuilder::new();
//! builder.allow(Kind::User, [Action::Read]).fields(["id", "email"]);
//! let ability = builder.build()?;
//!
//! assert!(ability.can_field(Action::Read, &user, "email"));
//! ```

pub mod ability;
pub mod builder;
pub mod field;
pub mod rule;
pub mod traits;

pub use ability::{Ability, Explanation};
pub use builder::{AbilityBuilder, RuleBuilder};
pub use field::{field_applies, ExactFieldMatcher, GlobFieldMatcher};
pub use rule::Rule;
pub use traits::{ConditionsMatcher, FieldMatcher, StructuralMatcher};
