//! # warrant-ref-coaching
//!
//! Reference domain for the warrant engine: a coaching organisation where
//! parents record behaviors of their children, coaches follow the parents
//! assigned to them, treatment centres staff their institution and admins
//! manage accounts.
//!
//! The crate provides:
//! - the domain records ([`models`]) and their subject types ([`subject`])
//! - field-name vocabularies ([`fields`])
//! - the role policy, in code ([`policy::define_ability_for`]) and as a
//!   TOML document ([`policy::COACHING_POLICY`])
//! - documented access scenarios ([`scenarios`]) over fixture data
//!   ([`mock_data`])
//!
//! All data is hardcoded and fictional.

pub mod fields;
pub mod mock_data;
pub mod models;
pub mod policy;
pub mod scenarios;
pub mod subject;

pub use fields::{BehaviorField, InstitutionField, UserField};
pub use models::{
    Behavior, ChangeGoals, Institution, Municipality, Relation, User, UserRole, UserStatus,
};
pub use policy::{define_ability_for, define_ability_from_document};
pub use subject::CoachingSubject;
