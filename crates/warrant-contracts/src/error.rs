//! Error types for the warrant crates.
//!
//! Only rule-set construction and policy loading are fallible. Decision
//! queries never return an error: anything that cannot be evaluated is a
//! non-match, and no match means deny.

use thiserror::Error;

/// The unified error type for the warrant crates.
#[derive(Debug, Error)]
pub enum WarrantError {
    /// A rule is structurally malformed (no actions, blank field name, ...).
    #[error("invalid rule: {reason}")]
    InvalidRule { reason: String },

    /// A condition document uses an unknown operator or an operand of the
    /// wrong shape.
    #[error("invalid condition: {reason}")]
    InvalidCondition { reason: String },

    /// A policy document could not be read or parsed.
    #[error("configuration error: {reason}")]
    ConfigError { reason: String },

    /// A `${principal...}` placeholder has no value on the principal.
    #[error("unresolved policy variable '{name}'")]
    UnresolvedVariable { name: String },

    /// A policy document names a subject type the application does not define.
    #[error("unknown subject type '{name}'")]
    UnknownSubjectType { name: String },

    /// A subject's attributes could not be produced for condition matching.
    #[error("subject attributes unavailable: {reason}")]
    Attributes { reason: String },
}

/// Convenience alias used throughout the warrant crates.
pub type WarrantResult<T> = Result<T, WarrantError>;
