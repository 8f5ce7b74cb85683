//! Errors raised by path comparison and substitution.

use snafu::Snafu;

/// Errors surfaced by the operations on a [`PathValue`](crate::path::PathValue).
#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum PathError {
    /// The internal slot of a path value does not hold bytes.
    #[snafu(display("unexpected internal path representation: found {found}"))]
    InvalidInternalState { found: &'static str },

    /// Raised by the string-substitution capability and passed through untouched.
    #[snafu(context(false), display("{source}"))]
    Substitution { source: SubstitutionError },
}

impl PathError {
    /// Whether this error comes from a malformed path value rather than from substitution.
    #[must_use]
    pub fn is_invalid_internal_state(&self) -> bool {
        matches!(self, PathError::InvalidInternalState { .. })
    }
}

/// Errors raised by the string-substitution capability in [`crate::sub`].
#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum SubstitutionError {
    #[snafu(display("wrong number of arguments (given {given}, expected {expected})"))]
    WrongArity { given: usize, expected: &'static str },

    #[snafu(display("wrong argument type {got} (expected regex or bytes)"))]
    PatternType { got: &'static str },

    #[snafu(display("no implicit conversion of {got} into bytes"))]
    ReplacementType { got: &'static str },

    #[snafu(display("invalid pattern {pattern:?}: {source}"))]
    InvalidPattern {
        pattern: String,
        source: regex::Error,
    },

    #[snafu(display("replacement {got} has no byte representation"))]
    UnrepresentableResult { got: &'static str },

    #[snafu(display("undefined group name reference: {name}"))]
    UndefinedGroupName { name: String },

    #[snafu(display("invalid group name reference format"))]
    MalformedGroupReference,
}
