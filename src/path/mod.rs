//! This module contains the two operations defined on path values: comparison and
//! substitution.
//!
//! A path value is anything implementing [`PathValue`]. It wraps a single internal slot holding
//! the raw path bytes. The slot is untyped on purpose: a host may store any [`Value`] there, so
//! every operation reads it through [`raw_path`], which rejects a slot that doesn't hold bytes
//! with [`PathError::InvalidInternalState`].
//!
//! # Comparison
//! Paths are ordered byte by byte, except that the separator `/` compares as `0x00`. A segment
//! boundary therefore sorts before any other continuation of the same prefix:
//!
//! | lhs   | rhs   | result        |
//! |-------|-------|---------------|
//! | `a`   | `ab`  | `LessThan`    |
//! | `a/b` | `a-b` | `LessThan`    |
//! | `a`   | `A`   | `GreaterThan` |
//! | `a`   | `:a`  | `Incomparable` |
//!
//! Comparing against a [`Value`] without the path capability is not an error; it yields
//! [`Comparison::Incomparable`].
//!
//! # Substitution
//! [`substitute`] replaces the first match of a pattern in the raw path and builds a new path
//! value of the *same* variant through [`PathValue::construct`]. The input is never touched.
//! Matching and replacement are delegated to [`crate::sub`].

use std::any::Any;
use std::fmt::Debug;
use std::sync::Arc;

use bytes::Bytes;
use tracing::debug;

pub use compare::{compare_raw, sort_paths, Comparison, SEPARATOR};
pub use pathname::Pathname;

use crate::error::{InvalidInternalStateSnafu, PathError};
use crate::sub::{self, Callback, SubstitutionSpec};
use crate::value::Value;

mod compare;
mod pathname;

/// A reference-counted path value of any variant.
pub type SharedPath = Arc<dyn PathValue>;

/// The capability shared by every member of the path-value family.
///
/// Implementors only store a slot and know how to build another instance of themselves; the
/// operations in this module do the rest.
pub trait PathValue: Debug + Send + Sync + 'static {
    /// The internal slot holding the raw path. Read it through [`raw_path`].
    fn raw_slot(&self) -> &Value;

    /// Builds a new instance of the same variant holding `raw_path`.
    fn construct(&self, raw_path: Bytes) -> SharedPath;

    /// The variant's name, e.g. `Pathname`.
    fn variant(&self) -> &'static str;

    fn as_any(&self) -> &dyn Any;
}

/// Reads the raw path out of a path value's slot.
///
/// # Errors
///
/// Returns [`PathError::InvalidInternalState`] when the slot doesn't hold bytes.
pub fn raw_path<P: PathValue + ?Sized>(path: &P) -> Result<&Bytes, PathError> {
    match path.raw_slot() {
        Value::Bytes(bytes) => Ok(bytes),
        slot => {
            debug!(
                message = "Path value has unexpected internal representation.",
                variant = path.variant(),
                found = slot.kind_str()
            );
            InvalidInternalStateSnafu {
                found: slot.kind_str(),
            }
            .fail()
        }
    }
}

/// Compares a path value against any value.
///
/// Values without the path capability yield [`Comparison::Incomparable`] before either slot is
/// read.
///
/// # Errors
///
/// Returns [`PathError::InvalidInternalState`] when `other` is a path and either slot is
/// malformed.
pub fn compare<P: PathValue + ?Sized>(this: &P, other: &Value) -> Result<Comparison, PathError> {
    match other.as_path() {
        Some(other) => compare_paths(this, other),
        None => Ok(Comparison::Incomparable),
    }
}

/// Compares two path values.
///
/// # Errors
///
/// Returns [`PathError::InvalidInternalState`] when either slot is malformed.
pub fn compare_paths<P, Q>(this: &P, other: &Q) -> Result<Comparison, PathError>
where
    P: PathValue + ?Sized,
    Q: PathValue + ?Sized,
{
    let lhs = raw_path(this)?;
    let rhs = raw_path(other)?;
    Ok(compare_raw(lhs, rhs).into())
}

/// Substitutes the first match described by `spec`, returning a new path value of the same
/// variant as `this`.
///
/// # Errors
///
/// Returns [`PathError::InvalidInternalState`] when the slot of `this` is malformed, and passes
/// any [`SubstitutionError`](crate::error::SubstitutionError) through.
pub fn substitute<P: PathValue + ?Sized>(
    this: &P,
    spec: SubstitutionSpec<'_>,
) -> Result<SharedPath, PathError> {
    let raw = raw_path(this)?;
    Ok(this.construct(spec.apply(raw)?))
}

/// Like [`substitute`], but takes positional arguments and an optional callback. See
/// [`SubstitutionSpec::from_args`].
///
/// # Errors
///
/// Returns [`PathError::InvalidInternalState`] when the slot of `this` is malformed; this is
/// checked before the arguments are. Any
/// [`SubstitutionError`](crate::error::SubstitutionError) is passed through.
pub fn substitute_args<P: PathValue + ?Sized>(
    this: &P,
    args: &[Value],
    callback: Option<Callback<'_>>,
) -> Result<SharedPath, PathError> {
    let raw = raw_path(this)?;
    Ok(this.construct(sub::sub(raw, args, callback)?))
}
