//! Segment-aware ordering and first-match substitution for path values.
//!
//! A path value wraps raw path bytes in an untyped slot (see [`path::PathValue`]). Two
//! operations are defined on it:
//!
//! - [`path::compare`] orders paths byte by byte with `/` sorting before every other byte, so
//!   `a/b` comes before `a-b`. Comparing against something that isn't a path yields
//!   [`Comparison::Incomparable`] instead of an error.
//! - [`path::substitute`] replaces the first match of a pattern and returns a new path value of
//!   the same variant.

#![deny(clippy::all)]
#![deny(unreachable_pub)]
#![deny(unused_allocation)]
#![deny(unused_extern_crates)]
#![deny(unused_assignments)]
#![deny(unused_comparisons)]
#![allow(clippy::module_name_repetitions)]

pub mod error;
pub mod path;
pub mod sub;
pub mod value;

pub use error::{PathError, SubstitutionError};
pub use path::{Comparison, PathValue, Pathname, SharedPath};
pub use sub::{Pattern, PatternConfig, SubstitutionSpec};
pub use value::Value;
