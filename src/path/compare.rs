use std::cmp::Ordering;

use super::{raw_path, PathValue};
use crate::error::PathError;
use crate::value::Value;

/// The path segment separator.
pub const SEPARATOR: u8 = b'/';

/// The outcome of comparing a path value with another value.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Comparison {
    LessThan,
    Equal,
    GreaterThan,
    /// The other value is not a path, so no ordering exists. Distinct from `Equal`.
    Incomparable,
}

impl Comparison {
    #[must_use]
    pub fn as_ordering(self) -> Option<Ordering> {
        match self {
            Comparison::LessThan => Some(Ordering::Less),
            Comparison::Equal => Some(Ordering::Equal),
            Comparison::GreaterThan => Some(Ordering::Greater),
            Comparison::Incomparable => None,
        }
    }

    /// Maps to `-1`, `0` or `1`, or `None` when incomparable.
    #[must_use]
    pub fn as_int(self) -> Option<i64> {
        self.as_ordering().map(|ordering| ordering as i64)
    }

    #[must_use]
    pub fn reverse(self) -> Self {
        match self {
            Comparison::LessThan => Comparison::GreaterThan,
            Comparison::GreaterThan => Comparison::LessThan,
            comparison => comparison,
        }
    }

    #[must_use]
    pub fn is_comparable(self) -> bool {
        self != Comparison::Incomparable
    }
}

impl From<Ordering> for Comparison {
    fn from(ordering: Ordering) -> Self {
        match ordering {
            Ordering::Less => Comparison::LessThan,
            Ordering::Equal => Comparison::Equal,
            Ordering::Greater => Comparison::GreaterThan,
        }
    }
}

impl From<Comparison> for Value {
    fn from(comparison: Comparison) -> Self {
        comparison.as_int().into()
    }
}

#[inline]
fn normalize(byte: u8) -> u8 {
    if byte == SEPARATOR {
        0
    } else {
        byte
    }
}

/// Orders two raw paths byte by byte, with the separator comparing as `0x00`.
///
/// The first differing byte decides. When one path is a prefix of the other, the longer one is
/// greater; the decision uses the actual lengths, so `"a/"` and `"a\0"` compare equal while
/// `"a"` is less than both.
#[must_use]
pub fn compare_raw(lhs: &[u8], rhs: &[u8]) -> Ordering {
    lhs.iter()
        .zip(rhs)
        .map(|(&a, &b)| normalize(a).cmp(&normalize(b)))
        .find(|ordering| ordering.is_ne())
        .unwrap_or_else(|| lhs.len().cmp(&rhs.len()))
}

/// Sorts path values in place using [`compare_raw`]. The sort is stable.
///
/// # Errors
///
/// Returns [`PathError::InvalidInternalState`] for the first malformed element; `paths` is
/// left untouched in that case.
pub fn sort_paths<P: PathValue>(paths: &mut [P]) -> Result<(), PathError> {
    for path in paths.iter() {
        raw_path(path)?;
    }

    paths.sort_by(|a, b| match (raw_path(a), raw_path(b)) {
        (Ok(a), Ok(b)) => compare_raw(a, b),
        _ => Ordering::Equal,
    });
    Ok(())
}
