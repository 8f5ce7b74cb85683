//! Single-match substitution over raw path bytes.
//!
//! This is the string-substitution capability path values delegate to. A substitution replaces
//! the *first* match of a [`Pattern`] only. The replacement is either literal text or the result
//! of a callback invoked with the matched bytes.
//!
//! A literal replacement may refer back to the match with backslash escapes, for both pattern
//! kinds:
//!
//! | escape | expands to |
//! |---|---|
//! | `\0`, `\&` | the whole match |
//! | `\1` .. `\9` | a numbered capture group, empty if it didn't participate |
//! | `\k<name>` | a named capture group |
//! | `` \` ``, `\'` | the text before, or after, the match |
//! | `\\` | a single backslash |
//!
//! Any other escape is kept as written, and `$` has no special meaning. A literal pattern has no
//! capture groups, so numbered references expand to nothing there. Numbered references also
//! expand to nothing when the regex has named groups. Callback results are never expanded.

use std::fmt;
use std::ops::Range;

use bytes::Bytes;
use regex::bytes::Captures;
use tracing::trace;

use crate::error::{
    MalformedGroupReferenceSnafu, PatternTypeSnafu, ReplacementTypeSnafu, SubstitutionError,
    UndefinedGroupNameSnafu, UnrepresentableResultSnafu, WrongAritySnafu,
};
use crate::value::{Value, ValueRegex};

pub use self::config::PatternConfig;

mod config;

/// A replacement callback. It receives the matched bytes and returns the replacement value.
pub type Callback<'a> = Box<dyn FnMut(&[u8]) -> Value + 'a>;

/// What a substitution looks for.
#[derive(Clone, Debug, PartialEq)]
pub enum Pattern {
    Literal(Bytes),
    Regex(ValueRegex),
}

impl Pattern {
    pub fn literal(pattern: impl Into<Bytes>) -> Self {
        Pattern::Literal(pattern.into())
    }

    /// # Errors
    ///
    /// Returns [`SubstitutionError::InvalidPattern`] when `pattern` does not compile.
    pub fn regex(pattern: &str) -> Result<Self, SubstitutionError> {
        ValueRegex::new(pattern).map(Pattern::Regex)
    }

    /// # Errors
    ///
    /// Returns [`SubstitutionError::InvalidPattern`] when `pattern` does not compile under
    /// `config`.
    pub fn regex_with(pattern: &str, config: &PatternConfig) -> Result<Self, SubstitutionError> {
        ValueRegex::with_config(pattern, config).map(Pattern::Regex)
    }

    /// Finds the byte range of the first match in `haystack`.
    #[must_use]
    pub fn find(&self, haystack: &[u8]) -> Option<Range<usize>> {
        match self {
            Pattern::Literal(needle) if needle.is_empty() => Some(0..0),
            Pattern::Literal(needle) => haystack
                .windows(needle.len())
                .position(|window| window == &needle[..])
                .map(|start| start..start + needle.len()),
            Pattern::Regex(regex) => regex.find(haystack).map(|found| found.range()),
        }
    }

    fn first_match<'p, 'h>(&'p self, haystack: &'h [u8]) -> Option<Found<'p, 'h>> {
        match self {
            Pattern::Literal(_) => self.find(haystack).map(|range| Found {
                range,
                groups: None,
            }),
            Pattern::Regex(regex) => {
                let captures = regex.captures(haystack)?;
                let range = captures.get(0)?.range();
                Some(Found {
                    range,
                    groups: Some((regex, captures)),
                })
            }
        }
    }

    fn from_value(value: &Value) -> Result<Self, SubstitutionError> {
        match value {
            Value::Bytes(bytes) => Ok(Pattern::Literal(bytes.clone())),
            Value::Regex(regex) => Ok(Pattern::Regex(regex.clone())),
            value => PatternTypeSnafu {
                got: value.kind_str(),
            }
            .fail(),
        }
    }
}

impl From<&str> for Pattern {
    fn from(pattern: &str) -> Self {
        Pattern::literal(Bytes::copy_from_slice(pattern.as_bytes()))
    }
}

impl From<Bytes> for Pattern {
    fn from(pattern: Bytes) -> Self {
        Pattern::Literal(pattern)
    }
}

impl From<ValueRegex> for Pattern {
    fn from(regex: ValueRegex) -> Self {
        Pattern::Regex(regex)
    }
}

/// What the first match is replaced with.
pub enum Replacement<'a> {
    Literal(Bytes),
    With(Callback<'a>),
}

impl fmt::Debug for Replacement<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Replacement::Literal(bytes) => f.debug_tuple("Literal").field(bytes).finish(),
            Replacement::With(_) => f.write_str("With(<callback>)"),
        }
    }
}

/// A pattern together with its replacement.
#[derive(Debug)]
pub struct SubstitutionSpec<'a> {
    pub pattern: Pattern,
    pub replacement: Replacement<'a>,
}

impl<'a> SubstitutionSpec<'a> {
    pub fn new(pattern: impl Into<Pattern>, with: impl Into<Bytes>) -> Self {
        Self {
            pattern: pattern.into(),
            replacement: Replacement::Literal(with.into()),
        }
    }

    pub fn with_callback(
        pattern: impl Into<Pattern>,
        callback: impl FnMut(&[u8]) -> Value + 'a,
    ) -> Self {
        Self {
            pattern: pattern.into(),
            replacement: Replacement::With(Box::new(callback)),
        }
    }

    /// Builds a substitution from positional arguments: a pattern and an optional literal
    /// replacement, plus an optional callback.
    ///
    /// Without a callback exactly two arguments are required. With a callback one or two are
    /// accepted; when a literal replacement is present it wins and the callback is never called.
    ///
    /// # Errors
    ///
    /// Returns [`SubstitutionError::WrongArity`] for a bad argument count,
    /// [`SubstitutionError::ReplacementType`] when the replacement isn't bytes and
    /// [`SubstitutionError::PatternType`] when the pattern is neither bytes nor a regex.
    pub fn from_args(
        args: &[Value],
        callback: Option<Callback<'a>>,
    ) -> Result<Self, SubstitutionError> {
        let (pattern, replacement) = match (args, callback) {
            ([pattern, with], callback) => {
                if callback.is_some() {
                    trace!(message = "Literal replacement given, callback ignored.");
                }
                let with = match with {
                    Value::Bytes(bytes) => bytes.clone(),
                    value => {
                        return ReplacementTypeSnafu {
                            got: value.kind_str(),
                        }
                        .fail()
                    }
                };
                (pattern, Replacement::Literal(with))
            }
            ([pattern], Some(callback)) => (pattern, Replacement::With(callback)),
            (args, callback) => {
                return WrongAritySnafu {
                    given: args.len(),
                    expected: if callback.is_some() { "1..2" } else { "2" },
                }
                .fail()
            }
        };

        Ok(Self {
            pattern: Pattern::from_value(pattern)?,
            replacement,
        })
    }

    /// Replaces the first match in `haystack`, returning the substituted bytes. When nothing
    /// matches the bytes are returned unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`SubstitutionError::UnrepresentableResult`] when the callback produces a value
    /// with no byte form, and [`SubstitutionError::UndefinedGroupName`] or
    /// [`SubstitutionError::MalformedGroupReference`] for a bad `\k<name>` in the replacement.
    pub fn apply(self, haystack: &[u8]) -> Result<Bytes, SubstitutionError> {
        let SubstitutionSpec {
            pattern,
            replacement,
        } = self;

        let Some(found) = pattern.first_match(haystack) else {
            return Ok(Bytes::copy_from_slice(haystack));
        };
        let range = found.range.clone();

        let text = match replacement {
            Replacement::Literal(with) => expand(&with, haystack, &found)?,
            Replacement::With(mut callback) => {
                replacement_text(callback(&haystack[range.clone()]))?
            }
        };

        trace!(
            message = "Substituted first match.",
            start = range.start,
            end = range.end,
            replacement_len = text.len()
        );

        let mut replaced = Vec::with_capacity(haystack.len() - range.len() + text.len());
        replaced.extend_from_slice(&haystack[..range.start]);
        replaced.extend_from_slice(&text);
        replaced.extend_from_slice(&haystack[range.end..]);
        Ok(replaced.into())
    }
}

/// The first match of a pattern, with its capture groups when the pattern is a regex.
struct Found<'p, 'h> {
    range: Range<usize>,
    groups: Option<(&'p ValueRegex, Captures<'h>)>,
}

impl Found<'_, '_> {
    fn numbered(&self, index: usize) -> Option<Range<usize>> {
        let (regex, captures) = self.groups.as_ref()?;
        if regex.capture_names().flatten().next().is_some() {
            return None;
        }
        captures.get(index).map(|group| group.range())
    }

    fn named(&self, name: &[u8]) -> Result<Option<Range<usize>>, SubstitutionError> {
        let defined = self.groups.as_ref().and_then(|(regex, captures)| {
            let name = std::str::from_utf8(name).ok()?;
            regex
                .capture_names()
                .flatten()
                .any(|defined| defined == name)
                .then(|| captures.name(name).map(|group| group.range()))
        });

        match defined {
            Some(group) => Ok(group),
            None => UndefinedGroupNameSnafu {
                name: String::from_utf8_lossy(name),
            }
            .fail(),
        }
    }
}

/// Expands the backslash escapes in `with` against `found`.
fn expand(
    with: &[u8],
    haystack: &[u8],
    found: &Found<'_, '_>,
) -> Result<Bytes, SubstitutionError> {
    let mut expanded = Vec::with_capacity(with.len());
    let mut rest = with;

    while let Some(at) = rest.iter().position(|&byte| byte == b'\\') {
        expanded.extend_from_slice(&rest[..at]);
        let Some(&escape) = rest.get(at + 1) else {
            // A trailing backslash stays as written.
            expanded.push(b'\\');
            return Ok(expanded.into());
        };
        rest = &rest[at + 2..];

        let group = match escape {
            b'0' | b'&' => Some(found.range.clone()),
            b'`' => Some(0..found.range.start),
            b'\'' => Some(found.range.end..haystack.len()),
            b'1'..=b'9' => found.numbered(usize::from(escape - b'0')),
            b'k' if rest.first() == Some(&b'<') => {
                let Some(end) = rest.iter().position(|&byte| byte == b'>') else {
                    return MalformedGroupReferenceSnafu.fail();
                };
                let group = found.named(&rest[1..end])?;
                rest = &rest[end + 1..];
                group
            }
            b'\\' => {
                expanded.push(b'\\');
                None
            }
            other => {
                expanded.extend_from_slice(&[b'\\', other]);
                None
            }
        };

        if let Some(group) = group {
            expanded.extend_from_slice(&haystack[group]);
        }
    }

    expanded.extend_from_slice(rest);
    Ok(expanded.into())
}

/// Converts a callback's return value into replacement text.
fn replacement_text(value: Value) -> Result<Bytes, SubstitutionError> {
    match value {
        Value::Bytes(bytes) => Ok(bytes),
        Value::Integer(int) => Ok(int.to_string().into()),
        Value::Symbol(symbol) => Ok(Bytes::copy_from_slice(symbol.as_str().as_bytes())),
        Value::Regex(regex) => Ok(regex.to_string().into()),
        Value::Null => Ok(Bytes::new()),
        Value::Path(path) => match path.raw_slot() {
            Value::Bytes(bytes) => Ok(bytes.clone()),
            slot => UnrepresentableResultSnafu {
                got: slot.kind_str(),
            }
            .fail(),
        },
    }
}

/// Substitutes the first match in `haystack` as described by positional `args` and an optional
/// `callback`. See [`SubstitutionSpec::from_args`].
///
/// # Errors
///
/// Any [`SubstitutionError`] raised while validating the arguments or applying them.
pub fn sub(
    haystack: &[u8],
    args: &[Value],
    callback: Option<Callback<'_>>,
) -> Result<Bytes, SubstitutionError> {
    SubstitutionSpec::from_args(args, callback)?.apply(haystack)
}
