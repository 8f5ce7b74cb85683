//! The dynamic value a host passes around alongside path values.
//!
//! Comparison accepts any `Value` as its right-hand side, and the positional substitution
//! boundary receives its pattern and replacement as `Value`s. Only [`Value::Path`] carries the
//! path capability; every other variant compares as incomparable.

use std::fmt;

use bytes::Bytes;

use crate::path::{PathValue, SharedPath};

pub use self::regex::ValueRegex;
pub use self::symbol::Symbol;

mod regex;
mod symbol;

/// A macro to easily generate Values
#[macro_export]
macro_rules! value {
    (null) => {
        $crate::value::Value::Null
    };

    ($k:expr) => {
        $crate::value::Value::from($k)
    };
}

#[derive(Clone, Debug)]
pub enum Value {
    Bytes(Bytes),
    Integer(i64),
    Symbol(Symbol),
    Regex(ValueRegex),
    Path(SharedPath),
    Null,
}

impl Value {
    /// The name of this value's kind, as used in error messages.
    #[must_use]
    pub fn kind_str(&self) -> &'static str {
        match self {
            Value::Bytes(_) => "bytes",
            Value::Integer(_) => "integer",
            Value::Symbol(_) => "symbol",
            Value::Regex(_) => "regex",
            Value::Path(_) => "path",
            Value::Null => "null",
        }
    }

    /// Returns the path capability of this value, if it has one.
    #[must_use]
    pub fn as_path(&self) -> Option<&dyn PathValue> {
        match self {
            Value::Path(path) => Some(&**path),
            _ => None,
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Bytes(a), Value::Bytes(b)) => a == b,
            (Value::Integer(a), Value::Integer(b)) => a == b,
            (Value::Symbol(a), Value::Symbol(b)) => a == b,
            (Value::Regex(a), Value::Regex(b)) => a == b,
            (Value::Path(a), Value::Path(b)) => {
                a.variant() == b.variant() && a.raw_slot() == b.raw_slot()
            }
            (Value::Null, Value::Null) => true,
            _ => false,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Bytes(bytes) => write!(f, "{:?}", String::from_utf8_lossy(bytes)),
            Value::Integer(int) => write!(f, "{int}"),
            Value::Symbol(symbol) => write!(f, ":{symbol}"),
            Value::Regex(regex) => write!(f, "{regex}"),
            Value::Path(path) => write!(f, "#<{}:{}>", path.variant(), path.raw_slot()),
            Value::Null => f.write_str("null"),
        }
    }
}

impl From<Bytes> for Value {
    fn from(bytes: Bytes) -> Self {
        Value::Bytes(bytes)
    }
}

impl From<&str> for Value {
    fn from(string: &str) -> Self {
        Value::Bytes(Bytes::copy_from_slice(string.as_bytes()))
    }
}

impl From<String> for Value {
    fn from(string: String) -> Self {
        Value::Bytes(string.into())
    }
}

impl From<&[u8]> for Value {
    fn from(bytes: &[u8]) -> Self {
        Value::Bytes(Bytes::copy_from_slice(bytes))
    }
}

impl From<Vec<u8>> for Value {
    fn from(bytes: Vec<u8>) -> Self {
        Value::Bytes(bytes.into())
    }
}

impl From<i64> for Value {
    fn from(int: i64) -> Self {
        Value::Integer(int)
    }
}

impl From<i32> for Value {
    fn from(int: i32) -> Self {
        Value::Integer(int.into())
    }
}

impl From<Symbol> for Value {
    fn from(symbol: Symbol) -> Self {
        Value::Symbol(symbol)
    }
}

impl From<ValueRegex> for Value {
    fn from(regex: ValueRegex) -> Self {
        Value::Regex(regex)
    }
}

impl From<SharedPath> for Value {
    fn from(path: SharedPath) -> Self {
        Value::Path(path)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Value::Null, Into::into)
    }
}
