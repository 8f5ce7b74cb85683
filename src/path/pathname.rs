use std::any::Any;
use std::convert::Infallible;
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;
use std::sync::Arc;

use bytes::Bytes;
use serde::de::{self, SeqAccess, Visitor};
use serde::{ser, Deserialize, Deserializer, Serialize, Serializer};

use super::{compare, compare_paths, raw_path, Comparison, PathValue, SharedPath};
use crate::error::PathError;
use crate::sub::{self, Callback, Pattern, SubstitutionSpec};
use crate::value::Value;

/// The default path value: a single slot holding the raw path bytes.
///
/// Construct it with [`Pathname::new`]. [`Pathname::from_slot`] and [`Pathname::replace_slot`]
/// give a host full control over the slot, including storing something that isn't bytes; every
/// operation then fails with [`PathError::InvalidInternalState`].
#[derive(Clone, Debug, PartialEq)]
pub struct Pathname {
    path: Value,
}

impl Pathname {
    pub fn new(raw_path: impl Into<Bytes>) -> Self {
        Self {
            path: Value::Bytes(raw_path.into()),
        }
    }

    pub fn from_slot(slot: Value) -> Self {
        Self { path: slot }
    }

    /// Stores `slot` as the internal field, returning the previous one.
    pub fn replace_slot(&mut self, slot: Value) -> Value {
        std::mem::replace(&mut self.path, slot)
    }

    /// # Errors
    ///
    /// Returns [`PathError::InvalidInternalState`] when the slot doesn't hold bytes.
    pub fn raw_path(&self) -> Result<&Bytes, PathError> {
        raw_path(self)
    }

    /// Compares against any value. See [`compare`](super::compare).
    ///
    /// # Errors
    ///
    /// Returns [`PathError::InvalidInternalState`] when `other` is a path and either slot is
    /// malformed.
    pub fn compare(&self, other: &Value) -> Result<Comparison, PathError> {
        compare(self, other)
    }

    /// # Errors
    ///
    /// Returns [`PathError::InvalidInternalState`] when either slot is malformed.
    pub fn compare_path(&self, other: &Pathname) -> Result<Comparison, PathError> {
        compare_paths(self, other)
    }

    /// Replaces the first match of `pattern` with `with`.
    ///
    /// ```
    /// use pathname::path::Pathname;
    ///
    /// let perl = Pathname::new("/usr/bin/perl");
    /// let ruby = perl.sub("perl", "ruby").unwrap();
    /// assert_eq!(ruby.to_string(), "/usr/bin/ruby");
    /// assert_eq!(perl.to_string(), "/usr/bin/perl");
    /// ```
    ///
    /// # Errors
    ///
    /// Returns [`PathError::InvalidInternalState`] when the slot is malformed.
    pub fn sub(
        &self,
        pattern: impl Into<Pattern>,
        with: impl Into<Bytes>,
    ) -> Result<Self, PathError> {
        self.substitute(SubstitutionSpec::new(pattern, with))
    }

    /// Replaces the first match of `pattern` with the value `callback` returns for it.
    ///
    /// # Errors
    ///
    /// Returns [`PathError::InvalidInternalState`] when the slot is malformed, or
    /// [`SubstitutionError::UnrepresentableResult`](crate::error::SubstitutionError::UnrepresentableResult)
    /// when the callback's value has no byte form.
    pub fn sub_with(
        &self,
        pattern: impl Into<Pattern>,
        callback: impl FnMut(&[u8]) -> Value,
    ) -> Result<Self, PathError> {
        self.substitute(SubstitutionSpec::with_callback(pattern, callback))
    }

    /// Substitutes using positional arguments. See [`SubstitutionSpec::from_args`].
    ///
    /// # Errors
    ///
    /// Returns [`PathError::InvalidInternalState`] when the slot is malformed, then any
    /// argument or pattern error.
    pub fn sub_args(
        &self,
        args: &[Value],
        callback: Option<Callback<'_>>,
    ) -> Result<Self, PathError> {
        let raw = self.raw_path()?;
        Ok(Self::new(sub::sub(raw, args, callback)?))
    }

    /// # Errors
    ///
    /// Returns [`PathError::InvalidInternalState`] when the slot is malformed, and passes
    /// substitution errors through.
    pub fn substitute(&self, spec: SubstitutionSpec<'_>) -> Result<Self, PathError> {
        let raw = self.raw_path()?;
        Ok(Self::new(spec.apply(raw)?))
    }
}

impl PathValue for Pathname {
    fn raw_slot(&self) -> &Value {
        &self.path
    }

    fn construct(&self, raw_path: Bytes) -> SharedPath {
        Arc::new(Pathname::new(raw_path))
    }

    fn variant(&self) -> &'static str {
        "Pathname"
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl Display for Pathname {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match &self.path {
            Value::Bytes(bytes) => f.write_str(&String::from_utf8_lossy(bytes)),
            slot => write!(f, "#<Pathname:{}>", slot.kind_str()),
        }
    }
}

impl FromStr for Pathname {
    type Err = Infallible;

    fn from_str(src: &str) -> Result<Self, Self::Err> {
        Ok(Self::new(src.to_owned()))
    }
}

impl From<&str> for Pathname {
    fn from(src: &str) -> Self {
        Self::new(src.to_owned())
    }
}

impl From<Pathname> for Value {
    fn from(path: Pathname) -> Self {
        Value::Path(Arc::new(path))
    }
}

impl Serialize for Pathname {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let raw = self
            .raw_path()
            .map_err(<S::Error as ser::Error>::custom)?;
        match std::str::from_utf8(raw) {
            Ok(path) => serializer.serialize_str(path),
            Err(_) => serializer.serialize_bytes(raw),
        }
    }
}

struct PathnameVisitor;

impl<'de> Visitor<'de> for PathnameVisitor {
    type Value = Pathname;

    fn expecting(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str("a path string or byte sequence")
    }

    fn visit_str<E: de::Error>(self, value: &str) -> Result<Pathname, E> {
        Ok(Pathname::from(value))
    }

    fn visit_string<E: de::Error>(self, value: String) -> Result<Pathname, E> {
        Ok(Pathname::new(value))
    }

    fn visit_bytes<E: de::Error>(self, value: &[u8]) -> Result<Pathname, E> {
        Ok(Pathname::new(value.to_vec()))
    }

    fn visit_byte_buf<E: de::Error>(self, value: Vec<u8>) -> Result<Pathname, E> {
        Ok(Pathname::new(value))
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Pathname, A::Error> {
        let mut raw = Vec::with_capacity(seq.size_hint().unwrap_or(0));
        while let Some(byte) = seq.next_element::<u8>()? {
            raw.push(byte);
        }
        Ok(Pathname::new(raw))
    }
}

impl<'de> Deserialize<'de> for Pathname {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(PathnameVisitor)
    }
}

#[cfg(any(test, feature = "arbitrary"))]
impl quickcheck::Arbitrary for Pathname {
    fn arbitrary(g: &mut quickcheck::Gen) -> Self {
        const ALPHABET: &[u8] = b"/ab.-A\0";

        let len = <usize as quickcheck::Arbitrary>::arbitrary(g) % (g.size() + 1);
        let raw: Vec<u8> = (0..len)
            .map(|_| g.choose(ALPHABET).copied().unwrap_or(b'/'))
            .collect();
        Self::new(raw)
    }

    fn shrink(&self) -> Box<dyn Iterator<Item = Self>> {
        match &self.path {
            Value::Bytes(bytes) => {
                Box::new(quickcheck::Arbitrary::shrink(&bytes.to_vec()).map(Self::new))
            }
            _ => quickcheck::empty_shrinker(),
        }
    }
}

#[cfg(test)]
mod test {
    use std::thread;

    use quickcheck::{quickcheck, TestResult};

    use super::*;
    use crate::error::SubstitutionError;
    use crate::value;
    use crate::value::{Symbol, ValueRegex};

    fn path(raw: &'static str) -> Value {
        Value::from(Pathname::new(raw))
    }

    #[test]
    fn compares_documented_examples() {
        let cases = [
            ("a", path("b"), Comparison::LessThan),
            ("a", path("ab"), Comparison::LessThan),
            ("a", path("a"), Comparison::Equal),
            ("b", path("a"), Comparison::GreaterThan),
            ("ab", path("a"), Comparison::GreaterThan),
            ("a", path("A"), Comparison::GreaterThan),
            ("a", value!(Symbol::from("a")), Comparison::Incomparable),
        ];

        for (lhs, rhs, want) in cases {
            assert_eq!(Pathname::new(lhs).compare(&rhs).unwrap(), want, "{lhs} <=> {rhs}");
        }
    }

    #[test]
    fn sub_literal() {
        let perl = Pathname::new("/usr/bin/perl");
        let ruby = perl.sub("perl", "ruby").unwrap();

        assert_eq!(ruby.raw_path().unwrap(), "/usr/bin/ruby");
        assert_eq!(perl.raw_path().unwrap(), "/usr/bin/perl");
    }

    #[test]
    fn sub_callback() {
        let perl = Pathname::new("/usr/bin/perl");
        let upper = perl
            .sub_with("perl", |matched| value!(matched.to_ascii_uppercase()))
            .unwrap();

        assert_eq!(upper.raw_path().unwrap(), "/usr/bin/PERL");
    }

    #[test]
    fn sub_regex() {
        let pattern = Pattern::regex(r"/(\w+)$").unwrap();
        let out = Pathname::new("/usr/bin/perl")
            .sub(pattern, r"/\1.pl")
            .unwrap();
        assert_eq!(out.to_string(), "/usr/bin/perl.pl");
    }

    #[test]
    fn sub_args_boundary() {
        let regex = Value::Regex(ValueRegex::new("b[a-z]+").unwrap());
        let out = Pathname::new("/usr/bin/perl")
            .sub_args(&[regex, value!("sbin")], None)
            .unwrap();
        assert_eq!(out.to_string(), "/usr/sbin/perl");

        let err = Pathname::new("/usr/bin/perl")
            .sub_args(&[value!("perl")], None)
            .unwrap_err();
        assert!(matches!(
            err,
            PathError::Substitution {
                source: SubstitutionError::WrongArity { .. }
            }
        ));
    }

    #[test]
    fn malformed_slot_fails_everything() {
        let mut path = Pathname::new("/usr/bin/perl");
        let previous = path.replace_slot(value!(42));
        assert_eq!(previous, value!("/usr/bin/perl"));

        let mut called = false;
        assert!(path
            .compare(&Value::from(Pathname::new("a")))
            .unwrap_err()
            .is_invalid_internal_state());
        assert!(path
            .sub("perl", "ruby")
            .unwrap_err()
            .is_invalid_internal_state());
        assert!(path
            .sub_with("perl", |_| {
                called = true;
                value!("x")
            })
            .unwrap_err()
            .is_invalid_internal_state());
        assert!(!called);
        assert_eq!(
            path.raw_path().unwrap_err().to_string(),
            "unexpected internal path representation: found integer"
        );
    }

    #[test]
    fn display() {
        assert_eq!(Pathname::new("/tmp").to_string(), "/tmp");
        assert_eq!(Pathname::new(&b"/tmp/\xFF"[..]).to_string(), "/tmp/\u{FFFD}");
        assert_eq!(
            Pathname::from_slot(value!(null)).to_string(),
            "#<Pathname:null>"
        );
    }

    #[test]
    fn from_str() {
        let path: Pathname = "/etc/hosts".parse().unwrap();
        assert_eq!(path, Pathname::new("/etc/hosts"));
    }

    #[test]
    fn serde_string_form() {
        let path = Pathname::new("/usr/bin/perl");
        let json = serde_json::to_string(&path).unwrap();
        assert_eq!(json, r#""/usr/bin/perl""#);
        assert_eq!(serde_json::from_str::<Pathname>(&json).unwrap(), path);
    }

    #[test]
    fn serde_non_utf8() {
        let path = Pathname::new(&b"/tmp/\xFF"[..]);
        let json = serde_json::to_string(&path).unwrap();
        assert_eq!(serde_json::from_str::<Pathname>(&json).unwrap(), path);
    }

    #[test]
    fn serde_rejects_malformed() {
        assert!(serde_json::to_string(&Pathname::from_slot(value!(1))).is_err());
    }

    #[test]
    fn shareable_across_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Pathname>();
        assert_send_sync::<SharedPath>();

        let base = Pathname::new("a");
        let joined = thread::spawn(move || base.sub_with("a", |_| value!("a/b/c")))
            .join()
            .unwrap()
            .unwrap();
        assert_eq!(
            joined.compare(&path("a/b/c")).unwrap(),
            Comparison::Equal
        );
    }

    quickcheck! {
        fn compare_is_antisymmetric(a: Pathname, b: Pathname) -> bool {
            let ab = a.compare_path(&b).unwrap();
            let ba = b.compare_path(&a).unwrap();
            ab == ba.reverse()
        }

        fn compare_is_reflexive(a: Pathname) -> bool {
            a.compare_path(&a).unwrap() == Comparison::Equal
        }

        fn symbols_are_incomparable(a: Pathname, symbol: Symbol) -> bool {
            a.compare(&Value::Symbol(symbol)).unwrap() == Comparison::Incomparable
        }

        fn sub_never_mutates(a: Pathname) -> TestResult {
            let before = a.clone();
            match a.sub("/", "-") {
                Ok(_) => TestResult::from_bool(a == before),
                Err(_) => TestResult::failed(),
            }
        }
    }
}
