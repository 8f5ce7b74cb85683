use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::Deref;
use std::sync::Arc;

use regex::bytes::{Regex, RegexBuilder};
use snafu::ResultExt;

use crate::error::{InvalidPatternSnafu, SubstitutionError};
use crate::sub::PatternConfig;

/// A compiled byte regex. Cloning is cheap and equality is by source text and flags.
///
/// `Display` renders the regex with its flags embedded, e.g. `(?-mix:b.n)`. Unescaped `/` in
/// the source is written as `\/`.
#[derive(Clone, Debug)]
pub struct ValueRegex {
    regex: Arc<Regex>,
    case_insensitive: bool,
}

impl ValueRegex {
    /// Compiles `pattern` with the default [`PatternConfig`].
    ///
    /// # Errors
    ///
    /// Returns [`SubstitutionError::InvalidPattern`] when `pattern` does not compile.
    pub fn new(pattern: &str) -> Result<Self, SubstitutionError> {
        Self::with_config(pattern, &PatternConfig::default())
    }

    /// Compiles `pattern` using the settings in `config`.
    ///
    /// # Errors
    ///
    /// Returns [`SubstitutionError::InvalidPattern`] when `pattern` does not compile or exceeds
    /// the configured size limits.
    pub fn with_config(pattern: &str, config: &PatternConfig) -> Result<Self, SubstitutionError> {
        let regex = RegexBuilder::new(pattern)
            .case_insensitive(config.case_insensitive)
            .size_limit(config.size_limit)
            .dfa_size_limit(config.dfa_size_limit)
            .build()
            .context(InvalidPatternSnafu { pattern })?;

        Ok(Self {
            regex: Arc::new(regex),
            case_insensitive: config.case_insensitive,
        })
    }

    #[must_use]
    pub fn is_case_insensitive(&self) -> bool {
        self.case_insensitive
    }
}

impl Deref for ValueRegex {
    type Target = Regex;

    fn deref(&self) -> &Regex {
        &self.regex
    }
}

impl fmt::Display for ValueRegex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let flags = if self.case_insensitive { "i-mx" } else { "-mix" };
        write!(f, "(?{flags}:")?;

        let mut chars = self.regex.as_str().chars();
        while let Some(c) = chars.next() {
            match c {
                '\\' => {
                    f.write_str("\\")?;
                    if let Some(escaped) = chars.next() {
                        write!(f, "{escaped}")?;
                    }
                }
                '/' => f.write_str("\\/")?,
                c => write!(f, "{c}")?,
            }
        }

        f.write_str(")")
    }
}

impl PartialEq for ValueRegex {
    fn eq(&self, other: &Self) -> bool {
        self.case_insensitive == other.case_insensitive
            && self.regex.as_str() == other.regex.as_str()
    }
}

impl Eq for ValueRegex {}

impl Hash for ValueRegex {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.regex.as_str().hash(state);
        self.case_insensitive.hash(state);
    }
}
