use serde::{Deserialize, Serialize};

/// Size limit `regex` applies to a compiled program unless told otherwise.
const DEFAULT_SIZE_LIMIT: usize = 10 * (1 << 20);

/// Cache size `regex` allows its lazy DFA unless told otherwise.
const DEFAULT_DFA_SIZE_LIMIT: usize = 2 * (1 << 20);

/// Settings used when compiling a regex substitution pattern.
///
/// Missing fields take their defaults, so an empty table is a valid configuration:
///
/// ```toml
/// case_insensitive = true
/// size_limit = 1048576
/// ```
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct PatternConfig {
    /// Match letters regardless of case.
    pub case_insensitive: bool,

    /// Upper bound, in bytes, on the compiled program.
    pub size_limit: usize,

    /// Upper bound, in bytes, on the lazy DFA cache.
    pub dfa_size_limit: usize,
}

impl Default for PatternConfig {
    fn default() -> Self {
        PatternConfig {
            case_insensitive: false,
            size_limit: DEFAULT_SIZE_LIMIT,
            dfa_size_limit: DEFAULT_DFA_SIZE_LIMIT,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn empty_table_is_default() {
        let config: PatternConfig = toml::from_str("").unwrap();
        assert_eq!(config, PatternConfig::default());
    }

    #[test]
    fn partial_table() {
        let config: PatternConfig = toml::from_str("case_insensitive = true").unwrap();
        assert!(config.case_insensitive);
        assert_eq!(config.size_limit, DEFAULT_SIZE_LIMIT);
        assert_eq!(config.dfa_size_limit, DEFAULT_DFA_SIZE_LIMIT);
    }

    #[test]
    fn unknown_field_rejected() {
        assert!(toml::from_str::<PatternConfig>("global = true").is_err());
    }

    #[test]
    fn json_form() {
        let config: PatternConfig =
            serde_json::from_str(r#"{"size_limit": 4096, "dfa_size_limit": 1024}"#).unwrap();
        assert_eq!(
            config,
            PatternConfig {
                case_insensitive: false,
                size_limit: 4096,
                dfa_size_limit: 1024,
            }
        );
    }
}
