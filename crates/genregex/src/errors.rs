//! # Error Types

use crate::engine::InfoQuery;

/// Errors from genregex operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegexError {
    /// The pattern text was empty.
    #[error("empty regex pattern")]
    EmptyPattern,

    /// The engine rejected the pattern syntax.
    #[error("regex compile failed: {message} in \"{pattern}\"{}", at_suffix(.at))]
    Compile {
        /// The engine's error text.
        message: String,

        /// The pattern source.
        pattern: String,

        /// The unparsed suffix, when the failure was not at the end of the pattern.
        at: Option<String>,
    },

    /// The pattern compiled, but a metadata query on it failed.
    #[error("pattern info query {query} failed for \"{pattern}\": {code}")]
    PatternInfo {
        /// The failing query.
        query: InfoQuery,

        /// The pattern source.
        pattern: String,

        /// The engine's failure code.
        code: i32,
    },

    /// Memory exhaustion while building or registering a compiled pattern.
    #[error("regex \"{pattern}\" compilation failed: no memory")]
    NoMemory {
        /// The pattern source.
        pattern: String,
    },

    /// The engine failed while matching (not a no-match).
    #[error("regex match failed: {code} on \"{input}\" using \"{pattern}\"")]
    Execution {
        /// The engine's failure code.
        code: i32,

        /// The engine's failure text.
        message: String,

        /// The input being matched.
        input: String,

        /// The pattern source.
        pattern: String,
    },

    /// A flag directive got a value other than `on` or `off`.
    #[error("invalid value \"{value}\" in \"{directive}\" directive, it must be \"on\" or \"off\"")]
    InvalidFlag {
        /// The directive name.
        directive: String,

        /// The rejected value.
        value: String,
    },

    /// A directive was set twice.
    #[error("\"{directive}\" directive is duplicate")]
    DuplicateDirective {
        /// The directive name.
        directive: String,
    },

    /// A directive this module does not know.
    #[error("unknown directive \"{directive}\"")]
    UnknownDirective {
        /// The directive name.
        directive: String,
    },
}

fn at_suffix(at: &Option<String>) -> String {
    match at {
        Some(suffix) => format!(" at \"{suffix}\""),
        None => String::new(),
    }
}

impl RegexError {
    /// Does this error abort a configuration load?
    ///
    /// Execution errors only fail the single match attempt.
    pub fn is_fatal_to_load(&self) -> bool {
        !matches!(self, Self::Execution { .. })
    }
}

/// Result type for genregex operations.
pub type RxResult<T> = core::result::Result<T, RegexError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compile_messages() {
        let err = RegexError::Compile {
            message: "unclosed group".to_string(),
            pattern: "(abc".to_string(),
            at: None,
        };
        assert_eq!(
            err.to_string(),
            "regex compile failed: unclosed group in \"(abc\""
        );

        let err = RegexError::Compile {
            message: "unopened group".to_string(),
            pattern: "ab)c".to_string(),
            at: Some(")c".to_string()),
        };
        assert_eq!(
            err.to_string(),
            "regex compile failed: unopened group in \"ab)c\" at \")c\""
        );
    }

    #[test]
    fn test_info_message() {
        let err = RegexError::PatternInfo {
            query: InfoQuery::NameCount,
            pattern: "(?<x>a)".to_string(),
            code: -3,
        };
        assert_eq!(
            err.to_string(),
            "pattern info query NAMECOUNT failed for \"(?<x>a)\": -3"
        );
        assert!(err.is_fatal_to_load());
    }

    #[test]
    fn test_fatality() {
        let err = RegexError::Execution {
            code: -47,
            message: "backtrack limit exceeded".to_string(),
            input: "aaaa".to_string(),
            pattern: "(a+)+$".to_string(),
        };
        assert!(!err.is_fatal_to_load());
        assert_eq!(
            err.to_string(),
            "regex match failed: -47 on \"aaaa\" using \"(a+)+$\""
        );
        let err = RegexError::NoMemory {
            pattern: "x".to_string(),
        };
        assert!(err.is_fatal_to_load());
        assert_eq!(err.to_string(), "regex \"x\" compilation failed: no memory");
    }
}
