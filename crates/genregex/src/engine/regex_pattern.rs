//! # Regex Pattern Labeled Wrapper

use serde::Deserialize;

/// Which regex dialect a pattern was written for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PatternKind {
    /// Basic regular expressions, without extensions.
    Basic,

    /// Requires regex extensions (look-around, back-references).
    Fancy,

    /// Unknown; try basic, then fall-up to fancy.
    #[default]
    Adaptive,
}

/// Labeled wrapper for regex patterns.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum RegexPattern {
    /// This is a basic regex pattern, without extensions.
    Basic(String),

    /// This is a regex pattern that requires regex extensions.
    Fancy(String),

    /// The requirements of this pattern are unknown, and may require regex extensions.
    Adaptive(String),
}

impl<S: AsRef<str>> From<S> for RegexPattern {
    fn from(pattern: S) -> Self {
        Self::Adaptive(pattern.as_ref().to_string())
    }
}

impl RegexPattern {
    /// Build a pattern of the given kind.
    pub fn new<S: Into<String>>(
        kind: PatternKind,
        pattern: S,
    ) -> Self {
        let pattern = pattern.into();
        match kind {
            PatternKind::Basic => Self::Basic(pattern),
            PatternKind::Fancy => Self::Fancy(pattern),
            PatternKind::Adaptive => Self::Adaptive(pattern),
        }
    }

    /// Get the underlying regex pattern.
    ///
    /// ## Returns
    /// The regex pattern string slice.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Basic(pattern) => pattern,
            Self::Fancy(pattern) => pattern,
            Self::Adaptive(pattern) => pattern,
        }
    }

    /// Get the dialect label.
    pub fn kind(&self) -> PatternKind {
        match self {
            Self::Basic(_) => PatternKind::Basic,
            Self::Fancy(_) => PatternKind::Fancy,
            Self::Adaptive(_) => PatternKind::Adaptive,
        }
    }

    /// Is the pattern text empty?
    pub fn is_empty(&self) -> bool {
        self.as_str().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_str_is_adaptive() {
        let pattern: RegexPattern = r"^/api/(\d+)$".into();
        assert_eq!(pattern.kind(), PatternKind::Adaptive);
        assert_eq!(pattern.as_str(), r"^/api/(\d+)$");
        assert!(!pattern.is_empty());
        assert!(RegexPattern::from("").is_empty());
    }

    #[test]
    fn test_new() {
        assert_eq!(
            RegexPattern::new(PatternKind::Fancy, "(?<=a)b"),
            RegexPattern::Fancy("(?<=a)b".to_string())
        );
        assert_eq!(
            RegexPattern::new(PatternKind::Basic, "ab").kind(),
            PatternKind::Basic
        );
    }

    #[test]
    fn test_kind_deserialize() {
        let kind: PatternKind = serde_json::from_str("\"fancy\"").unwrap();
        assert_eq!(kind, PatternKind::Fancy);
        assert_eq!(PatternKind::default(), PatternKind::Adaptive);
    }
}
