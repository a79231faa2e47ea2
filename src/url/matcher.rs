use crate::ConfigError;
use regex::Regex;

/// An ordered set of patterns that must match a whole candidate string
///
/// Each pattern is anchored on both ends when compiled, so `"https://a\.com/.*"`
/// matches `"https://a.com/x"` but `"a\.com"` does not. This mirrors the
/// semantics of the `ignored-urls` and `ignored-words` configuration keys.
///
/// # Examples
///
/// ```
/// use ripple_count::url::PatternSet;
///
/// let patterns = PatternSet::new(&["https://example\\.com/private/.*"]).unwrap();
/// assert!(patterns.matches("https://example.com/private/page"));
/// assert!(!patterns.matches("https://example.com/public"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct PatternSet {
    patterns: Vec<Regex>,
}

impl PatternSet {
    /// Compiles the given patterns, preserving their order
    pub fn new<S: AsRef<str>>(patterns: &[S]) -> Result<Self, ConfigError> {
        let patterns = patterns
            .iter()
            .map(|p| {
                let p = p.as_ref();
                Regex::new(&format!("^(?:{})$", p))
                    .map_err(|e| ConfigError::InvalidPattern(format!("'{}': {}", p, e)))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { patterns })
    }

    /// Returns true if any pattern matches the whole candidate
    pub fn matches(&self, candidate: &str) -> bool {
        self.patterns.iter().any(|re| re.is_match(candidate))
    }
}
