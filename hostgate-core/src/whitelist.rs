//! Whitelist pattern compilation and matching.
//!
//! Allowed host patterns are compiled once at startup into anchored,
//! case-insensitive regular expressions and shared read-only for the
//! process lifetime. A `*` wildcard matches exactly one DNS label (one or
//! more characters, no dot), so `*.github.com` allows `api.github.com` but
//! not `a.b.github.com` or `github.com` itself.
//!
//! Patterns with more than [`MAX_PATTERN_WILDCARDS`] wildcards are rejected
//! at compile time; that is a startup configuration error, not a
//! per-request condition.
//!
//! [`MAX_PATTERN_WILDCARDS`]: crate::defaults::MAX_PATTERN_WILDCARDS

use regex::{Regex, RegexBuilder};

use crate::defaults::MAX_PATTERN_WILDCARDS;
use crate::error::{HostGateError, Result};

/// A single compiled whitelist pattern.
#[derive(Debug, Clone)]
pub struct HostPattern {
    source: String,
    regex: Regex,
}

impl HostPattern {
    /// Compiles `pattern` into a matcher.
    ///
    /// Literal portions are regex-escaped; each `*` becomes `[^.]+` so it
    /// matches one non-empty label. The resulting expression is anchored to
    /// the whole hostname and matches case-insensitively.
    ///
    /// # Errors
    ///
    /// [`HostGateError::TooManyWildcards`] when the pattern holds more than
    /// [`MAX_PATTERN_WILDCARDS`] wildcards, [`HostGateError::InvalidPattern`]
    /// if the expression fails to build.
    ///
    /// # Example
    ///
    /// ```
    /// use hostgate_core::HostPattern;
    ///
    /// let pattern = HostPattern::compile("*.github.com")?;
    /// assert!(pattern.matches("api.github.com"));
    /// assert!(!pattern.matches("api.github.com.evil.example"));
    /// # Ok::<(), hostgate_core::HostGateError>(())
    /// ```
    pub fn compile(pattern: &str) -> Result<Self> {
        let count = pattern.matches('*').count();
        if count > MAX_PATTERN_WILDCARDS {
            return Err(HostGateError::TooManyWildcards {
                pattern: pattern.to_string(),
                count,
                max: MAX_PATTERN_WILDCARDS,
            });
        }

        let mut expr = String::with_capacity(pattern.len() + 8);
        expr.push('^');
        for (i, literal) in pattern.split('*').enumerate() {
            if i > 0 {
                expr.push_str("[^.]+");
            }
            expr.push_str(&regex::escape(literal));
        }
        expr.push('$');

        let regex = RegexBuilder::new(&expr)
            .case_insensitive(true)
            .build()
            .map_err(|source| HostGateError::InvalidPattern {
                pattern: pattern.to_string(),
                source,
            })?;

        Ok(Self {
            source: pattern.to_string(),
            regex,
        })
    }

    /// The pattern as written in the configuration.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Returns true if `hostname` matches this pattern in full.
    pub fn matches(&self, hostname: &str) -> bool {
        self.regex.is_match(hostname)
    }
}

/// The compiled set of allowed host patterns.
///
/// A hostname is allowed iff any pattern matches. Built once at startup,
/// then shared read-only across requests (typically behind an `Arc`).
#[derive(Debug, Clone)]
pub struct Whitelist {
    patterns: Vec<HostPattern>,
}

impl Whitelist {
    /// Compiles every pattern, failing on the first invalid one.
    ///
    /// # Errors
    ///
    /// [`HostGateError::EmptyWhitelist`] when `patterns` is empty, or the
    /// first compilation error. Either way the caller must treat the error
    /// as fatal: starting with a partial whitelist is worse than not
    /// starting.
    pub fn compile<S: AsRef<str>>(patterns: &[S]) -> Result<Self> {
        if patterns.is_empty() {
            return Err(HostGateError::EmptyWhitelist);
        }

        let patterns = patterns
            .iter()
            .map(|pattern| HostPattern::compile(pattern.as_ref()))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { patterns })
    }

    /// Returns true if any compiled pattern matches `hostname`.
    pub fn is_allowed(&self, hostname: &str) -> bool {
        self.patterns.iter().any(|pattern| pattern.matches(hostname))
    }

    /// Number of compiled patterns.
    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    /// True when no patterns are present. Unreachable through
    /// [`Whitelist::compile`], which rejects an empty set.
    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// The configured pattern sources, for logs and the startup banner.
    pub fn sources(&self) -> impl Iterator<Item = &str> {
        self.patterns.iter().map(|pattern| pattern.source())
    }
}
