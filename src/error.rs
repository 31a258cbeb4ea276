//! Error types surfaced when building an [`ExtractorConfig`](crate::config::ExtractorConfig).

use std::fmt;

/// Failures that can occur while constructing an extractor configuration.
///
/// Extraction itself never returns a `Result` — malformed documents and
/// unresolvable URLs are dropped silently and logged, not surfaced as
/// errors. Only configuration construction is fallible, since a bad regex
/// or selector is a programmer error the caller should see immediately
/// rather than discover mid-crawl.
#[derive(Debug)]
pub enum ConfigurationError {
    /// An `allow`/`deny`/`restrict_text` pattern failed to compile.
    InvalidRegex {
        /// The pattern string that failed to compile.
        pattern: String,
        /// The underlying regex compiler error.
        source: regex::Error,
    },
    /// A `restrict_xpaths` expression was not a supported XPath subset.
    InvalidXPath {
        /// The offending expression.
        expression: String,
        /// Human-readable reason the expression was rejected.
        reason: String,
    },
    /// A `restrict_css` selector failed to parse.
    InvalidCssSelector {
        /// The offending selector.
        selector: String,
        /// Human-readable reason the selector was rejected.
        reason: String,
    },
}

impl fmt::Display for ConfigurationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidRegex { pattern, source } => {
                write!(f, "invalid regex pattern {:?}: {}", pattern, source)
            }
            Self::InvalidXPath { expression, reason } => {
                write!(f, "invalid xpath expression {:?}: {}", expression, reason)
            }
            Self::InvalidCssSelector { selector, reason } => {
                write!(f, "invalid css selector {:?}: {}", selector, reason)
            }
        }
    }
}

impl std::error::Error for ConfigurationError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::InvalidRegex { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Result type for extractor configuration construction.
pub type ConfigResult<T> = Result<T, ConfigurationError>;
