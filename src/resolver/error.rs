//! Error types for redirect resolution.

use thiserror::Error;

/// Errors that can occur while resolving a URL to its final location.
#[derive(Debug, Clone, Error)]
pub enum ResolveError {
    /// The resolver could not reach or navigate the URL.
    #[error("{resolver} resolver failed for '{url}': {reason}")]
    Navigation {
        /// Resolver name.
        resolver: String,
        /// The URL being resolved.
        url: String,
        /// Why resolution failed.
        reason: String,
    },

    /// Navigation did not settle in time.
    #[error("{resolver} resolver timed out after {secs}s for '{url}'")]
    Timeout {
        /// Resolver name.
        resolver: String,
        /// The URL being resolved.
        url: String,
        /// Timeout that elapsed.
        secs: u64,
    },

    /// The resolver could not be set up (missing browser, bad client config).
    #[error("{resolver} resolver unavailable: {reason}\n  Suggestion: {suggestion}")]
    Unavailable {
        /// Resolver name.
        resolver: String,
        /// Why the resolver is unavailable.
        reason: String,
        /// How to fix the issue.
        suggestion: String,
    },
}

impl ResolveError {
    /// Creates a navigation failure.
    #[must_use]
    pub fn navigation(resolver: &str, url: &str, reason: impl std::fmt::Display) -> Self {
        Self::Navigation {
            resolver: resolver.to_string(),
            url: url.to_string(),
            reason: reason.to_string(),
        }
    }

    /// Creates a timeout failure.
    #[must_use]
    pub fn timeout(resolver: &str, url: &str, secs: u64) -> Self {
        Self::Timeout {
            resolver: resolver.to_string(),
            url: url.to_string(),
            secs,
        }
    }

    /// Creates an unavailable-resolver error.
    #[must_use]
    pub fn unavailable(
        resolver: &str,
        reason: impl std::fmt::Display,
        suggestion: &str,
    ) -> Self {
        Self::Unavailable {
            resolver: resolver.to_string(),
            reason: reason.to_string(),
            suggestion: suggestion.to_string(),
        }
    }
}
