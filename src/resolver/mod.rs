//! Pluggable redirect resolution for file URLs.
//!
//! Detail responses point at URLs that usually redirect before reaching the
//! actual file. A [`RedirectResolver`] turns such a URL into the final one.
//!
//! # Implementations
//!
//! - `BrowserResolver` - headless Chromium per call (feature `browser`)
//! - [`HttpRedirectResolver`] - follows HTTP `3xx` responses
//! - [`PassthroughResolver`] - returns the URL unchanged
//!
//! # Example
//!
//! ```no_run
//! use harvester_core::resolver::{HttpRedirectResolver, resolve_or_skip};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let resolver = HttpRedirectResolver::new(30, 10)?;
//! if let Some(url) = resolve_or_skip(&resolver, "https://example.com/doc?id=1").await {
//!     println!("Resolved URL: {url}");
//! }
//! # Ok(())
//! # }
//! ```

#[cfg(feature = "browser")]
mod browser;
mod error;
mod http;
mod passthrough;

#[cfg(feature = "browser")]
pub use browser::BrowserResolver;
pub use error::ResolveError;
pub use http::{DEFAULT_MAX_REDIRECTS, HttpRedirectResolver};
pub use passthrough::PassthroughResolver;

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::config::{HarvestConfig, ResolverKind};

/// Trait that all redirect resolvers implement.
///
/// # Object Safety
///
/// This trait uses `async_trait` to support dynamic dispatch via
/// `Box<dyn RedirectResolver>`, which the orchestrator holds.
#[async_trait]
pub trait RedirectResolver: Send + Sync {
    /// Returns the resolver's name (e.g., "browser", "http").
    fn name(&self) -> &str;

    /// Returns the URL reached after all redirects.
    async fn resolve(&self, url: &str) -> Result<String, ResolveError>;
}

/// Resolves `url`, logging any failure.
///
/// Returns `None` when resolution fails or yields an empty location, so the
/// caller simply skips the file.
pub async fn resolve_or_skip(resolver: &(impl RedirectResolver + ?Sized), url: &str) -> Option<String> {
    match resolver.resolve(url).await {
        Ok(resolved) if resolved.trim().is_empty() => {
            warn!(resolver = resolver.name(), url, "resolver returned an empty location");
            None
        }
        Ok(resolved) => {
            debug!(resolver = resolver.name(), url, resolved = %resolved, "resolved");
            Some(resolved)
        }
        Err(error) => {
            warn!(resolver = resolver.name(), url, error = %error, "redirect resolution failed");
            None
        }
    }
}

/// Builds the resolver selected by the configuration.
///
/// # Errors
///
/// Returns [`ResolveError::Unavailable`] when the HTTP client cannot be
/// built, or when the browser resolver is requested but not compiled in.
pub fn build_resolver(config: &HarvestConfig) -> Result<Box<dyn RedirectResolver>, ResolveError> {
    match config.resolver {
        ResolverKind::Browser => build_browser_resolver(config),
        ResolverKind::Http => Ok(Box::new(HttpRedirectResolver::new(
            config.api_timeout_secs,
            DEFAULT_MAX_REDIRECTS,
        )?)),
        ResolverKind::None => Ok(Box::new(PassthroughResolver::new())),
    }
}

#[cfg(feature = "browser")]
fn build_browser_resolver(
    config: &HarvestConfig,
) -> Result<Box<dyn RedirectResolver>, ResolveError> {
    Ok(Box::new(BrowserResolver::new(config.browser.clone())?))
}

#[cfg(not(feature = "browser"))]
fn build_browser_resolver(
    _config: &HarvestConfig,
) -> Result<Box<dyn RedirectResolver>, ResolveError> {
    Err(ResolveError::unavailable(
        "browser",
        "this build does not include browser support",
        "Rebuild with `--features browser` or use `--resolver http`",
    ))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    struct FixedResolver(Result<String, ResolveError>);

    #[async_trait]
    impl RedirectResolver for FixedResolver {
        fn name(&self) -> &str {
            "fixed"
        }

        async fn resolve(&self, _url: &str) -> Result<String, ResolveError> {
            self.0.clone()
        }
    }

    #[tokio::test]
    async fn test_resolve_or_skip_success() {
        let resolver = FixedResolver(Ok("https://cdn.example/x.pdf".to_string()));
        assert_eq!(
            resolve_or_skip(&resolver, "https://example/x").await.as_deref(),
            Some("https://cdn.example/x.pdf")
        );
    }

    #[tokio::test]
    async fn test_resolve_or_skip_failure_is_none() {
        let resolver = FixedResolver(Err(ResolveError::navigation("fixed", "u", "boom")));
        assert!(resolve_or_skip(&resolver, "https://example/x").await.is_none());
    }

    #[tokio::test]
    async fn test_resolve_or_skip_empty_is_none() {
        let resolver = FixedResolver(Ok(String::new()));
        assert!(resolve_or_skip(&resolver, "https://example/x").await.is_none());
    }

    #[tokio::test]
    async fn test_resolve_or_skip_through_trait_object() {
        let resolver: Box<dyn RedirectResolver> = Box::new(PassthroughResolver::new());
        assert_eq!(
            resolve_or_skip(resolver.as_ref(), "https://example/x").await.as_deref(),
            Some("https://example/x")
        );
    }

    #[test]
    fn test_build_resolver_kinds() {
        let mut config = HarvestConfig::default();
        config.resolver = ResolverKind::None;
        assert_eq!(build_resolver(&config).unwrap().name(), "passthrough");

        config.resolver = ResolverKind::Http;
        assert_eq!(build_resolver(&config).unwrap().name(), "http");
    }

    #[test]
    fn test_build_resolver_browser_unavailable_fails_early() {
        let mut config = HarvestConfig {
            resolver: ResolverKind::Browser,
            ..HarvestConfig::default()
        };
        config.browser.chrome_executable =
            Some(std::path::PathBuf::from("/nonexistent/harvester-test/chromium"));
        let err = build_resolver(&config).err().unwrap();
        assert!(matches!(err, ResolveError::Unavailable { .. }));
    }
}
