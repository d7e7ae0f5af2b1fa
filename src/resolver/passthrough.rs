//! Resolver that performs no network traffic.

use async_trait::async_trait;

use super::{RedirectResolver, ResolveError};

/// Returns every URL unchanged.
///
/// Useful when the source already serves files directly, and in tests.
#[derive(Debug, Clone, Copy, Default)]
pub struct PassthroughResolver;

impl PassthroughResolver {
    /// Creates a passthrough resolver.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl RedirectResolver for PassthroughResolver {
    fn name(&self) -> &str {
        "passthrough"
    }

    async fn resolve(&self, url: &str) -> Result<String, ResolveError> {
        Ok(url.to_string())
    }
}
