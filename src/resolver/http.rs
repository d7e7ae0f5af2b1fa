//! Redirect resolution by following HTTP `3xx` responses.
//!
//! Much cheaper than driving a browser; sufficient whenever the source
//! redirects with `Location` headers rather than script.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use reqwest::redirect::Policy;
use tracing::debug;

use super::{RedirectResolver, ResolveError};
use crate::user_agent;

/// Default redirect hop limit.
pub const DEFAULT_MAX_REDIRECTS: usize = 10;

const NAME: &str = "http";

/// Follows HTTP redirects and reports the final response URL.
///
/// Sends `HEAD` first; when that is rejected (e.g. `405`) or fails, retries
/// with `GET` and drops the response without reading the body.
#[derive(Debug, Clone)]
pub struct HttpRedirectResolver {
    client: Client,
    timeout_secs: u64,
}

impl HttpRedirectResolver {
    /// Creates a resolver with the given per-request timeout and hop limit.
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError::Unavailable`] if the HTTP client cannot be built.
    pub fn new(timeout_secs: u64, max_redirects: usize) -> Result<Self, ResolveError> {
        let client = Client::builder()
            .redirect(Policy::limited(max_redirects))
            .timeout(Duration::from_secs(timeout_secs))
            .user_agent(user_agent::default_api_user_agent())
            .build()
            .map_err(|e| {
                ResolveError::unavailable(NAME, e, "Check proxy and TLS settings")
            })?;
        Ok(Self {
            client,
            timeout_secs,
        })
    }

    fn map_error(&self, url: &str, error: &reqwest::Error) -> ResolveError {
        if error.is_timeout() {
            ResolveError::timeout(NAME, url, self.timeout_secs)
        } else if error.is_redirect() {
            ResolveError::navigation(NAME, url, "too many redirects")
        } else {
            ResolveError::navigation(NAME, url, error)
        }
    }
}

#[async_trait]
impl RedirectResolver for HttpRedirectResolver {
    fn name(&self) -> &str {
        NAME
    }

    async fn resolve(&self, url: &str) -> Result<String, ResolveError> {
        match self.client.head(url).send().await {
            Ok(response) if response.status().is_success() => {
                return Ok(response.url().to_string());
            }
            Ok(response) => {
                debug!(url, status = response.status().as_u16(), "HEAD rejected, retrying with GET");
            }
            Err(e) if e.is_redirect() => return Err(self.map_error(url, &e)),
            Err(e) => {
                debug!(url, error = %e, "HEAD failed, retrying with GET");
            }
        }

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| self.map_error(url, &e))?;
        Ok(response.url().to_string())
    }
}
