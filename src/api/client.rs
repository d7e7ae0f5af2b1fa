//! HTTP client for the search and detail endpoints.

use std::time::Duration;

use reqwest::Client;
use reqwest::header::{ACCEPT, HeaderMap, HeaderValue};
use tracing::{debug, instrument};

use super::error::ApiError;
use super::models::DocumentRef;
use crate::user_agent;

/// Fixed query for the SDS document-support search.
const SEARCH_QUERY: &str = "countryCode=us&language=en&query=*:*&persona=DocSupport\
    &filter=document.result_type_s%3ASDS&refinementAction=true&personaClicked=true";

/// Thin client that builds endpoint URLs and fetches response bodies as text.
///
/// Cloning is cheap; the underlying connection pool is shared.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    results_per_page: u32,
}

impl ApiClient {
    /// Creates a client for the API rooted at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Client`] if the HTTP client cannot be built.
    pub fn new(
        base_url: impl Into<String>,
        results_per_page: u32,
        timeout_secs: u64,
    ) -> Result<Self, ApiError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .default_headers(headers)
            .user_agent(user_agent::default_api_user_agent())
            .gzip(true)
            .build()
            .map_err(ApiError::Client)?;

        let base_url = base_url.into().trim_end_matches('/').to_string();
        Ok(Self {
            client,
            base_url,
            results_per_page,
        })
    }

    /// Builds the search URL for one result page.
    #[must_use]
    pub fn search_url(&self, page: u32) -> String {
        format!(
            "{}/api/search/keyword/docsupport?{SEARCH_QUERY}&resultPage={page}&resultsPerPage={}",
            self.base_url, self.results_per_page
        )
    }

    /// Builds the detail URL listing the files of one document.
    #[must_use]
    pub fn detail_url(&self, id: &DocumentRef) -> String {
        format!("{}/api/search/documents/sds/{id}", self.base_url)
    }

    /// Issues a GET and returns the body as text.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Network`]/[`ApiError::Timeout`] on transport
    /// failure and [`ApiError::HttpStatus`] on a non-success status.
    #[instrument(level = "debug", skip(self))]
    pub async fn fetch_text(&self, url: &str) -> Result<String, ApiError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| ApiError::transport(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::http_status(url, status.as_u16()));
        }

        let body = response
            .text()
            .await
            .map_err(|e| ApiError::transport(url, e))?;
        debug!(bytes = body.len(), "fetched");
        Ok(body)
    }
}
