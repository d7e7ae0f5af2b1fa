//! Error types for the search/detail API client.

use thiserror::Error;

/// Errors raised while fetching or decoding API responses.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Transport failure (DNS, connect, TLS, body read).
    #[error("network error fetching {url}: {source}")]
    Network {
        /// The URL being fetched.
        url: String,
        /// The underlying transport error.
        #[source]
        source: reqwest::Error,
    },

    /// The request exceeded the client timeout.
    #[error("timeout fetching {url}")]
    Timeout {
        /// The URL being fetched.
        url: String,
    },

    /// Non-success HTTP status from the API.
    #[error("HTTP {status} fetching {url}")]
    HttpStatus {
        /// The URL being fetched.
        url: String,
        /// The HTTP status code.
        status: u16,
    },

    /// Body was not the expected JSON shape.
    #[error("malformed {what} response: {source}")]
    Parse {
        /// Which response shape failed to decode.
        what: &'static str,
        /// The underlying JSON error.
        #[source]
        source: serde_json::Error,
    },

    /// The API client could not be constructed.
    #[error("failed to build API client: {0}")]
    Client(#[source] reqwest::Error),
}

impl ApiError {
    /// Creates a transport error, promoting timeouts to [`ApiError::Timeout`].
    pub fn transport(url: impl Into<String>, source: reqwest::Error) -> Self {
        if source.is_timeout() {
            Self::Timeout { url: url.into() }
        } else {
            Self::Network {
                url: url.into(),
                source,
            }
        }
    }

    /// Creates an HTTP status error.
    pub fn http_status(url: impl Into<String>, status: u16) -> Self {
        Self::HttpStatus {
            url: url.into(),
            status,
        }
    }

    /// Creates a parse error for the named response shape.
    pub fn parse(what: &'static str, source: serde_json::Error) -> Self {
        Self::Parse { what, source }
    }
}
