//! Error types for the download module.
//!
//! Every variant carries the URL or path needed to make the log line useful
//! on its own, since download failures are reported only through logs.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while downloading one file.
#[derive(Debug, Error)]
pub enum DownloadError {
    /// Network-level error (DNS resolution, connection refused, TLS errors, etc.)
    #[error("network error downloading {url}: {source}")]
    Network {
        /// The URL that failed to download.
        url: String,
        /// The underlying network error.
        #[source]
        source: reqwest::Error,
    },

    /// Request timed out before the body was fully read.
    #[error("timeout downloading {url}")]
    Timeout {
        /// The URL that timed out.
        url: String,
    },

    /// HTTP error response.
    #[error("HTTP {status} downloading {url}")]
    HttpStatus {
        /// The URL that returned an error status.
        url: String,
        /// The HTTP status code.
        status: u16,
    },

    /// Response was not the expected binary format.
    #[error("invalid content type for {url}: {content_type:?} (expected {expected})")]
    ContentType {
        /// The URL that was fetched.
        url: String,
        /// The Content-Type header received, empty when absent.
        content_type: String,
        /// The MIME type that was required.
        expected: String,
    },

    /// Server returned a successful but empty body.
    #[error("downloaded 0 bytes for {url}, not creating file")]
    EmptyBody {
        /// The URL that was fetched.
        url: String,
    },

    /// File system error while writing the destination.
    #[error("IO error writing to {path}: {source}")]
    Io {
        /// The file path where the error occurred.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// The provided URL is malformed or invalid.
    #[error("invalid URL: {url}")]
    InvalidUrl {
        /// The invalid URL string.
        url: String,
    },
}

impl DownloadError {
    /// Creates a network error, promoting timeouts to [`DownloadError::Timeout`].
    pub fn network(url: impl Into<String>, source: reqwest::Error) -> Self {
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

    /// Creates a content-type mismatch error.
    pub fn content_type(
        url: impl Into<String>,
        content_type: impl Into<String>,
        expected: impl Into<String>,
    ) -> Self {
        Self::ContentType {
            url: url.into(),
            content_type: content_type.into(),
            expected: expected.into(),
        }
    }

    /// Creates an empty-body error.
    pub fn empty_body(url: impl Into<String>) -> Self {
        Self::EmptyBody { url: url.into() }
    }

    /// Creates a timeout error.
    pub fn timeout(url: impl Into<String>) -> Self {
        Self::Timeout { url: url.into() }
    }

    /// Creates an IO error.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Creates an invalid URL error.
    pub fn invalid_url(url: impl Into<String>) -> Self {
        Self::InvalidUrl { url: url.into() }
    }
}

// No `From<reqwest::Error>` / `From<std::io::Error>`: every variant needs the
// url or path, which the source errors do not carry.
