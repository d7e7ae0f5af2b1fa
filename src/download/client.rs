//! HTTP downloader that validates a response before committing it to disk.
//!
//! The body is buffered in memory in full, then written to a temp file in the
//! destination directory and moved into place with a no-clobber rename. A
//! destination that already exists is never touched.

use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

use reqwest::Client;
use reqwest::header::CONTENT_TYPE;
use tracing::{debug, info, instrument};
use url::Url;

use super::constants::{
    DOWNLOAD_TIMEOUT_SECS, EXPECTED_CONTENT_TYPE, TEMP_FILE_PREFIX, TEMP_FILE_SUFFIX,
};
use super::error::DownloadError;
use crate::user_agent;

/// What happened to a destination path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DownloadOutcome {
    /// The file was downloaded and written.
    Written {
        /// Destination path.
        path: PathBuf,
        /// Bytes written.
        bytes: u64,
    },
    /// The destination already existed; nothing was written.
    Skipped {
        /// Destination path.
        path: PathBuf,
    },
}

/// HTTP downloader for single files.
///
/// Create once and clone into tasks; clones share the connection pool.
#[derive(Debug, Clone)]
pub struct Downloader {
    client: Client,
    expected_content_type: String,
}

impl Default for Downloader {
    fn default() -> Self {
        Self::new()
    }
}

impl Downloader {
    /// Creates a downloader with the default 30s timeout expecting `application/pdf`.
    ///
    /// # Panics
    ///
    /// Panics if the HTTP client builder fails with the static configuration.
    /// This should never happen in practice.
    #[must_use]
    pub fn new() -> Self {
        Self::with_settings(DOWNLOAD_TIMEOUT_SECS, EXPECTED_CONTENT_TYPE)
    }

    /// Creates a downloader with an explicit timeout and required MIME type.
    ///
    /// # Panics
    ///
    /// Panics if the HTTP client builder fails with the supplied configuration.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn with_settings(timeout_secs: u64, expected_content_type: &str) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .gzip(true)
            .user_agent(user_agent::default_download_user_agent())
            .build()
            .expect("failed to build HTTP client with static configuration");
        Self {
            client,
            expected_content_type: expected_content_type.to_ascii_lowercase(),
        }
    }

    /// Downloads `url` to `dest` unless `dest` already exists.
    ///
    /// # Errors
    ///
    /// Returns `DownloadError` if:
    /// - The URL is invalid
    /// - The request fails (network error, timeout)
    /// - The server returns a non-success status
    /// - The Content-Type does not contain the expected MIME type
    /// - The body is empty
    /// - Writing to disk fails
    ///
    /// No file is created at `dest` in any of these cases.
    #[instrument(skip(self), fields(url = %url, dest = %dest.display()))]
    pub async fn download(&self, url: &str, dest: &Path) -> Result<DownloadOutcome, DownloadError> {
        Url::parse(url).map_err(|_| DownloadError::invalid_url(url))?;

        if tokio::fs::try_exists(dest).await.unwrap_or(false) {
            info!(path = %dest.display(), url = %url, "file already exists, skipping");
            return Ok(DownloadOutcome::Skipped {
                path: dest.to_path_buf(),
            });
        }

        debug!("starting download");
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| DownloadError::network(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(DownloadError::http_status(url, status.as_u16()));
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
            .to_string();
        if !content_type
            .to_ascii_lowercase()
            .contains(&self.expected_content_type)
        {
            return Err(DownloadError::content_type(
                url,
                content_type,
                self.expected_content_type.clone(),
            ));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| DownloadError::network(url, e))?;
        if body.is_empty() {
            return Err(DownloadError::empty_body(url));
        }

        let dest_owned = dest.to_path_buf();
        let written = tokio::task::spawn_blocking(move || write_no_clobber(&dest_owned, &body))
            .await
            .map_err(|e| DownloadError::io(dest, std::io::Error::other(e)))??;

        match written {
            Some(bytes) => {
                info!(bytes, url = %url, path = %dest.display(), "download complete");
                Ok(DownloadOutcome::Written {
                    path: dest.to_path_buf(),
                    bytes,
                })
            }
            None => {
                info!(path = %dest.display(), url = %url, "file appeared during download, keeping existing");
                Ok(DownloadOutcome::Skipped {
                    path: dest.to_path_buf(),
                })
            }
        }
    }
}

/// Writes `body` to a temp file next to `dest`, then renames it into place
/// only if `dest` does not exist.
///
/// Returns `Some(bytes)` when written, `None` when `dest` already existed.
fn write_no_clobber(dest: &Path, body: &[u8]) -> Result<Option<u64>, DownloadError> {
    let dir = dest
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));

    let mut temp = tempfile::Builder::new()
        .prefix(TEMP_FILE_PREFIX)
        .suffix(TEMP_FILE_SUFFIX)
        .tempfile_in(dir)
        .map_err(|e| DownloadError::io(dir, e))?;
    temp.write_all(body)
        .and_then(|()| temp.flush())
        .map_err(|e| DownloadError::io(temp.path(), e))?;

    match temp.persist_noclobber(dest) {
        Ok(_) => Ok(Some(body.len() as u64)),
        // The temp file is removed when `err.file` drops.
        Err(err) if err.error.kind() == ErrorKind::AlreadyExists => Ok(None),
        Err(err) => Err(DownloadError::io(dest, err.error)),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    use tempfile::TempDir;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn pdf_response(body: &[u8]) -> ResponseTemplate {
        ResponseTemplate::new(200)
            .insert_header("Content-Type", "application/pdf")
            .set_body_bytes(body.to_vec())
    }

    fn leftover_temp_files(dir: &Path) -> usize {
        std::fs::read_dir(dir)
            .unwrap()
            .filter_map(Result::ok)
            .filter(|e| e.file_name().to_string_lossy().starts_with(TEMP_FILE_PREFIX))
            .count()
    }

    #[test]
    fn test_write_no_clobber_creates_file() {
        let temp_dir = TempDir::new().unwrap();
        let dest = temp_dir.path().join("a.pdf");
        assert_eq!(write_no_clobber(&dest, b"abc").unwrap(), Some(3));
        assert_eq!(std::fs::read(&dest).unwrap(), b"abc");
        assert_eq!(leftover_temp_files(temp_dir.path()), 0);
    }

    #[test]
    fn test_write_no_clobber_keeps_existing_file() {
        let temp_dir = TempDir::new().unwrap();
        let dest = temp_dir.path().join("a.pdf");
        std::fs::write(&dest, b"original").unwrap();

        assert_eq!(write_no_clobber(&dest, b"replacement").unwrap(), None);
        assert_eq!(std::fs::read(&dest).unwrap(), b"original");
        assert_eq!(leftover_temp_files(temp_dir.path()), 0);
    }

    #[tokio::test]
    async fn test_download_success_writes_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/x.pdf"))
            .respond_with(pdf_response(b"0123456789"))
            .mount(&server)
            .await;

        let temp_dir = TempDir::new().unwrap();
        let dest = temp_dir.path().join("x.pdf");
        let outcome = Downloader::new()
            .download(&format!("{}/x.pdf", server.uri()), &dest)
            .await
            .unwrap();

        assert_eq!(
            outcome,
            DownloadOutcome::Written {
                path: dest.clone(),
                bytes: 10
            }
        );
        assert_eq!(std::fs::read(&dest).unwrap(), b"0123456789");
    }

    #[tokio::test]
    async fn test_download_content_type_with_parameters_accepted() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("Content-Type", "Application/PDF; charset=binary")
                    .set_body_bytes(b"%PDF-1.7".to_vec()),
            )
            .mount(&server)
            .await;

        let temp_dir = TempDir::new().unwrap();
        let dest = temp_dir.path().join("y.pdf");
        let outcome = Downloader::new()
            .download(&format!("{}/y", server.uri()), &dest)
            .await;
        assert!(matches!(outcome, Ok(DownloadOutcome::Written { bytes: 8, .. })));
    }

    #[tokio::test]
    async fn test_download_existing_file_skipped_without_request() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(pdf_response(b"new content"))
            .expect(0)
            .mount(&server)
            .await;

        let temp_dir = TempDir::new().unwrap();
        let dest = temp_dir.path().join("x.pdf");
        std::fs::write(&dest, b"old content").unwrap();

        let outcome = Downloader::new()
            .download(&format!("{}/x.pdf", server.uri()), &dest)
            .await
            .unwrap();

        assert!(matches!(outcome, DownloadOutcome::Skipped { .. }));
        assert_eq!(std::fs::read(&dest).unwrap(), b"old content");
    }

    #[tokio::test]
    async fn test_download_error_status_creates_no_file() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(404)
                    .insert_header("Content-Type", "application/pdf")
                    .set_body_bytes(b"missing".to_vec()),
            )
            .mount(&server)
            .await;

        let temp_dir = TempDir::new().unwrap();
        let dest = temp_dir.path().join("x.pdf");
        let result = Downloader::new()
            .download(&format!("{}/x.pdf", server.uri()), &dest)
            .await;

        assert!(matches!(result, Err(DownloadError::HttpStatus { status: 404, .. })));
        assert!(!dest.exists());
    }

    #[tokio::test]
    async fn test_download_wrong_content_type_creates_no_file() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("Content-Type", "text/html")
                    .set_body_string("<html>login</html>"),
            )
            .mount(&server)
            .await;

        let temp_dir = TempDir::new().unwrap();
        let dest = temp_dir.path().join("x.pdf");
        let result = Downloader::new()
            .download(&format!("{}/x.pdf", server.uri()), &dest)
            .await;

        assert!(matches!(result, Err(DownloadError::ContentType { .. })));
        assert!(!dest.exists());
    }

    #[tokio::test]
    async fn test_download_empty_body_creates_no_file() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(pdf_response(b""))
            .mount(&server)
            .await;

        let temp_dir = TempDir::new().unwrap();
        let dest = temp_dir.path().join("x.pdf");
        let result = Downloader::new()
            .download(&format!("{}/x.pdf", server.uri()), &dest)
            .await;

        assert!(matches!(result, Err(DownloadError::EmptyBody { .. })));
        assert!(!dest.exists());
        assert_eq!(leftover_temp_files(temp_dir.path()), 0);
    }

    #[tokio::test]
    async fn test_download_timeout_creates_no_file() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(pdf_response(b"slow").set_delay(Duration::from_secs(3)))
            .mount(&server)
            .await;

        let temp_dir = TempDir::new().unwrap();
        let dest = temp_dir.path().join("x.pdf");
        let result = Downloader::with_settings(1, EXPECTED_CONTENT_TYPE)
            .download(&format!("{}/x.pdf", server.uri()), &dest)
            .await;

        assert!(matches!(result, Err(DownloadError::Timeout { .. })), "got {result:?}");
        assert!(!dest.exists());
    }

    #[tokio::test]
    async fn test_download_invalid_url() {
        let temp_dir = TempDir::new().unwrap();
        let dest = temp_dir.path().join("x.pdf");
        let result = Downloader::new().download("not-a-url", &dest).await;
        assert!(matches!(result, Err(DownloadError::InvalidUrl { .. })));
    }
}
