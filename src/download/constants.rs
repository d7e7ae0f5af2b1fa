//! Constants for the download module.

/// Default total timeout for one file download (connect + full body read).
pub const DOWNLOAD_TIMEOUT_SECS: u64 = 30;

/// MIME type a response must carry to be written to disk.
pub const EXPECTED_CONTENT_TYPE: &str = "application/pdf";

/// Prefix for in-flight temp files inside the output directory.
pub(crate) const TEMP_FILE_PREFIX: &str = ".harvester-";

/// Suffix for in-flight temp files inside the output directory.
pub(crate) const TEMP_FILE_SUFFIX: &str = ".part";
