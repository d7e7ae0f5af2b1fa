//! Validating file downloader and bounded concurrent download engine.
//!
//! # Features
//!
//! - Existence check before any network traffic (re-runs are cheap)
//! - Bounded total timeout per download (30s by default)
//! - Status, Content-Type and non-empty body validation
//! - Fully buffered body written through a temp file and an atomic
//!   no-clobber rename, so no partial or overwritten file ever appears
//! - Semaphore-bounded fan-out with a join barrier and run statistics
//!
//! # Example
//!
//! ```no_run
//! use harvester_core::download::{DownloadEngine, Downloader, ResolvedTarget};
//! use std::path::Path;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let downloader = Downloader::new();
//! let mut engine = DownloadEngine::new(10, downloader, Path::new("./PDFs"))?;
//! engine
//!     .enqueue(ResolvedTarget::new("x.pdf", "https://example.com/x.pdf"))
//!     .await?;
//! let stats = engine.finish().await;
//! println!("written: {}, failed: {}", stats.written(), stats.failed());
//! # Ok(())
//! # }
//! ```

mod client;
mod constants;
mod engine;
mod error;
pub mod filename;

pub use client::{DownloadOutcome, Downloader};
pub use constants::{DOWNLOAD_TIMEOUT_SECS, EXPECTED_CONTENT_TYPE};
pub use engine::{
    DEFAULT_CONCURRENCY, DownloadEngine, DownloadStats, EngineError, MAX_CONCURRENCY,
    ResolvedTarget,
};
pub use error::DownloadError;
pub use filename::{filename_for, sanitize_filename};
