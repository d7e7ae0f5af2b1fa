//! Harvester Core Library
//!
//! This library crawls a paginated document-search API, resolves each
//! document to its downloadable files, and downloads them concurrently into
//! a local directory.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//! - [`api`] - Search and detail API client plus JSON extraction
//! - [`dedup`] - Order-preserving identifier deduplication
//! - [`resolver`] - Pluggable redirect resolution (browser, HTTP, passthrough)
//! - [`download`] - Validating downloader and bounded download engine
//! - [`pipeline`] - The page/document/file orchestrator
//! - [`config`] - Run configuration and config-file loading

// Clippy lints - strict for library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod api;
pub mod config;
pub mod dedup;
pub mod download;
pub mod pipeline;
pub mod resolver;
mod user_agent;

// Re-export commonly used types
pub use api::{ApiClient, ApiError, DocumentRef, FileRef};
pub use config::{ConfigError, FileConfig, HarvestConfig, ResolverKind, SkipRule};
pub use dedup::{DocumentIdSet, dedup};
pub use download::{
    DEFAULT_CONCURRENCY, DownloadEngine, DownloadError, DownloadOutcome, DownloadStats, Downloader,
    EngineError, ResolvedTarget, sanitize_filename,
};
pub use pipeline::{HarvestError, Harvester, PageScope, TargetFilter};
pub use resolver::{
    HttpRedirectResolver, PassthroughResolver, RedirectResolver, ResolveError, build_resolver,
    resolve_or_skip,
};
