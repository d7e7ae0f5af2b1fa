//! Client and extractors for the vendor document-search API.
//!
//! Two endpoints are consumed:
//!
//! - the keyword search endpoint, paged by `resultPage`, whose body is
//!   `{ "docSupportResults": [ { "documentId": "..." } ] }`
//! - the per-document detail endpoint, whose body is
//!   `[ { "name": "...", "documentLocation": "..." } ]`
//!
//! # Example
//!
//! ```no_run
//! use harvester_core::api::{ApiClient, extract_document_ids};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = ApiClient::new("https://www.thermofisher.com", 60, 30)?;
//! let body = client.fetch_text(&client.search_url(0)).await?;
//! for id in extract_document_ids(&body) {
//!     println!("{id}");
//! }
//! # Ok(())
//! # }
//! ```

mod client;
mod error;
mod models;
mod parse;

pub use client::ApiClient;
pub use error::ApiError;
pub use models::{DocumentRef, FileRef};
pub use parse::{extract_document_ids, extract_file_refs, parse_document_ids, parse_file_refs};
