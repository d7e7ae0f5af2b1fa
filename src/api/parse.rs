//! JSON extraction for search and detail responses.
//!
//! The `parse_*` functions return the decode error; the `extract_*` wrappers
//! log it and substitute an empty result so the crawl keeps going.

use tracing::warn;

use super::error::ApiError;
use super::models::{DocumentLocation, DocumentRef, FileRef, SearchResponse};

/// Parses a search page body into document identifiers, in response order.
///
/// Hits without a `documentId` (or with an empty one) are skipped.
///
/// # Errors
///
/// Returns [`ApiError::Parse`] when the body is not the search shape.
pub fn parse_document_ids(body: &str) -> Result<Vec<DocumentRef>, ApiError> {
    let response: SearchResponse =
        serde_json::from_str(body).map_err(|e| ApiError::parse("search", e))?;
    Ok(response
        .doc_support_results
        .into_iter()
        .filter_map(|hit| hit.document_id)
        .filter(|id| !id.is_empty())
        .map(DocumentRef::new)
        .collect())
}

/// Parses a detail body into file references.
///
/// Order is preserved. When the same name appears more than once, the last
/// location wins and takes the position of the first occurrence.
///
/// # Errors
///
/// Returns [`ApiError::Parse`] when the body is not the detail shape.
pub fn parse_file_refs(body: &str) -> Result<Vec<FileRef>, ApiError> {
    let locations: Vec<DocumentLocation> =
        serde_json::from_str(body).map_err(|e| ApiError::parse("detail", e))?;

    let mut refs: Vec<FileRef> = Vec::with_capacity(locations.len());
    for location in locations {
        if let Some(existing) = refs.iter_mut().find(|r| r.name == location.name) {
            existing.location = location.document_location;
        } else {
            refs.push(FileRef::new(location.name, location.document_location));
        }
    }
    Ok(refs)
}

/// Like [`parse_document_ids`], but logs failures and returns an empty list.
#[must_use]
pub fn extract_document_ids(body: &str) -> Vec<DocumentRef> {
    parse_document_ids(body).unwrap_or_else(|error| {
        warn!(error = %error, "could not extract document ids");
        Vec::new()
    })
}

/// Like [`parse_file_refs`], but logs failures and returns an empty list.
#[must_use]
pub fn extract_file_refs(body: &str) -> Vec<FileRef> {
    parse_file_refs(body).unwrap_or_else(|error| {
        warn!(error = %error, "could not extract file references");
        Vec::new()
    })
}
