//! Domain types and wire shapes for API responses.

use std::fmt;

use serde::Deserialize;

/// Opaque identifier for one logical document returned by the search API.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize)]
#[serde(transparent)]
pub struct DocumentRef(String);

impl DocumentRef {
    /// Wraps a raw identifier.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the identifier text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DocumentRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for DocumentRef {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// A named pointer to one downloadable artifact of a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRef {
    /// Display name from the detail response.
    pub name: String,
    /// Source URL, possibly redirecting.
    pub location: String,
}

impl FileRef {
    /// Creates a file reference.
    #[must_use]
    pub fn new(name: impl Into<String>, location: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            location: location.into(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct SearchResponse {
    #[serde(rename = "docSupportResults", default)]
    pub(crate) doc_support_results: Vec<SearchHit>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SearchHit {
    #[serde(rename = "documentId", default)]
    pub(crate) document_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct DocumentLocation {
    #[serde(default)]
    pub(crate) name: String,
    #[serde(rename = "documentLocation", default)]
    pub(crate) document_location: String,
}
