//! Order-preserving deduplication of document identifiers.

use std::collections::HashSet;

use crate::api::DocumentRef;

/// Removes duplicates while keeping the first occurrence of each value.
///
/// Runs in linear time using a membership set. Comparison is exact (no case folding).
#[must_use]
pub fn dedup<S: AsRef<str>>(values: &[S]) -> Vec<String> {
    let mut seen = HashSet::with_capacity(values.len());
    let mut out = Vec::with_capacity(values.len());
    for value in values {
        let value = value.as_ref();
        if seen.insert(value) {
            out.push(value.to_string());
        }
    }
    out
}

/// Persistent, insertion-ordered set of every document identifier seen in a run.
///
/// Owned by the orchestrator and grown monotonically page by page.
#[derive(Debug, Default, Clone)]
pub struct DocumentIdSet {
    order: Vec<DocumentRef>,
    members: HashSet<DocumentRef>,
}

impl DocumentIdSet {
    /// Creates an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts one identifier, returning `true` if it was not present.
    pub fn insert(&mut self, id: DocumentRef) -> bool {
        if self.members.contains(&id) {
            return false;
        }
        self.members.insert(id.clone());
        self.order.push(id);
        true
    }

    /// Merges a batch and returns the identifiers that were new, in first-seen order.
    pub fn extend<I>(&mut self, ids: I) -> Vec<DocumentRef>
    where
        I: IntoIterator<Item = DocumentRef>,
    {
        ids.into_iter()
            .filter(|id| self.insert(id.clone()))
            .collect()
    }

    /// Returns true if the identifier has been seen.
    #[must_use]
    pub fn contains(&self, id: &DocumentRef) -> bool {
        self.members.contains(id)
    }

    /// Iterates all identifiers in first-seen order.
    pub fn iter(&self) -> impl Iterator<Item = &DocumentRef> {
        self.order.iter()
    }

    /// Number of distinct identifiers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Returns true when no identifier has been seen.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}
