//! core::store
//!
//! Cache of resolved collection metadata.
//!
//! # Invariants
//!
//! - At most one entry per identifier
//! - Entries are never evicted or replaced
//!
//! Entries are shared handles. An entry is stored before its depth is known
//! and the depth is filled in later through the handle, so lookups made while
//! a depth is being computed see the in-progress entry.

use std::collections::HashMap;
use std::sync::Arc;

use super::collection::CollectionMetadata;
use super::types::CollectionId;

/// Identifier-keyed metadata cache with no eviction.
#[derive(Debug, Default)]
pub struct CollectionStore {
    entries: HashMap<CollectionId, Arc<CollectionMetadata>>,
}

impl CollectionStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up an entry.
    pub fn get(&self, id: &CollectionId) -> Option<Arc<CollectionMetadata>> {
        self.entries.get(id).cloned()
    }

    /// Store an entry and return the handle now held by the store.
    ///
    /// If the identifier is already present the existing entry is kept and
    /// returned; the new value is discarded.
    pub fn put(&mut self, metadata: CollectionMetadata) -> Arc<CollectionMetadata> {
        self.entries
            .entry(metadata.id().clone())
            .or_insert_with(|| Arc::new(metadata))
            .clone()
    }

    /// Check whether an identifier has been stored.
    pub fn contains(&self, id: &CollectionId) -> bool {
        self.entries.contains_key(id)
    }

    /// Number of stored entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the store is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
