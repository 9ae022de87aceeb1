//! core::resolver
//!
//! Collection hierarchy resolution.
//!
//! # Overview
//!
//! [`CollectionResolver`] owns the [`CollectionStore`] and a [`JsonFetcher`].
//! It answers three questions:
//!
//! - [`resolve_metadata`](CollectionResolver::resolve_metadata): what is this
//!   collection? Fetched once, then served from the store.
//! - [`depth_of`](CollectionResolver::depth_of): how deep is it in the
//!   containment hierarchy?
//! - [`deepest`](CollectionResolver::deepest): which of these collections is
//!   the most specific?
//!
//! # Depth
//!
//! A collection without parents has depth 0; otherwise its depth is one more
//! than the deepest parent. Parents are resolved lazily while the hierarchy
//! is walked depth-first.
//!
//! Containment graphs are not guaranteed to be acyclic. Each top-level
//! `depth_of` call threads its own visiting set through the recursion. A
//! parent that is already in the visiting set counts as depth 0, so the edge
//! to it still adds one level and the cycle is cut at the point of re-entry.
//! For `X <-> Y`, asking for `X` yields 2 and stores 1 for `Y`; a collection
//! listing itself has depth 1. The result depends on traversal order; it
//! always terminates and is stable for the life of the resolver because
//! depths are stored once and never recomputed.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use serde_json::json;
//! use waybackprov::core::resolver::CollectionResolver;
//! use waybackprov::core::types::CollectionId;
//! use waybackprov::fetch::mock::MockFetcher;
//!
//! # tokio_test::block_on(async {
//! let fetcher = MockFetcher::new()
//!     .respond("https://archive.org/metadata/leaf", json!({"metadata": {}}))
//!     .respond("https://archive.org/metadata/mid", json!({"metadata": {"collection": "leaf"}}));
//! let mut resolver = CollectionResolver::new(Arc::new(fetcher), "https://archive.org/metadata");
//!
//! let mid = CollectionId::new("mid").unwrap();
//! assert_eq!(resolver.depth_of(&mid).await.unwrap(), 1);
//! # });
//! ```

use std::collections::HashSet;
use std::sync::Arc;

use serde_json::Value;
use thiserror::Error;

use super::collection::CollectionMetadata;
use super::store::CollectionStore;
use super::types::CollectionId;
use crate::fetch::{FetchError, JsonFetcher};

const LOG_TARGET: &str = "waybackprov::resolver";

/// Errors from collection resolution.
#[derive(Debug, Error)]
pub enum ResolveError {
    /// The metadata document could not be fetched.
    #[error("failed to fetch metadata for collection {id}: {source}")]
    Fetch {
        id: CollectionId,
        #[source]
        source: FetchError,
    },

    /// The response had no usable `metadata` object.
    #[error("metadata for collection {id} is missing or malformed: {message}")]
    MissingMetadata { id: CollectionId, message: String },

    /// [`CollectionResolver::deepest`] was called without candidates.
    #[error("cannot pick the deepest of zero collections")]
    EmptyInput,
}

/// Resolves collection metadata and containment depth.
#[derive(Debug)]
pub struct CollectionResolver {
    fetcher: Arc<dyn JsonFetcher>,
    metadata_base: String,
    store: CollectionStore,
}

impl CollectionResolver {
    /// Create a resolver with an empty store.
    ///
    /// `metadata_base` is the metadata endpoint without a trailing
    /// identifier, e.g. `https://archive.org/metadata`.
    pub fn new(fetcher: Arc<dyn JsonFetcher>, metadata_base: impl Into<String>) -> Self {
        Self::with_store(fetcher, metadata_base, CollectionStore::new())
    }

    /// Create a resolver over an existing store.
    pub fn with_store(
        fetcher: Arc<dyn JsonFetcher>,
        metadata_base: impl Into<String>,
        store: CollectionStore,
    ) -> Self {
        let metadata_base = metadata_base.into().trim_end_matches('/').to_string();
        Self {
            fetcher,
            metadata_base,
            store,
        }
    }

    /// The backing store.
    pub fn store(&self) -> &CollectionStore {
        &self.store
    }

    /// Metadata URL for a collection.
    pub fn metadata_url(&self, id: &CollectionId) -> String {
        format!("{}/{}", self.metadata_base, id)
    }

    /// Get a collection's metadata, fetching it on first access.
    ///
    /// Repeated calls for the same identifier return the same handle and
    /// never touch the network again.
    ///
    /// # Errors
    ///
    /// Returns `ResolveError::Fetch` if the fetch fails after retries, or
    /// `ResolveError::MissingMetadata` if the document has no `metadata`
    /// object.
    pub async fn resolve_metadata(
        &mut self,
        id: &CollectionId,
    ) -> Result<Arc<CollectionMetadata>, ResolveError> {
        if let Some(cached) = self.store.get(id) {
            return Ok(cached);
        }

        log::info!(target: LOG_TARGET, "fetching collection {id}");
        let url = self.metadata_url(id);
        let mut document = self
            .fetcher
            .fetch_json(&url)
            .await
            .map_err(|source| ResolveError::Fetch {
                id: id.clone(),
                source,
            })?;

        let metadata = match document.get_mut("metadata").map(Value::take) {
            Some(metadata @ Value::Object(_)) => metadata,
            _ => {
                return Err(ResolveError::MissingMetadata {
                    id: id.clone(),
                    message: "response has no metadata object".into(),
                })
            }
        };

        let metadata = CollectionMetadata::from_metadata(id.clone(), metadata).map_err(|e| {
            ResolveError::MissingMetadata {
                id: id.clone(),
                message: e.to_string(),
            }
        })?;

        Ok(self.store.put(metadata))
    }

    /// Compute a collection's containment depth.
    ///
    /// # Errors
    ///
    /// Propagates any error from resolving the collection or its ancestors.
    pub async fn depth_of(&mut self, id: &CollectionId) -> Result<u32, ResolveError> {
        let mut visiting = HashSet::new();
        self.depth_within(id, &mut visiting).await
    }

    async fn depth_within(
        &mut self,
        id: &CollectionId,
        visiting: &mut HashSet<CollectionId>,
    ) -> Result<u32, ResolveError> {
        let metadata = self.resolve_metadata(id).await?;
        if let Some(depth) = metadata.depth() {
            return Ok(depth);
        }

        log::info!(target: LOG_TARGET, "calculating depth of {id}");
        visiting.insert(id.clone());

        let mut depth = 0;
        for parent in metadata.parent_ids() {
            let parent_depth = if visiting.contains(parent) {
                log::debug!(target: LOG_TARGET, "cycle between {id} and {parent}, treating {parent} as 0");
                0
            } else {
                Box::pin(self.depth_within(parent, visiting)).await?
            };
            let through_parent = parent_depth + 1;
            if through_parent > depth {
                depth = through_parent;
            }
        }

        visiting.remove(id);
        let depth = metadata.record_depth(depth);
        log::info!(target: LOG_TARGET, "depth {id} = {depth}");
        Ok(depth)
    }

    /// Pick the most specific collection of a capture.
    ///
    /// Returns the first identifier, in input order, whose depth is maximal.
    ///
    /// # Errors
    ///
    /// Returns `ResolveError::EmptyInput` if `ids` is empty, and propagates
    /// resolution errors.
    pub async fn deepest(&mut self, ids: &[CollectionId]) -> Result<CollectionId, ResolveError> {
        let mut best: Option<(&CollectionId, u32)> = None;
        for id in ids {
            let depth = self.depth_of(id).await?;
            if best.map_or(true, |(_, best_depth)| depth > best_depth) {
                best = Some((id, depth));
            }
        }

        best.map(|(id, _)| id.clone()).ok_or(ResolveError::EmptyInput)
    }
}
