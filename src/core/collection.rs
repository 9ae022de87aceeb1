//! core::collection
//!
//! Collection metadata as reported by the archive's metadata API.
//!
//! # Normalization
//!
//! The `collection` field of a metadata document names the parents of a
//! collection. It arrives as a single string, a list of strings, or not at
//! all. It is normalized once, at deserialization, into an ordered
//! `Vec<CollectionId>` so nothing downstream branches on its shape.
//!
//! # Depth
//!
//! The containment depth is written at most once, after the entry has
//! already been stored. The write-once cell makes "never recomputed" a
//! property of the type rather than of its callers.

use std::sync::OnceLock;

use serde::Deserialize;
use serde_json::{Map, Value};

use super::types::CollectionId;

const LOG_TARGET: &str = "waybackprov::collection";

/// The `collection` field before normalization.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ParentField {
    One(String),
    Many(Vec<String>),
}

impl ParentField {
    fn into_ids(self, owner: &CollectionId) -> Vec<CollectionId> {
        let raw = match self {
            ParentField::One(id) => vec![id],
            ParentField::Many(ids) => ids,
        };

        raw.into_iter()
            .filter_map(|id| match CollectionId::new(id) {
                Ok(id) => Some(id),
                Err(e) => {
                    log::warn!(target: LOG_TARGET, "ignoring parent of {owner}: {e}");
                    None
                }
            })
            .collect()
    }
}

#[derive(Debug, Deserialize)]
struct RawMetadata {
    #[serde(default)]
    collection: Option<ParentField>,
    #[serde(flatten)]
    fields: Map<String, Value>,
}

/// Metadata for one archival collection.
#[derive(Debug)]
pub struct CollectionMetadata {
    id: CollectionId,
    parent_ids: Vec<CollectionId>,
    fields: Map<String, Value>,
    depth: OnceLock<u32>,
}

impl CollectionMetadata {
    /// Build metadata from the `metadata` object of an API response.
    ///
    /// # Errors
    ///
    /// Returns an error if `metadata` is not an object or its `collection`
    /// field is neither a string nor a list of strings.
    pub fn from_metadata(id: CollectionId, metadata: Value) -> Result<Self, serde_json::Error> {
        let raw: RawMetadata = serde_json::from_value(metadata)?;
        let parent_ids = raw
            .collection
            .map(|field| field.into_ids(&id))
            .unwrap_or_default();

        Ok(Self {
            id,
            parent_ids,
            fields: raw.fields,
            depth: OnceLock::new(),
        })
    }

    /// Build metadata directly from parent identifiers.
    pub fn with_parents(id: CollectionId, parent_ids: Vec<CollectionId>) -> Self {
        Self {
            id,
            parent_ids,
            fields: Map::new(),
            depth: OnceLock::new(),
        }
    }

    /// The collection identifier.
    pub fn id(&self) -> &CollectionId {
        &self.id
    }

    /// Collections directly containing this one, in API order.
    pub fn parent_ids(&self) -> &[CollectionId] {
        &self.parent_ids
    }

    /// Descriptive fields other than `collection`, passed through untouched.
    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    /// The collection title, if present as a string.
    pub fn title(&self) -> Option<&str> {
        self.fields.get("title").and_then(Value::as_str)
    }

    /// The containment depth, if already computed.
    pub fn depth(&self) -> Option<u32> {
        self.depth.get().copied()
    }

    /// Record the containment depth and return the stored value.
    ///
    /// The first recorded depth wins; later calls return it unchanged.
    pub fn record_depth(&self, depth: u32) -> u32 {
        *self.depth.get_or_init(|| depth)
    }
}
