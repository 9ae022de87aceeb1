//! core::types
//!
//! Strong types for core domain concepts.
//!
//! # Types
//!
//! - [`CollectionId`] - Validated archive collection identifier
//! - [`CaptureRecord`] - One archiving event for a URL
//!
//! # Validation
//!
//! Identifiers are embedded into metadata URLs, so they are checked at
//! construction time. Invalid values cannot be represented.
//!
//! # Examples
//!
//! ```
//! use waybackprov::core::types::CollectionId;
//!
//! let id = CollectionId::new("ArchiveIt-Collection-2410").unwrap();
//! assert_eq!(id.as_str(), "ArchiveIt-Collection-2410");
//!
//! assert!(CollectionId::new("").is_err());
//! assert!(CollectionId::new("has space").is_err());
//! assert!(CollectionId::new("a/b").is_err());
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from type validation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("invalid collection identifier '{id}': {reason}")]
    InvalidCollectionId { id: String, reason: &'static str },
}

/// A validated archive collection identifier.
///
/// Identifiers must be non-empty and may not contain whitespace or `/`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CollectionId(String);

impl CollectionId {
    /// Create a new validated identifier.
    ///
    /// # Errors
    ///
    /// Returns `TypeError::InvalidCollectionId` if the identifier is empty or
    /// contains whitespace or `/`.
    pub fn new(id: impl Into<String>) -> Result<Self, TypeError> {
        let id = id.into();
        let reason = if id.is_empty() {
            Some("identifier cannot be empty")
        } else if id.chars().any(char::is_whitespace) {
            Some("identifier cannot contain whitespace")
        } else if id.contains('/') {
            Some("identifier cannot contain '/'")
        } else {
            None
        };

        match reason {
            Some(reason) => Err(TypeError::InvalidCollectionId { id, reason }),
            None => Ok(Self(id)),
        }
    }

    /// Get the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for CollectionId {
    type Error = TypeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<CollectionId> for String {
    fn from(id: CollectionId) -> Self {
        id.0
    }
}

impl AsRef<str> for CollectionId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for CollectionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// One observed archiving event for a URL.
///
/// Serializes with the field names consumed by the JSON renderer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaptureRecord {
    /// 14-digit wayback timestamp (`YYYYMMDDhhmmss`)
    pub timestamp: u64,
    /// HTTP status recorded for the capture
    pub status: u16,
    /// Collections responsible for the capture
    pub collections: Vec<CollectionId>,
    /// Replay URL of the capture
    pub url: String,
}

impl CaptureRecord {
    /// Build the replay URL for `original` captured at `timestamp`.
    pub fn replay_url(wayback_base: &str, timestamp: u64, original: &str) -> String {
        format!(
            "{}/web/{}/{}",
            wayback_base.trim_end_matches('/'),
            timestamp,
            original
        )
    }
}
