//! core
//!
//! Domain types, collection hierarchy resolution, and configuration.
//!
//! # Modules
//!
//! - [`types`] - Strong types ([`CollectionId`](types::CollectionId), [`CaptureRecord`](types::CaptureRecord))
//! - [`collection`] - Collection metadata and parent normalization
//! - [`store`] - Fetch-once metadata cache
//! - [`resolver`] - Depth computation and deepest-collection selection
//! - [`config`] - Configuration file schema and loading

pub mod collection;
pub mod config;
pub mod resolver;
pub mod store;
pub mod types;
