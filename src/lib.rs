//! waybackprov - Which web archive collections captured a URL?
//!
//! waybackprov queries the Wayback Machine's calendar API for the captures of
//! a URL, counts them per archival collection, and can collapse each capture
//! to the most specific collection in the containment hierarchy.
//!
//! # Architecture
//!
//! The codebase is layered:
//!
//! - [`cli`] - Command-line interface layer (parses args, wires everything up)
//! - [`archive`] - Calendar and CDX clients, capture enumeration
//! - [`core`] - Domain types, collection hierarchy resolution, configuration
//! - [`fetch`] - JSON fetching with bounded retry
//! - [`report`] - Text, JSON, and CSV renderers
//!
//! # Invariants
//!
//! 1. Each collection's metadata is fetched at most once per resolver
//! 2. A collection's depth is computed once and never recomputed
//! 3. Depth computation terminates even on cyclic containment graphs
//! 4. Failed fetches are retried a bounded number of times, then surfaced

pub mod archive;
pub mod cli;
pub mod core;
pub mod fetch;
pub mod report;
