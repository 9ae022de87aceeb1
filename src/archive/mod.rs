//! archive
//!
//! Clients for the Wayback Machine's calendar and CDX endpoints.
//!
//! # Overview
//!
//! - [`calendar`] - capture events for one URL in one year
//! - [`cdx`] - expansion of a URL prefix into concrete URLs
//! - [`crawls`] - enumerate captures over a year range, optionally
//!   collapsing each capture to its most specific collection
//!
//! All clients go through a shared [`JsonFetcher`](crate::fetch::JsonFetcher),
//! so they inherit its retry policy.

pub mod calendar;
pub mod cdx;
pub mod crawls;

pub use calendar::CalendarClient;
pub use cdx::CdxClient;
pub use crawls::{CrawlOptions, Crawls};

use thiserror::Error;

use crate::core::resolver::ResolveError;
use crate::fetch::FetchError;

/// Default Wayback Machine base URL.
pub const DEFAULT_WAYBACK_BASE: &str = "https://web.archive.org";

/// Default metadata API base URL.
pub const DEFAULT_METADATA_BASE: &str = "https://archive.org/metadata";

/// Default collection details page base URL.
pub const DEFAULT_DETAILS_BASE: &str = "https://archive.org/details";

/// Errors from archive enumeration.
#[derive(Debug, Error)]
pub enum ArchiveError {
    /// A request failed after retries.
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// Collapsing a capture's collections failed.
    #[error(transparent)]
    Resolve(#[from] ResolveError),

    /// The `--match` pattern does not compile.
    #[error("invalid match pattern '{pattern}': {message}")]
    InvalidRegex { pattern: String, message: String },

    /// A response body did not have the expected layout.
    #[error("unexpected response from {url}: {message}")]
    UnexpectedShape { url: String, message: String },

    /// The year range is empty.
    #[error("start year {start} is after end year {end}")]
    InvalidYearRange { start: i32, end: i32 },

    /// A base URL could not be combined with query parameters.
    #[error("invalid endpoint URL '{url}': {message}")]
    InvalidEndpoint { url: String, message: String },
}

/// Build an endpoint URL with properly encoded query parameters.
pub(crate) fn endpoint_url(base: &str, path: &str, params: &[(&str, String)]) -> Result<String, ArchiveError> {
    let raw = format!("{}/{}", base.trim_end_matches('/'), path.trim_start_matches('/'));
    reqwest::Url::parse_with_params(&raw, params)
        .map(String::from)
        .map_err(|e| ArchiveError::InvalidEndpoint {
            url: raw,
            message: e.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_url_encodes_query() {
        let url = endpoint_url(
            "https://web.archive.org/",
            "/__wb/calendarcaptures",
            &[("url", "https://epa.gov/?a=b".into()), ("selected_year", "2017".into())],
        )
        .unwrap();
        assert_eq!(
            url,
            "https://web.archive.org/__wb/calendarcaptures?url=https%3A%2F%2Fepa.gov%2F%3Fa%3Db&selected_year=2017"
        );
    }

    #[test]
    fn endpoint_url_rejects_garbage_base() {
        assert!(matches!(
            endpoint_url("not a url", "x", &[]),
            Err(ArchiveError::InvalidEndpoint { .. })
        ));
    }
}
