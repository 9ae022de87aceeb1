//! archive::cdx
//!
//! Prefix search over the CDX index.
//!
//! The CDX server answers `output=json` queries with a table whose first row
//! is the header (`["original"]` with `fl=original`) and whose remaining rows
//! are one URL each. `collapse=urlkey` asks the server to return each URL
//! once per key; the client deduplicates again to keep the order stable.

use std::collections::HashSet;
use std::sync::Arc;

use regex::Regex;

use super::{endpoint_url, ArchiveError};
use crate::fetch::JsonFetcher;

const LOG_TARGET: &str = "waybackprov::cdx";

/// Compile a user-supplied match pattern.
///
/// # Errors
///
/// Returns `ArchiveError::InvalidRegex` if the pattern does not compile.
pub fn compile_match(pattern: &str) -> Result<Regex, ArchiveError> {
    Regex::new(pattern).map_err(|e| ArchiveError::InvalidRegex {
        pattern: pattern.to_string(),
        message: e.to_string(),
    })
}

/// Client for the CDX search endpoint.
#[derive(Debug, Clone)]
pub struct CdxClient {
    fetcher: Arc<dyn JsonFetcher>,
    wayback_base: String,
}

impl CdxClient {
    /// Create a client against `wayback_base` (e.g. `https://web.archive.org`).
    pub fn new(fetcher: Arc<dyn JsonFetcher>, wayback_base: impl Into<String>) -> Self {
        Self {
            fetcher,
            wayback_base: wayback_base.into(),
        }
    }

    /// CDX search URL for URLs under `prefix` captured between the years.
    pub fn search_url(&self, prefix: &str, start_year: i32, end_year: i32) -> Result<String, ArchiveError> {
        endpoint_url(
            &self.wayback_base,
            "cdx/search/cdx",
            &[
                ("url", prefix.to_string()),
                ("matchType", "prefix".to_string()),
                ("from", start_year.to_string()),
                ("to", end_year.to_string()),
                ("output", "json".to_string()),
                ("fl", "original".to_string()),
                ("collapse", "urlkey".to_string()),
            ],
        )
    }

    /// Distinct archived URLs under `prefix`, filtered by `filter` if given.
    pub async fn urls(
        &self,
        prefix: &str,
        filter: Option<&Regex>,
        start_year: i32,
        end_year: i32,
    ) -> Result<Vec<String>, ArchiveError> {
        log::info!(target: LOG_TARGET, "searching for URLs under {prefix}");
        let request = self.search_url(prefix, start_year, end_year)?;
        let body = self.fetcher.fetch_json(&request).await?;
        let urls = parse_cdx(&request, body, filter)?;
        log::info!(target: LOG_TARGET, "found {} URLs under {prefix}", urls.len());
        Ok(urls)
    }
}

/// Extract the URL column of a CDX JSON table.
pub fn parse_cdx(
    request: &str,
    body: serde_json::Value,
    filter: Option<&Regex>,
) -> Result<Vec<String>, ArchiveError> {
    let rows: Vec<Vec<String>> =
        serde_json::from_value(body).map_err(|e| ArchiveError::UnexpectedShape {
            url: request.to_string(),
            message: e.to_string(),
        })?;

    let mut seen = HashSet::new();
    let urls = rows
        .into_iter()
        .skip(1)
        .filter_map(|row| row.into_iter().next())
        .filter(|url| filter.map_or(true, |re| re.is_match(url)))
        .filter(|url| seen.insert(url.clone()))
        .collect();

    Ok(urls)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::mock::MockFetcher;
    use serde_json::json;

    fn table() -> serde_json::Value {
        json!([
            ["original"],
            ["https://twitter.com/Guccifer_2/status/1"],
            ["https://twitter.com/Guccifer_2/media"],
            ["https://twitter.com/Guccifer_2/status/2"],
            ["https://twitter.com/Guccifer_2/status/1"]
        ])
    }

    #[test]
    fn header_row_is_skipped_and_duplicates_dropped() {
        let urls = parse_cdx("req", table(), None).unwrap();
        assert_eq!(
            urls,
            vec![
                "https://twitter.com/Guccifer_2/status/1",
                "https://twitter.com/Guccifer_2/media",
                "https://twitter.com/Guccifer_2/status/2",
            ]
        );
    }

    #[test]
    fn filter_uses_search_semantics() {
        let re = compile_match(r"/status/\d+$").unwrap();
        let urls = parse_cdx("req", table(), Some(&re)).unwrap();
        assert_eq!(urls.len(), 2);
        assert!(urls.iter().all(|u| u.contains("/status/")));
    }

    #[test]
    fn empty_result_is_empty() {
        assert!(parse_cdx("req", json!([]), None).unwrap().is_empty());
    }

    #[test]
    fn invalid_pattern_is_reported() {
        let err = compile_match("(unclosed").unwrap_err();
        assert!(matches!(err, ArchiveError::InvalidRegex { .. }));
        assert!(err.to_string().contains("(unclosed"));
    }

    #[test]
    fn search_url_carries_year_range() {
        let client = CdxClient::new(Arc::new(MockFetcher::new()), "https://web.archive.org");
        let url = client.search_url("https://twitter.com/Guccifer_2", 2016, 2018).unwrap();
        assert!(url.starts_with("https://web.archive.org/cdx/search/cdx?"));
        assert!(url.contains("matchType=prefix"));
        assert!(url.contains("from=2016"));
        assert!(url.contains("to=2018"));
    }

    #[tokio::test]
    async fn urls_fetches_and_filters() {
        let probe = CdxClient::new(Arc::new(MockFetcher::new()), "https://web.archive.org");
        let request = probe.search_url("https://twitter.com/Guccifer_2", 2016, 2018).unwrap();
        let mock = MockFetcher::new().respond(request, table());
        let client = CdxClient::new(Arc::new(mock), "https://web.archive.org");

        let re = compile_match(r"/status/\d+$").unwrap();
        let urls = client
            .urls("https://twitter.com/Guccifer_2", Some(&re), 2016, 2018)
            .await
            .unwrap();
        assert_eq!(urls.len(), 2);
    }
}
