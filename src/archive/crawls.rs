//! archive::crawls
//!
//! Capture enumeration over a year range.
//!
//! # Flow
//!
//! 1. In prefix mode, expand the URL into archived URLs via CDX search.
//! 2. For each URL and each year, fetch the calendar captures.
//! 3. If collapsing, replace each capture's collections with the deepest one.
//!
//! Requests are issued one at a time; the archive's APIs are rate sensitive.

use std::sync::Arc;

use regex::Regex;

use super::{ArchiveError, CalendarClient, CdxClient};
use crate::core::resolver::CollectionResolver;
use crate::core::types::CaptureRecord;
use crate::fetch::JsonFetcher;

const LOG_TARGET: &str = "waybackprov::crawls";

/// What to enumerate.
#[derive(Debug, Clone)]
pub struct CrawlOptions {
    /// First year, inclusive
    pub start_year: i32,
    /// Last year, inclusive
    pub end_year: i32,
    /// Report only the most specific collection per capture
    pub collapse: bool,
    /// Treat the URL as a prefix and expand it via CDX search
    pub prefix: bool,
    /// Keep only prefix-expanded URLs matching this pattern
    pub matching: Option<Regex>,
}

impl CrawlOptions {
    /// Options for a single year with no collapsing or prefix expansion.
    pub fn for_year(year: i32) -> Self {
        Self {
            start_year: year,
            end_year: year,
            collapse: false,
            prefix: false,
            matching: None,
        }
    }

    fn validate(&self) -> Result<(), ArchiveError> {
        if self.start_year > self.end_year {
            return Err(ArchiveError::InvalidYearRange {
                start: self.start_year,
                end: self.end_year,
            });
        }
        Ok(())
    }
}

/// Capture enumerator wiring the archive clients to a collection resolver.
#[derive(Debug)]
pub struct Crawls {
    calendar: CalendarClient,
    cdx: CdxClient,
    resolver: CollectionResolver,
}

impl Crawls {
    /// Build an enumerator sharing one fetcher across all endpoints.
    pub fn new(
        fetcher: Arc<dyn JsonFetcher>,
        wayback_base: impl Into<String>,
        metadata_base: impl Into<String>,
    ) -> Self {
        let wayback_base = wayback_base.into();
        Self {
            calendar: CalendarClient::new(Arc::clone(&fetcher), wayback_base.clone()),
            cdx: CdxClient::new(Arc::clone(&fetcher), wayback_base),
            resolver: CollectionResolver::new(fetcher, metadata_base),
        }
    }

    /// The resolver used for collapsing.
    pub fn resolver(&self) -> &CollectionResolver {
        &self.resolver
    }

    /// Enumerate captures of `url` according to `options`.
    ///
    /// # Errors
    ///
    /// Returns `ArchiveError::InvalidYearRange` for an empty range, and
    /// propagates fetch, parse, and resolution errors.
    pub async fn collect(
        &mut self,
        url: &str,
        options: &CrawlOptions,
    ) -> Result<Vec<CaptureRecord>, ArchiveError> {
        options.validate()?;

        let urls = if options.prefix {
            self.cdx
                .urls(url, options.matching.as_ref(), options.start_year, options.end_year)
                .await?
        } else {
            vec![url.to_string()]
        };

        let mut records = Vec::new();
        for target in &urls {
            for year in options.start_year..=options.end_year {
                let mut captures = self.calendar.captures(target, year).await?;
                if options.collapse {
                    self.collapse(&mut captures).await?;
                }
                records.append(&mut captures);
            }
        }

        log::info!(target: LOG_TARGET, "collected {} captures for {url}", records.len());
        Ok(records)
    }

    /// Replace each record's collections with the deepest one.
    ///
    /// Records without collections are left untouched.
    pub async fn collapse(&mut self, records: &mut [CaptureRecord]) -> Result<(), ArchiveError> {
        for record in records.iter_mut().filter(|r| !r.collections.is_empty()) {
            let deepest = self.resolver.deepest(&record.collections).await?;
            record.collections = vec![deepest];
        }
        Ok(())
    }
}
