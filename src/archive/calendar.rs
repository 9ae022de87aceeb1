//! archive::calendar
//!
//! Capture events behind the Wayback Machine's calendar view.
//!
//! # Response layout
//!
//! The endpoint returns the data as the calendar is drawn: a list of months,
//! each a list of weeks, each a list of seven days. Days outside the month or
//! without captures are `null` or `{}`. A day with captures holds parallel
//! arrays:
//!
//! - `st` - HTTP status of each capture
//! - `ts` - 14-digit timestamp of each capture
//! - `why` - collections responsible for each capture
//!
//! The `cnt` field is not a reliable count and is ignored; index `i` of the
//! parallel arrays is one capture.

use std::sync::Arc;

use serde::Deserialize;

use super::{endpoint_url, ArchiveError};
use crate::core::types::{CaptureRecord, CollectionId};
use crate::fetch::JsonFetcher;

const LOG_TARGET: &str = "waybackprov::calendar";

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct CalendarDay {
    st: Vec<u16>,
    ts: Vec<u64>,
    why: Vec<Option<Vec<String>>>,
}

type CalendarYear = Vec<Vec<Vec<Option<CalendarDay>>>>;

/// Client for the calendar captures endpoint.
#[derive(Debug, Clone)]
pub struct CalendarClient {
    fetcher: Arc<dyn JsonFetcher>,
    wayback_base: String,
}

impl CalendarClient {
    /// Create a client against `wayback_base` (e.g. `https://web.archive.org`).
    pub fn new(fetcher: Arc<dyn JsonFetcher>, wayback_base: impl Into<String>) -> Self {
        Self {
            fetcher,
            wayback_base: wayback_base.into(),
        }
    }

    /// Calendar endpoint URL for `url` in `year`.
    pub fn calendar_url(&self, url: &str, year: i32) -> Result<String, ArchiveError> {
        endpoint_url(
            &self.wayback_base,
            "__wb/calendarcaptures",
            &[("url", url.to_string()), ("selected_year", year.to_string())],
        )
    }

    /// All captures of `url` during `year`, in calendar order.
    pub async fn captures(&self, url: &str, year: i32) -> Result<Vec<CaptureRecord>, ArchiveError> {
        log::info!(target: LOG_TARGET, "getting calendar for {url} in {year}");
        let request = self.calendar_url(url, year)?;
        let body = self.fetcher.fetch_json(&request).await?;
        parse_calendar(&request, &self.wayback_base, url, body)
    }
}

/// Flatten a calendar response into capture records for `original`.
pub fn parse_calendar(
    request: &str,
    wayback_base: &str,
    original: &str,
    body: serde_json::Value,
) -> Result<Vec<CaptureRecord>, ArchiveError> {
    let calendar: CalendarYear =
        serde_json::from_value(body).map_err(|e| ArchiveError::UnexpectedShape {
            url: request.to_string(),
            message: e.to_string(),
        })?;

    let mut records = Vec::new();
    for day in calendar.into_iter().flatten().flatten().flatten() {
        let count = day.st.len().min(day.ts.len()).min(day.why.len());
        if count != day.st.len() || count != day.ts.len() || count != day.why.len() {
            log::warn!(target: LOG_TARGET, "uneven capture arrays in {request}, keeping {count}");
        }

        let captures = day.st.into_iter().zip(day.ts).zip(day.why).take(count);
        for ((status, timestamp), why) in captures {
            let collections = why
                .unwrap_or_default()
                .into_iter()
                .filter_map(|id| match CollectionId::new(id) {
                    Ok(id) => Some(id),
                    Err(e) => {
                        log::warn!(target: LOG_TARGET, "ignoring collection of capture {timestamp}: {e}");
                        None
                    }
                })
                .collect();
            records.push(CaptureRecord {
                timestamp,
                status,
                collections,
                url: CaptureRecord::replay_url(wayback_base, timestamp, original),
            });
        }
    }

    Ok(records)
}
