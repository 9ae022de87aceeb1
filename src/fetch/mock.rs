//! fetch::mock
//!
//! In-memory fetcher and sleeper for deterministic testing.
//!
//! # Design
//!
//! [`MockFetcher`] serves canned JSON documents keyed by URL, can be told to
//! fail a URL a fixed number of times before answering, and records every
//! request so tests can assert how often the network would have been hit.
//! [`RecordingSleeper`] returns immediately and remembers each requested
//! duration.
//!
//! # Example
//!
//! ```
//! use waybackprov::fetch::mock::MockFetcher;
//! use waybackprov::fetch::JsonFetcher;
//! use serde_json::json;
//!
//! # tokio_test::block_on(async {
//! let fetcher = MockFetcher::new()
//!     .respond("https://archive.org/metadata/web", json!({"metadata": {"title": "Web"}}))
//!     .fail_times("https://archive.org/metadata/web", 1);
//!
//! assert!(fetcher.fetch_json("https://archive.org/metadata/web").await.is_err());
//! let value = fetcher.fetch_json("https://archive.org/metadata/web").await.unwrap();
//! assert_eq!(value["metadata"]["title"], "Web");
//! assert_eq!(fetcher.request_count("https://archive.org/metadata/web"), 2);
//! # });
//! ```

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use super::traits::{FetchError, JsonFetcher, Sleeper};

/// Mock fetcher for testing.
///
/// Thread-safe via internal `Arc<Mutex<...>>` wrapping; clones share state.
#[derive(Debug, Clone, Default)]
pub struct MockFetcher {
    inner: Arc<Mutex<MockFetcherInner>>,
}

#[derive(Debug, Default)]
struct MockFetcherInner {
    /// Canned documents by URL.
    responses: HashMap<String, serde_json::Value>,
    /// Remaining forced failures by URL.
    failures: HashMap<String, u32>,
    /// Every requested URL, in order.
    requests: Vec<String>,
}

impl MockFetcher {
    /// Create a mock with no canned responses.
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `value` for `url` on every successful request.
    pub fn respond(self, url: impl Into<String>, value: serde_json::Value) -> Self {
        {
            let mut inner = self.inner.lock().unwrap();
            inner.responses.insert(url.into(), value);
        }
        self
    }

    /// Fail the next `times` requests for `url` with a transient error.
    pub fn fail_times(self, url: impl Into<String>, times: u32) -> Self {
        {
            let mut inner = self.inner.lock().unwrap();
            inner.failures.insert(url.into(), times);
        }
        self
    }

    /// All recorded requests, in order.
    pub fn requests(&self) -> Vec<String> {
        self.inner.lock().unwrap().requests.clone()
    }

    /// Number of requests made for `url`.
    pub fn request_count(&self, url: &str) -> usize {
        self.inner
            .lock()
            .unwrap()
            .requests
            .iter()
            .filter(|r| r.as_str() == url)
            .count()
    }
}

#[async_trait]
impl JsonFetcher for MockFetcher {
    async fn fetch_json(&self, url: &str) -> Result<serde_json::Value, FetchError> {
        let mut inner = self.inner.lock().unwrap();
        inner.requests.push(url.to_string());

        if let Some(remaining) = inner.failures.get_mut(url) {
            if *remaining > 0 {
                *remaining -= 1;
                return Err(FetchError::transient(url, "HTTP status 503 Service Unavailable"));
            }
        }

        inner
            .responses
            .get(url)
            .cloned()
            .ok_or_else(|| FetchError::transient(url, "HTTP status 404 Not Found"))
    }
}

/// Sleeper that records durations instead of waiting.
#[derive(Debug, Clone, Default)]
pub struct RecordingSleeper {
    sleeps: Arc<Mutex<Vec<Duration>>>,
}

impl RecordingSleeper {
    /// Create a sleeper with an empty record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Durations requested so far, in order.
    pub fn sleeps(&self) -> Vec<Duration> {
        self.sleeps.lock().unwrap().clone()
    }
}

#[async_trait]
impl Sleeper for RecordingSleeper {
    async fn sleep(&self, duration: Duration) {
        self.sleeps.lock().unwrap().push(duration);
    }
}
