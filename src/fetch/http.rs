//! fetch::http
//!
//! Single-attempt JSON fetcher over HTTP.
//!
//! Every failure is reported as [`FetchError::Transient`]; deciding whether to
//! try again belongs to [`RetryingFetcher`](super::retry::RetryingFetcher).

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, USER_AGENT};
use reqwest::Client;

use super::traits::{FetchError, JsonFetcher};

const LOG_TARGET: &str = "waybackprov::fetch";

/// User-Agent header value for API requests.
const USER_AGENT_VALUE: &str = concat!("waybackprov/", env!("CARGO_PKG_VERSION"));

/// Default per-request timeout.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// JSON fetcher performing exactly one HTTP GET per call.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    /// HTTP client for making requests
    client: Client,
}

impl HttpFetcher {
    /// Create a fetcher with the default request timeout.
    pub fn new() -> Result<Self, FetchError> {
        Self::with_timeout(DEFAULT_REQUEST_TIMEOUT)
    }

    /// Create a fetcher whose requests time out after `timeout`.
    pub fn with_timeout(timeout: Duration) -> Result<Self, FetchError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(USER_AGENT, HeaderValue::from_static(USER_AGENT_VALUE));

        let client = Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()
            .map_err(|e| FetchError::transient("<client>", e))?;

        Ok(Self { client })
    }
}

#[async_trait]
impl JsonFetcher for HttpFetcher {
    async fn fetch_json(&self, url: &str) -> Result<serde_json::Value, FetchError> {
        log::debug!(target: LOG_TARGET, "GET {url}");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| FetchError::transient(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::transient(url, format!("HTTP status {status}")));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| FetchError::transient(url, e))?;

        serde_json::from_slice(&body)
            .map_err(|e| FetchError::transient(url, format!("invalid JSON body: {e}")))
    }
}
