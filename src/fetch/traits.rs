//! fetch::traits
//!
//! Seams for the JSON fetch layer.
//!
//! # Design
//!
//! Fetching is async because it involves network I/O. Two traits are
//! defined here:
//!
//! - [`JsonFetcher`] - fetch one URL and parse its body as JSON
//! - [`Sleeper`] - wait between retry attempts
//!
//! Splitting the sleep out lets tests observe the backoff schedule without
//! actually waiting. The retry policy itself lives in
//! [`RetryingFetcher`](super::retry::RetryingFetcher), which wraps any
//! `JsonFetcher`.

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

/// Errors from fetch operations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FetchError {
    /// A single attempt failed (network error, bad status, body not JSON).
    ///
    /// Recovered locally by [`RetryingFetcher`](super::retry::RetryingFetcher).
    #[error("request to {url} failed: {reason}")]
    Transient {
        /// URL that was requested
        url: String,
        /// What went wrong on this attempt
        reason: String,
    },

    /// Every allowed attempt failed.
    #[error("giving up on {url} after {attempts} attempts: {last_error}")]
    Exhausted {
        /// URL that was requested
        url: String,
        /// Number of attempts made
        attempts: u32,
        /// Failure reason of the final attempt
        last_error: String,
    },

    /// The overall deadline would be exceeded by waiting for another attempt.
    #[error("deadline of {deadline:?} exceeded fetching {url} after {attempts} attempts")]
    DeadlineExceeded {
        /// URL that was requested
        url: String,
        /// Number of attempts made
        attempts: u32,
        /// The configured deadline
        deadline: Duration,
    },
}

impl FetchError {
    /// Build a transient error for one failed attempt.
    pub fn transient(url: impl Into<String>, reason: impl ToString) -> Self {
        FetchError::Transient {
            url: url.into(),
            reason: reason.to_string(),
        }
    }

    /// Whether another attempt might succeed.
    pub fn is_transient(&self) -> bool {
        matches!(self, FetchError::Transient { .. })
    }
}

/// Fetch a URL and parse the response body as JSON.
#[async_trait]
pub trait JsonFetcher: Send + Sync + std::fmt::Debug {
    /// Fetch `url` and return the parsed body.
    async fn fetch_json(&self, url: &str) -> Result<serde_json::Value, FetchError>;
}

/// Wait for a duration between retry attempts.
#[async_trait]
pub trait Sleeper: Send + Sync + std::fmt::Debug {
    /// Suspend the caller for `duration`.
    async fn sleep(&self, duration: Duration);
}

/// Sleeper backed by the tokio timer.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioSleeper;

#[async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_transient_errors_are_transient() {
        assert!(FetchError::transient("http://x", "boom").is_transient());
        assert!(!FetchError::Exhausted {
            url: "http://x".into(),
            attempts: 10,
            last_error: "boom".into(),
        }
        .is_transient());
    }

    #[test]
    fn exhausted_message_names_url_and_attempts() {
        let err = FetchError::Exhausted {
            url: "https://archive.org/metadata/web".into(),
            attempts: 3,
            last_error: "status 503".into(),
        };
        assert_eq!(
            err.to_string(),
            "giving up on https://archive.org/metadata/web after 3 attempts: status 503"
        );
    }
}
