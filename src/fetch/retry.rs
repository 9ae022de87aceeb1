//! fetch::retry
//!
//! Bounded retry with linear backoff around any [`JsonFetcher`].
//!
//! # Policy
//!
//! Attempt `n` (starting at 1) that fails is followed by a sleep of
//! `n * backoff_step` before attempt `n + 1`. After `max_attempts` failed
//! attempts the fetcher gives up with [`FetchError::Exhausted`]. No sleep
//! follows the final attempt.
//!
//! An optional overall deadline bounds the total time spent: if the next
//! sleep would exceed it, [`FetchError::DeadlineExceeded`] is returned
//! instead of waiting.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use waybackprov::fetch::{HttpFetcher, JsonFetcher, RetryPolicy, RetryingFetcher};
//!
//! # tokio_test::block_on(async {
//! let fetcher = RetryingFetcher::new(Arc::new(HttpFetcher::new()?), RetryPolicy::default());
//! let value = fetcher.fetch_json("https://archive.org/metadata/web").await?;
//! println!("{}", value["metadata"]["title"]);
//! # Ok::<(), waybackprov::fetch::FetchError>(())
//! # });
//! ```

use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;

use super::traits::{FetchError, JsonFetcher, Sleeper, TokioSleeper};

const LOG_TARGET: &str = "waybackprov::fetch";

/// Default number of attempts before giving up.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 10;

/// Default backoff step; attempt `n` waits `n` steps.
pub const DEFAULT_BACKOFF_STEP: Duration = Duration::from_secs(10);

/// How many times to try and how long to wait in between.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first one. Values below 1 behave as 1.
    pub max_attempts: u32,
    /// Backoff unit; the sleep after failed attempt `n` is `n * backoff_step`.
    pub backoff_step: Duration,
    /// Upper bound on total time spent across attempts and sleeps.
    pub deadline: Option<Duration>,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            backoff_step: DEFAULT_BACKOFF_STEP,
            deadline: None,
        }
    }
}

impl RetryPolicy {
    /// Sleep duration after failed attempt number `attempt`.
    pub fn delay_after(&self, attempt: u32) -> Duration {
        self.backoff_step.saturating_mul(attempt)
    }
}

/// Decorator adding the retry policy to an inner fetcher.
#[derive(Debug, Clone)]
pub struct RetryingFetcher {
    inner: Arc<dyn JsonFetcher>,
    sleeper: Arc<dyn Sleeper>,
    policy: RetryPolicy,
}

impl RetryingFetcher {
    /// Wrap `inner`, sleeping on the tokio timer.
    pub fn new(inner: Arc<dyn JsonFetcher>, policy: RetryPolicy) -> Self {
        Self::with_sleeper(inner, policy, Arc::new(TokioSleeper))
    }

    /// Wrap `inner` with a custom sleeper.
    pub fn with_sleeper(
        inner: Arc<dyn JsonFetcher>,
        policy: RetryPolicy,
        sleeper: Arc<dyn Sleeper>,
    ) -> Self {
        Self {
            inner,
            sleeper,
            policy,
        }
    }
}

#[async_trait]
impl JsonFetcher for RetryingFetcher {
    async fn fetch_json(&self, url: &str) -> Result<serde_json::Value, FetchError> {
        let max_attempts = self.policy.max_attempts.max(1);
        let started = Instant::now();
        let mut slept = Duration::ZERO;
        let mut last_error = String::new();

        for attempt in 1..=max_attempts {
            let reason = match self.inner.fetch_json(url).await {
                Ok(value) => return Ok(value),
                Err(FetchError::Transient { reason, .. }) => reason,
                Err(other) => return Err(other),
            };
            log::error!(target: LOG_TARGET, "attempt {attempt} for {url} failed: {reason}");
            last_error = reason;

            if attempt == max_attempts {
                break;
            }

            let delay = self.policy.delay_after(attempt);
            if let Some(deadline) = self.policy.deadline {
                let spent = started.elapsed().max(slept);
                if spent.saturating_add(delay) > deadline {
                    log::error!(target: LOG_TARGET, "deadline of {deadline:?} reached for {url}");
                    return Err(FetchError::DeadlineExceeded {
                        url: url.to_string(),
                        attempts: attempt,
                        deadline,
                    });
                }
            }

            log::info!(target: LOG_TARGET, "sleeping for {} seconds", delay.as_secs_f64());
            self.sleeper.sleep(delay).await;
            slept = slept.saturating_add(delay);
        }

        log::error!(target: LOG_TARGET, "giving up on fetching JSON from {url}");
        Err(FetchError::Exhausted {
            url: url.to_string(),
            attempts: max_attempts,
            last_error,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::mock::{MockFetcher, RecordingSleeper};
    use serde_json::json;

    const URL: &str = "https://archive.org/metadata/web";

    fn retrying(mock: &MockFetcher, sleeper: &RecordingSleeper, policy: RetryPolicy) -> RetryingFetcher {
        RetryingFetcher::with_sleeper(Arc::new(mock.clone()), policy, Arc::new(sleeper.clone()))
    }

    #[test]
    fn delay_grows_linearly() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.delay_after(1), Duration::from_secs(10));
        assert_eq!(policy.delay_after(2), Duration::from_secs(20));
        assert_eq!(policy.delay_after(9), Duration::from_secs(90));
    }

    #[tokio::test]
    async fn first_success_does_not_sleep() {
        let mock = MockFetcher::new().respond(URL, json!({"ok": true}));
        let sleeper = RecordingSleeper::new();

        let value = retrying(&mock, &sleeper, RetryPolicy::default())
            .fetch_json(URL)
            .await
            .unwrap();

        assert_eq!(value, json!({"ok": true}));
        assert!(sleeper.sleeps().is_empty());
        assert_eq!(mock.request_count(URL), 1);
    }

    #[tokio::test]
    async fn recovers_after_two_failures_with_increasing_sleeps() {
        let mock = MockFetcher::new()
            .respond(URL, json!({"metadata": {}}))
            .fail_times(URL, 2);
        let sleeper = RecordingSleeper::new();

        let value = retrying(&mock, &sleeper, RetryPolicy::default())
            .fetch_json(URL)
            .await
            .unwrap();

        assert_eq!(value, json!({"metadata": {}}));
        assert_eq!(
            sleeper.sleeps(),
            vec![Duration::from_secs(10), Duration::from_secs(20)]
        );
        assert_eq!(mock.request_count(URL), 3);
    }

    #[tokio::test]
    async fn gives_up_after_max_attempts() {
        let mock = MockFetcher::new();
        let sleeper = RecordingSleeper::new();
        let policy = RetryPolicy {
            max_attempts: 4,
            ..RetryPolicy::default()
        };

        let err = retrying(&mock, &sleeper, policy)
            .fetch_json(URL)
            .await
            .unwrap_err();

        match err {
            FetchError::Exhausted { url, attempts, .. } => {
                assert_eq!(url, URL);
                assert_eq!(attempts, 4);
            }
            other => panic!("expected Exhausted, got {other:?}"),
        }
        assert_eq!(mock.request_count(URL), 4);
        assert_eq!(sleeper.sleeps().len(), 3);
    }

    #[tokio::test]
    async fn deadline_stops_before_oversleeping() {
        let mock = MockFetcher::new();
        let sleeper = RecordingSleeper::new();
        let policy = RetryPolicy {
            deadline: Some(Duration::from_secs(25)),
            ..RetryPolicy::default()
        };

        let err = retrying(&mock, &sleeper, policy)
            .fetch_json(URL)
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            FetchError::DeadlineExceeded { attempts: 2, .. }
        ));
        assert_eq!(sleeper.sleeps(), vec![Duration::from_secs(10)]);
    }

    #[tokio::test]
    async fn zero_attempts_still_tries_once() {
        let mock = MockFetcher::new().respond(URL, json!([]));
        let sleeper = RecordingSleeper::new();
        let policy = RetryPolicy {
            max_attempts: 0,
            ..RetryPolicy::default()
        };

        let value = retrying(&mock, &sleeper, policy).fetch_json(URL).await.unwrap();
        assert_eq!(value, json!([]));
    }
}
