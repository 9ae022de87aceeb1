//! fetch
//!
//! Resilient JSON fetching.
//!
//! # Layers
//!
//! - [`HttpFetcher`] performs one HTTP GET and parses the body as JSON
//! - [`RetryingFetcher`] retries transient failures with linear backoff and a
//!   hard attempt ceiling
//! - [`mock`] provides in-memory implementations for tests
//!
//! Callers depend on the [`JsonFetcher`] trait, so the archive clients and the
//! collection resolver never know whether they talk to the network.

pub mod http;
pub mod mock;
pub mod retry;
pub mod traits;

pub use http::HttpFetcher;
pub use retry::{RetryPolicy, RetryingFetcher};
pub use traits::{FetchError, JsonFetcher, Sleeper, TokioSleeper};
