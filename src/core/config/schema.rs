//! core::config::schema
//!
//! Configuration schema types.
//!
//! # Example
//!
//! ```toml
//! [archive]
//! wayback_base = "https://web.archive.org"
//! metadata_base = "https://archive.org/metadata"
//! details_base = "https://archive.org/details"
//!
//! [retry]
//! max_attempts = 10
//! backoff_step_secs = 10
//! request_timeout_secs = 60
//! deadline_secs = 900
//! ```
//!
//! # Validation
//!
//! Values are validated after parsing: endpoints must be absolute http(s)
//! URLs and the retry policy must allow at least one attempt.

use serde::{Deserialize, Serialize};

use super::ConfigError;

/// Configuration file contents.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    /// Endpoint overrides
    pub archive: Option<ArchiveConfig>,

    /// Retry policy overrides
    pub retry: Option<RetryConfig>,
}

impl FileConfig {
    /// Validate the configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if any value is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(archive) = &self.archive {
            for (name, value) in [
                ("archive.wayback_base", &archive.wayback_base),
                ("archive.metadata_base", &archive.metadata_base),
                ("archive.details_base", &archive.details_base),
            ] {
                if let Some(url) = value {
                    validate_base_url(name, url)?;
                }
            }
        }

        if let Some(retry) = &self.retry {
            if retry.max_attempts == Some(0) {
                return Err(ConfigError::InvalidValue(
                    "retry.max_attempts must be at least 1".into(),
                ));
            }
            if retry.request_timeout_secs == Some(0) {
                return Err(ConfigError::InvalidValue(
                    "retry.request_timeout_secs must be at least 1".into(),
                ));
            }
        }

        Ok(())
    }
}

fn validate_base_url(name: &str, url: &str) -> Result<(), ConfigError> {
    let parsed = reqwest::Url::parse(url)
        .map_err(|e| ConfigError::InvalidValue(format!("{name} '{url}' is not a URL: {e}")))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidValue(format!(
            "{name} '{url}' must use http or https"
        )));
    }
    Ok(())
}

/// Archive endpoint settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct ArchiveConfig {
    /// Wayback Machine base (calendar, CDX, replay URLs)
    pub wayback_base: Option<String>,

    /// Metadata API base; the collection identifier is appended
    pub metadata_base: Option<String>,

    /// Collection page base used in the text report
    pub details_base: Option<String>,
}

/// Retry policy settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct RetryConfig {
    /// Total attempts per request
    pub max_attempts: Option<u32>,

    /// Backoff unit in seconds; attempt n waits n units
    pub backoff_step_secs: Option<u64>,

    /// Timeout of a single HTTP request
    pub request_timeout_secs: Option<u64>,

    /// Overall budget for one request including retries
    pub deadline_secs: Option<u64>,
}
