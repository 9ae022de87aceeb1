//! core::config
//!
//! Configuration schema and loading.
//!
//! # Precedence
//!
//! Configuration values are resolved in this order (later overrides earlier):
//! 1. Default values
//! 2. Config file
//! 3. CLI flags (not handled here)
//!
//! # Config Locations
//!
//! The first existing file wins:
//! 1. The path passed with `--config` (must exist)
//! 2. `$WAYBACKPROV_CONFIG` if set
//! 3. `$XDG_CONFIG_HOME/waybackprov/config.toml`
//! 4. `~/.waybackprov/config.toml`
//!
//! # Example
//!
//! ```no_run
//! use waybackprov::core::config::Config;
//!
//! let config = Config::load(None).unwrap();
//! println!("Wayback: {}", config.wayback_base());
//! println!("Attempts: {}", config.retry_policy().max_attempts);
//! ```

pub mod schema;

pub use schema::{ArchiveConfig, FileConfig, RetryConfig};

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use thiserror::Error;

use crate::archive::{DEFAULT_DETAILS_BASE, DEFAULT_METADATA_BASE, DEFAULT_WAYBACK_BASE};
use crate::fetch::http::DEFAULT_REQUEST_TIMEOUT;
use crate::fetch::RetryPolicy;

const LOG_TARGET: &str = "waybackprov::config";

/// Errors from configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file '{path}': {message}")]
    ParseError { path: PathBuf, message: String },

    #[error("invalid config value: {0}")]
    InvalidValue(String),
}

/// Loaded configuration with defaults applied through accessors.
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Parsed file contents
    pub file: FileConfig,
    /// Path the file was loaded from (if any)
    path: Option<PathBuf>,
}

impl Config {
    /// Load configuration.
    ///
    /// An explicit path must exist. Without one, the standard locations are
    /// searched and a missing file means defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if a config file cannot be read, parsed, or validated.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = explicit {
            return Self::load_from(path);
        }

        match Self::discover() {
            Some(path) => Self::load_from(&path),
            None => {
                log::debug!(target: LOG_TARGET, "no config file found, using defaults");
                Ok(Self::default())
            }
        }
    }

    /// Load and validate a specific config file.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;

        let file: FileConfig = toml::from_str(&contents).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        file.validate()?;

        log::debug!(target: LOG_TARGET, "loaded config from {}", path.display());
        Ok(Self {
            file,
            path: Some(path.to_path_buf()),
        })
    }

    fn discover() -> Option<PathBuf> {
        Self::discover_in(
            std::env::var_os("WAYBACKPROV_CONFIG").map(PathBuf::from),
            std::env::var_os("XDG_CONFIG_HOME").map(PathBuf::from),
            dirs::home_dir(),
        )
    }

    /// First existing config file among the standard locations.
    fn discover_in(
        env_path: Option<PathBuf>,
        xdg_home: Option<PathBuf>,
        home: Option<PathBuf>,
    ) -> Option<PathBuf> {
        let candidates = [
            env_path,
            xdg_home.map(|dir| dir.join("waybackprov/config.toml")),
            home.map(|dir| dir.join(".waybackprov/config.toml")),
        ];
        candidates.into_iter().flatten().find(|path| path.exists())
    }

    /// Path the configuration was loaded from.
    pub fn loaded_from(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    fn archive(&self) -> Option<&ArchiveConfig> {
        self.file.archive.as_ref()
    }

    fn retry(&self) -> Option<&RetryConfig> {
        self.file.retry.as_ref()
    }

    /// Wayback Machine base URL.
    pub fn wayback_base(&self) -> &str {
        self.archive()
            .and_then(|a| a.wayback_base.as_deref())
            .unwrap_or(DEFAULT_WAYBACK_BASE)
    }

    /// Metadata API base URL.
    pub fn metadata_base(&self) -> &str {
        self.archive()
            .and_then(|a| a.metadata_base.as_deref())
            .unwrap_or(DEFAULT_METADATA_BASE)
    }

    /// Collection details page base URL.
    pub fn details_base(&self) -> &str {
        self.archive()
            .and_then(|a| a.details_base.as_deref())
            .unwrap_or(DEFAULT_DETAILS_BASE)
    }

    /// Retry policy for all archive requests.
    pub fn retry_policy(&self) -> RetryPolicy {
        let defaults = RetryPolicy::default();
        let Some(retry) = self.retry() else {
            return defaults;
        };

        RetryPolicy {
            max_attempts: retry.max_attempts.unwrap_or(defaults.max_attempts),
            backoff_step: retry
                .backoff_step_secs
                .map(Duration::from_secs)
                .unwrap_or(defaults.backoff_step),
            deadline: retry.deadline_secs.map(Duration::from_secs),
        }
    }

    /// Timeout of a single HTTP request.
    pub fn request_timeout(&self) -> Duration {
        self.retry()
            .and_then(|r| r.request_timeout_secs)
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_REQUEST_TIMEOUT)
    }
}
