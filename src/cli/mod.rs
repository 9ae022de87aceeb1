//! cli
//!
//! Command-line interface layer.
//!
//! # Responsibilities
//!
//! - Parse command-line arguments
//! - Configure logging
//! - Load configuration and wire the fetcher, archive clients, and renderer
//!
//! The layer is thin: all archive access goes through [`crate::archive`] and
//! all output through [`crate::report`].

pub mod args;

pub use args::{Cli, LogLevel};

use std::fs::File;
use std::io::Write;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::Datelike;

use crate::archive::cdx::compile_match;
use crate::archive::{CrawlOptions, Crawls};
use crate::core::config::Config;
use crate::fetch::{HttpFetcher, JsonFetcher, RetryingFetcher};
use crate::report;

/// Run the CLI application.
///
/// This is the main entry point called from `main.rs`.
pub async fn run() -> Result<()> {
    let cli = Cli::parse_args();
    init_logging(cli.log_level, cli.log_file.as_deref())?;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    execute(&cli, &mut out).await
}

/// Execute a parsed command line, writing the report to `out`.
pub async fn execute<W: Write>(cli: &Cli, out: &mut W) -> Result<()> {
    // Compile the pattern before any network access so a typo fails fast.
    let matching = cli.matching.as_deref().map(compile_match).transpose()?;

    let config = Config::load(cli.config.as_deref()).context("failed to load configuration")?;
    if let Some(path) = config.loaded_from() {
        log::info!("using config {}", path.display());
    }

    let current_year = chrono::Local::now().year();
    let options = CrawlOptions {
        start_year: cli.start_year(current_year),
        end_year: cli.end_year(current_year),
        collapse: cli.collapse,
        prefix: cli.prefix,
        matching,
    };

    let http = HttpFetcher::with_timeout(config.request_timeout())
        .context("failed to build HTTP client")?;
    let fetcher: Arc<dyn JsonFetcher> =
        Arc::new(RetryingFetcher::new(Arc::new(http), config.retry_policy()));

    let mut crawls = Crawls::new(fetcher, config.wayback_base(), config.metadata_base());
    let records = crawls
        .collect(&cli.url, &options)
        .await
        .with_context(|| format!("failed to collect captures for {}", cli.url))?;

    report::render(cli.format, &records, config.details_base(), out)?;
    out.flush()?;
    Ok(())
}

/// Initialize the logger.
///
/// `RUST_LOG` overrides `level`. With `log_file`, output goes to that file
/// instead of stderr.
fn init_logging(level: LogLevel, log_file: Option<&Path>) -> Result<()> {
    let env = env_logger::Env::default().filter_or("RUST_LOG", level.as_filter());
    let mut builder = env_logger::Builder::from_env(env);
    builder
        .format_module_path(false)
        .format_target(matches!(level, LogLevel::Debug | LogLevel::Trace));

    if let Some(path) = log_file {
        let file = File::create(path)
            .with_context(|| format!("failed to open log file {}", path.display()))?;
        builder.target(env_logger::Target::Pipe(Box::new(file)));
    } else {
        builder.format_timestamp(None);
    }

    builder.init();
    Ok(())
}
