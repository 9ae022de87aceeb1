//! cli::args
//!
//! Command-line argument definitions using clap derive.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::report::OutputFormat;

/// Report which web archive collections captured a URL.
#[derive(Parser, Debug)]
#[command(name = "waybackprov")]
#[command(author, version, about, long_about = None)]
#[command(after_help = "\
Collections can contain other collections: edgi_monitor, for example, is part of
focused_crawls. With --collapse only the most specific collection is reported for
each capture. This requires collection metadata lookups, which are slow.

EXAMPLES:
    waybackprov https://twitter.com/EPAScottPruitt
    waybackprov --start 2016 --end 2018 --collapse https://www.epa.gov/
    waybackprov --prefix --match '/status/\\d+$' --format csv https://twitter.com/Guccifer_2")]
pub struct Cli {
    /// URL to look up (a URL prefix with --prefix)
    pub url: String,

    /// First year to report [default: current year]
    #[arg(long, value_name = "YEAR")]
    pub start: Option<i32>,

    /// Last year to report [default: current year]
    #[arg(long, value_name = "YEAR")]
    pub end: Option<i32>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Only report the most specific collection of each capture
    #[arg(long)]
    pub collapse: bool,

    /// Look up every archived URL under the given prefix
    #[arg(long)]
    pub prefix: bool,

    /// Keep only prefix URLs matching this regular expression
    #[arg(long = "match", value_name = "REGEX", requires = "prefix")]
    pub matching: Option<String>,

    /// Configuration file to use instead of the default locations
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Log level (RUST_LOG takes precedence)
    #[arg(long, value_enum, default_value_t = LogLevel::Warn)]
    pub log_level: LogLevel,

    /// Write log output to this file instead of stderr
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

impl Cli {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Parser::parse()
    }

    /// First year, falling back to `current_year`.
    pub fn start_year(&self, current_year: i32) -> i32 {
        self.start.unwrap_or(current_year)
    }

    /// Last year, falling back to `current_year`.
    pub fn end_year(&self, current_year: i32) -> i32 {
        self.end.unwrap_or(current_year)
    }
}

/// Logging verbosity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    /// No logging output
    Off,
    /// Only error messages
    Error,
    /// Warning and error messages
    Warn,
    /// Info, warning, and error messages
    Info,
    /// Debug and above
    Debug,
    /// Everything
    Trace,
}

impl LogLevel {
    /// Filter string understood by `env_logger`.
    pub fn as_filter(self) -> &'static str {
        match self {
            LogLevel::Off => "off",
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_filter())
    }
}
