//! report
//!
//! Renderers for capture records.
//!
//! # Formats
//!
//! - [`OutputFormat::Text`] - capture counts per collection, most common first
//! - [`OutputFormat::Json`] - the records as a pretty-printed JSON array
//! - [`OutputFormat::Csv`] - one row per record
//!
//! Renderers write to any [`std::io::Write`], so tests render into a buffer.

pub mod csv;
pub mod json;
pub mod text;

use std::io::Write;

use clap::ValueEnum;
use thiserror::Error;

use crate::core::types::CaptureRecord;

/// Errors from rendering.
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("failed to write report: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to serialize JSON report: {0}")]
    Json(#[from] serde_json::Error),

    #[error("failed to write CSV report: {0}")]
    Csv(#[from] ::csv::Error),
}

/// Report output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Capture counts per collection
    #[default]
    Text,
    /// Raw records as JSON
    Json,
    /// Raw records as CSV
    Csv,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Csv => write!(f, "csv"),
        }
    }
}

/// Render `records` in `format`.
///
/// `details_base` is the collection page prefix used by the text report.
pub fn render<W: Write>(
    format: OutputFormat,
    records: &[CaptureRecord],
    details_base: &str,
    writer: &mut W,
) -> Result<(), ReportError> {
    match format {
        OutputFormat::Text => text::generate(records, details_base, writer),
        OutputFormat::Json => json::generate(records, writer),
        OutputFormat::Csv => csv::generate(records, writer),
    }
}
