//! report::json
//!
//! The records as a pretty-printed JSON array, one object per capture.

use std::io::Write;

use super::ReportError;
use crate::core::types::CaptureRecord;

/// Write the records as a pretty-printed JSON array.
pub fn generate<W: Write>(records: &[CaptureRecord], writer: &mut W) -> Result<(), ReportError> {
    serde_json::to_writer_pretty(&mut *writer, records)?;
    writeln!(writer)?;
    Ok(())
}
