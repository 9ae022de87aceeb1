//! report::text
//!
//! Aggregate capture counts per collection.
//!
//! Each capture counts once for every collection it lists. Lines are ordered
//! by count, highest first; equal counts keep the order in which the
//! collections were first seen. Counts are right-aligned to the widest one.

use std::collections::HashMap;
use std::io::Write;

use super::ReportError;
use crate::core::types::{CaptureRecord, CollectionId};

/// Count captures per collection, most common first.
pub fn count_collections(records: &[CaptureRecord]) -> Vec<(&CollectionId, usize)> {
    let mut index: HashMap<&CollectionId, usize> = HashMap::new();
    let mut counts: Vec<(&CollectionId, usize)> = Vec::new();

    for id in records.iter().flat_map(|r| &r.collections) {
        match index.get(id) {
            Some(&slot) => counts[slot].1 += 1,
            None => {
                index.insert(id, counts.len());
                counts.push((id, 1));
            }
        }
    }

    // Stable sort keeps first-seen order among ties.
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts
}

/// Write one `count details_url` line per collection.
///
/// Nothing is written when no capture lists a collection.
pub fn generate<W: Write>(
    records: &[CaptureRecord],
    details_base: &str,
    writer: &mut W,
) -> Result<(), ReportError> {
    let counts = count_collections(records);
    let Some(&(_, max)) = counts.first() else {
        return Ok(());
    };

    let width = max.to_string().len();
    let details_base = details_base.trim_end_matches('/');
    for (id, count) in counts {
        writeln!(writer, "{count:>width$} {details_base}/{id}")?;
    }
    Ok(())
}
