//! report::csv
//!
//! One row per capture: `timestamp,status,collections,url`. Collections are
//! joined with `,`, which the writer quotes.

use std::io::Write;

use serde::Serialize;

use super::ReportError;
use crate::core::types::CaptureRecord;

const HEADER: [&str; 4] = ["timestamp", "status", "collections", "url"];

#[derive(Serialize)]
struct Row<'a> {
    timestamp: u64,
    status: u16,
    collections: String,
    url: &'a str,
}

impl<'a> From<&'a CaptureRecord> for Row<'a> {
    fn from(record: &'a CaptureRecord) -> Self {
        let collections = record
            .collections
            .iter()
            .map(|c| c.as_str())
            .collect::<Vec<_>>()
            .join(",");
        Self {
            timestamp: record.timestamp,
            status: record.status,
            collections,
            url: &record.url,
        }
    }
}

/// Write the header row followed by one row per record.
pub fn generate<W: Write>(records: &[CaptureRecord], writer: &mut W) -> Result<(), ReportError> {
    let mut csv = ::csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);

    csv.write_record(HEADER)?;
    for record in records {
        csv.serialize(Row::from(record))?;
    }
    csv.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::CollectionId;

    fn record(collections: &[&str]) -> CaptureRecord {
        CaptureRecord {
            timestamp: 20170101000000,
            status: 200,
            collections: collections
                .iter()
                .map(|c| CollectionId::new(*c).unwrap())
                .collect(),
            url: "https://web.archive.org/web/20170101000000/https://epa.gov".into(),
        }
    }

    fn render(records: &[CaptureRecord]) -> String {
        let mut out = Vec::new();
        generate(records, &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn header_then_rows() {
        let out = render(&[record(&["web"])]);
        assert_eq!(
            out,
            "timestamp,status,collections,url\n\
             20170101000000,200,web,https://web.archive.org/web/20170101000000/https://epa.gov\n"
        );
    }

    #[test]
    fn multiple_collections_are_quoted() {
        let out = render(&[record(&["focused_crawls", "edgi_monitor"])]);
        assert!(out.contains(",\"focused_crawls,edgi_monitor\","));
    }

    #[test]
    fn no_records_writes_only_header() {
        assert_eq!(render(&[]), "timestamp,status,collections,url\n");
    }
}
