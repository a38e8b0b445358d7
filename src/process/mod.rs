// src/process/mod.rs
pub mod date_parser;
pub mod normalize;
pub mod utils;

use csv::ReaderBuilder;
use std::io::Cursor;
use tracing::debug;

pub use normalize::{normalize, Field, Normalized, SchemaError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawTable {
    /// Column names exactly as the source spells them.
    pub headers: Vec<String>,
    /// Each data row, one String per cell. Rows may be ragged.
    pub rows: Vec<Vec<String>>,
}

impl RawTable {
    /// Cell at `col` in `row`, or `""` when the row is short.
    pub fn cell(&self, row: usize, col: usize) -> &str {
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .map(String::as_str)
            .unwrap_or("")
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CsvError {
    #[error("CSV parse error at record {record}: {source}")]
    Record {
        record: usize,
        #[source]
        source: csv::Error,
    },

    #[error("CSV payload has no header row")]
    NoHeader,
}

/// Parse a delimited text payload into a [`RawTable`].
///
/// The first record is the header. Records with a different field count
/// than the header are kept as-is; blank lines are skipped.
pub fn parse_csv(data: &[u8]) -> Result<RawTable, CsvError> {
    let data = data.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(data);

    let mut rdr = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true) // keep this so records with different field-counts work
        .from_reader(Cursor::new(data));

    let mut records = rdr.records().enumerate();

    let headers: Vec<String> = match records.next() {
        Some((idx, result)) => result
            .map_err(|source| CsvError::Record {
                record: idx,
                source,
            })?
            .iter()
            .map(str::to_string)
            .collect(),
        None => return Err(CsvError::NoHeader),
    };
    if headers.iter().all(|h| h.trim().is_empty()) {
        return Err(CsvError::NoHeader);
    }

    let mut rows = Vec::new();
    for (idx, result) in records {
        let record = result.map_err(|source| CsvError::Record {
            record: idx,
            source,
        })?;
        rows.push(record.iter().map(str::to_string).collect());
    }

    debug!(columns = headers.len(), rows = rows.len(), "parsed CSV payload");
    Ok(RawTable { headers, rows })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_csv_with_bom_and_ragged_rows() {
        let content = "\u{feff}Date,Recip_State,Series_Complete_Pop_Pct\n\
                       05/01/2021,IN,42.5\n\
                       05/02/2021,IN\n\
                       05/03/2021,OH,\"12.0\",extra\n";

        let raw = parse_csv(content.as_bytes()).unwrap();

        assert_eq!(
            raw.headers,
            vec!["Date", "Recip_State", "Series_Complete_Pop_Pct"]
        );
        assert_eq!(raw.rows.len(), 3);
        assert_eq!(raw.cell(1, 2), "");
        assert_eq!(raw.cell(2, 2), "12.0");
        assert_eq!(raw.rows[2].len(), 4);
        assert_eq!(raw.cell(99, 0), "");
    }

    #[test]
    fn test_parse_csv_empty_payload() {
        assert!(matches!(parse_csv(b""), Err(CsvError::NoHeader)));
        assert!(matches!(parse_csv(b"\n\n"), Err(CsvError::NoHeader)));
    }

    #[test]
    fn test_parse_csv_header_only() {
        let raw = parse_csv(b"date,state,series_complete_pop_pct\n").unwrap();
        assert_eq!(raw.headers.len(), 3);
        assert!(raw.rows.is_empty());
    }
}
