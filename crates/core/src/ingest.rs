//! CSV ingest.
//!
//! The first row is the header and must use the raw field names exactly
//! (`ClaimID,BeneID,ClaimStartDt,...`). Every following row becomes one
//! [`RawRecord`]. Rows whose cells are all blank are skipped. Rows with a
//! different cell count than the header are a parse error.

use crate::record::RawRecord;
use crate::{ClaimsError, ClaimsResult};
use std::io::Read;

/// A parsed CSV row and the 1-based line it came from.
#[derive(Clone, Debug, PartialEq)]
pub struct CsvRow {
    pub line: u64,
    pub record: RawRecord,
}

/// Read every data row of a CSV document.
///
/// # Errors
///
/// Returns `ClaimsError::Parse` if the document is malformed or has no data rows.
pub fn read_csv<R: Read>(input: R) -> ClaimsResult<Vec<CsvRow>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(false)
        .from_reader(input);

    let headers = reader.headers()?.clone();

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result?;
        if record.iter().all(|cell| cell.trim().is_empty()) {
            continue;
        }
        let line = record.position().map(|p| p.line()).unwrap_or_default();
        let raw: RawRecord = headers.iter().zip(record.iter()).collect();
        rows.push(CsvRow { line, record: raw });
    }

    if rows.is_empty() {
        return Err(ClaimsError::Parse("CSV had no rows.".into()));
    }

    tracing::debug!("parsed {} CSV rows", rows.len());
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_rows_keyed_by_header() {
        let input = "ClaimID,BeneID,Gender\nCLM1,BENE11001,M\nCLM2,BENE11002,F\n";
        let rows = read_csv(input.as_bytes()).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].record.get("ClaimID"), Some("CLM1"));
        assert_eq!(rows[1].record.get("Gender"), Some("F"));
        assert_eq!(rows[0].line, 2);
        assert_eq!(rows[1].line, 3);
    }

    #[test]
    fn skips_blank_rows() {
        let input = "ClaimID,BeneID\nCLM1,BENE1\n , \nCLM2,BENE2\n";
        let rows = read_csv(input.as_bytes()).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].record.get("ClaimID"), Some("CLM2"));
    }

    #[test]
    fn header_only_is_a_parse_error() {
        let err = read_csv("ClaimID,BeneID\n".as_bytes()).unwrap_err();
        assert_eq!(err.to_string(), "CSV had no rows.");
    }

    #[test]
    fn empty_input_is_a_parse_error() {
        let err = read_csv("".as_bytes()).unwrap_err();
        assert!(matches!(err, ClaimsError::Parse(_)));
    }

    #[test]
    fn ragged_rows_are_a_parse_error() {
        let err = read_csv("ClaimID,BeneID\nCLM1,BENE1,extra\n".as_bytes()).unwrap_err();
        match err {
            ClaimsError::Parse(msg) => assert!(msg.starts_with("CSV error:")),
            other => panic!("expected Parse error, got {other:?}"),
        }
    }
}
