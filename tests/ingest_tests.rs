//! # Ingestion Tests
//!
//! Loading row files from disk, JSON exports and workbooks.

use matjip_bot::errors::IngestError;
use matjip_bot::ingest::{load_rows, SkipReason, ADDRESS_COLUMN};
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_rows_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[{{"store": "우래옥", "address": "서울 중구 창경궁로"}}, {{"store": "진미평양냉면", "address": "서울 강남구 학동로"}}]"#
        )
        .unwrap();

        let parsed = load_rows(file.path()).unwrap();
        assert_eq!(parsed.records.len(), 2);
        assert!(parsed.skipped.is_empty());
        assert_eq!(parsed.records[1].store, "진미평양냉면");
    }

    #[test]
    fn test_missing_file() {
        let result = load_rows(Path::new("/nonexistent/rows.json"));
        assert!(matches!(result, Err(IngestError::Read { .. })));
    }

    #[test]
    fn test_empty_array() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"[]").unwrap();

        let parsed = load_rows(file.path()).unwrap();
        assert!(parsed.records.is_empty());
    }

    #[test]
    fn test_load_rows_from_xlsx() {
        let path = Path::new(concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/visits.xlsx"));
        let parsed = load_rows(path).unwrap();

        let stores: Vec<_> = parsed.records.iter().map(|r| r.store.as_str()).collect();
        assert_eq!(stores, vec!["우래옥", "진미평양냉면", "우래옥"]);
        assert_eq!(parsed.records[1].address, "서울 강남구 학동로 305-3");
        assert_eq!(parsed.records[0].raw["date"], "2018-03-01");
        assert_eq!(parsed.records[0].raw["party"], 4);
        assert_eq!(parsed.skipped, vec![(3, SkipReason::MissingColumn(ADDRESS_COLUMN))]);
    }

    #[test]
    fn test_unreadable_workbook() {
        let mut file = tempfile::Builder::new().suffix(".xlsx").tempfile().unwrap();
        file.write_all(b"not a zip archive").unwrap();

        let result = load_rows(file.path());
        assert!(matches!(result, Err(IngestError::Spreadsheet(_))));
    }
}
