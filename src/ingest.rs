//! # Ingestion Module
//!
//! Loads spreadsheet rows and turns them into records ready for insertion.
//! Workbooks (`.xls`, `.xlsx` and friends) are read from their first sheet,
//! whose first row names the columns. Anything else is read as a JSON array
//! of row objects. Every column is kept in `raw`; only `store` and `address`
//! are required.

use std::fs;
use std::path::Path;

use calamine::{open_workbook_auto, Data, Range, Reader};
use serde_json::{Map, Number, Value};
use tracing::{debug, info, warn};

use crate::errors::IngestError;

pub const STORE_COLUMN: &str = "store";
pub const ADDRESS_COLUMN: &str = "address";

/// File extensions read as workbooks
const SPREADSHEET_EXTENSIONS: [&str; 5] = ["xls", "xlsx", "xlsm", "xlsb", "ods"];

/// A row ready for insertion
#[derive(Debug, Clone, PartialEq)]
pub struct NewRecord {
    pub store: String,
    pub address: String,
    /// The full source row
    pub raw: Value,
}

/// Why a row was left out
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    NotAnObject,
    MissingColumn(&'static str),
}

#[derive(Debug, Default)]
pub struct ParsedRows {
    pub records: Vec<NewRecord>,
    /// Zero-based row index and reason for each skipped row
    pub skipped: Vec<(usize, SkipReason)>,
}

/// Parse rows from JSON text
pub fn parse_rows(input: &str) -> Result<ParsedRows, IngestError> {
    let value: Value = serde_json::from_str(input)?;
    let Value::Array(rows) = value else {
        return Err(IngestError::NotAnArray);
    };
    Ok(collect_rows(rows))
}

/// Turn row objects into records, noting the rows left out
fn collect_rows(rows: Vec<Value>) -> ParsedRows {
    let mut parsed = ParsedRows::default();
    for (index, row) in rows.into_iter().enumerate() {
        match row_to_record(row) {
            Ok(record) => parsed.records.push(record),
            Err(reason) => {
                warn!(row = index, reason = ?reason, "Skipping row");
                parsed.skipped.push((index, reason));
            }
        }
    }

    info!(
        parsed = parsed.records.len(),
        skipped = parsed.skipped.len(),
        "Rows parsed"
    );
    parsed
}

/// Whether `path` is read as a workbook rather than JSON
pub fn is_spreadsheet(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| SPREADSHEET_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}

/// Read and parse a rows file, choosing the format by extension
pub fn load_rows(path: &Path) -> Result<ParsedRows, IngestError> {
    if is_spreadsheet(path) {
        return load_spreadsheet(path);
    }

    debug!(path = %path.display(), "Reading rows file");
    let content = fs::read_to_string(path).map_err(|source| IngestError::Read {
        path: path.display().to_string(),
        source,
    })?;
    parse_rows(&content)
}

/// Read the first sheet of a workbook
pub fn load_spreadsheet(path: &Path) -> Result<ParsedRows, IngestError> {
    debug!(path = %path.display(), "Reading workbook");
    let mut workbook = open_workbook_auto(path)?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or(IngestError::EmptyWorkbook)??;
    Ok(collect_rows(sheet_rows(&range)))
}

/// Row objects keyed by the header row; columns with a blank header are dropped
pub fn sheet_rows(range: &Range<Data>) -> Vec<Value> {
    let mut rows = range.rows();
    let Some(header) = rows.next() else {
        return Vec::new();
    };
    let columns: Vec<Option<String>> = header
        .iter()
        .map(|cell| match cell_value(cell) {
            Value::Null => None,
            Value::String(name) if name.is_empty() => None,
            Value::String(name) => Some(name),
            other => Some(other.to_string()),
        })
        .collect();

    rows.map(|cells| {
        let row: Map<String, Value> = columns
            .iter()
            .zip(cells)
            .filter_map(|(name, cell)| Some((name.clone()?, cell_value(cell))))
            .collect();
        Value::Object(row)
    })
    .collect()
}

/// JSON value of one cell; whole floats become integers
fn cell_value(cell: &Data) -> Value {
    match cell {
        Data::Empty | Data::Error(_) => Value::Null,
        Data::String(s) => Value::String(s.clone()),
        Data::Bool(b) => Value::Bool(*b),
        Data::Int(i) => Value::from(*i),
        Data::Float(f) if f.fract() == 0.0 && f.abs() < i64::MAX as f64 => Value::from(*f as i64),
        Data::Float(f) => Number::from_f64(*f).map(Value::Number).unwrap_or(Value::Null),
        other => Value::String(other.to_string()),
    }
}

fn row_to_record(row: Value) -> Result<NewRecord, SkipReason> {
    let Value::Object(columns) = &row else {
        return Err(SkipReason::NotAnObject);
    };

    let store = column_text(columns, STORE_COLUMN).ok_or(SkipReason::MissingColumn(STORE_COLUMN))?;
    let address =
        column_text(columns, ADDRESS_COLUMN).ok_or(SkipReason::MissingColumn(ADDRESS_COLUMN))?;

    Ok(NewRecord { store, address, raw: row })
}

/// Cell text, numbers stringified; null and empty cells count as missing
fn column_text(columns: &Map<String, Value>, name: &str) -> Option<String> {
    match columns.get(name)? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
