//! # Error Types Module
//!
//! Structured errors for configuration, record lookups and ingestion.
//! Handlers turn these into user-facing text; binaries wrap them in `anyhow`.

use thiserror::Error;

/// Startup configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("invalid value for {key}: {value:?}")]
    Invalid { key: &'static str, value: String },
}

/// Failures of the record source
///
/// Every variant means the same thing to a user: the data could not be
/// read right now. An empty result is never reported through this type.
#[derive(Debug, Clone, Error)]
pub enum DataSourceError {
    /// The query itself failed
    #[error("Data source unavailable: {0}")]
    Unavailable(String),
    /// The query did not finish within the configured timeout
    #[error("Data source timeout: {0}")]
    Timeout(String),
    /// Too many recent failures, lookups are short-circuited
    #[error("Data source circuit open")]
    CircuitOpen,
}

impl From<sqlx::Error> for DataSourceError {
    fn from(err: sqlx::Error) -> Self {
        DataSourceError::Unavailable(err.to_string())
    }
}

/// Errors raised while loading spreadsheet rows
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse rows: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("expected a JSON array of row objects")]
    NotAnArray,
    #[error("failed to read workbook: {0}")]
    Spreadsheet(#[from] calamine::Error),
    #[error("workbook has no sheets")]
    EmptyWorkbook,
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}
