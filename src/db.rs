use async_trait::async_trait;
use sqlx::postgres::{PgPool, PgPoolOptions};
use sqlx::types::Json;
use sqlx::{Postgres, QueryBuilder};
use tracing::{debug, info};

use crate::errors::DataSourceError;
use crate::ingest::NewRecord;
use crate::ranking::Record;

/// Read side of the restaurant visit store
#[async_trait]
pub trait RecordSource: Send + Sync {
    /// All records whose address contains `pattern`, in insertion order
    async fn find_by_address_substring(&self, pattern: &str) -> Result<Vec<Record>, DataSourceError>;
}

/// Open a connection pool
pub async fn connect(database_url: &str, max_connections: u32) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(database_url)
        .await
}

/// Initialize the database schema
pub async fn init_database_schema(pool: &PgPool) -> Result<(), sqlx::Error> {
    info!("Initializing database schema...");

    sqlx::query(
        "CREATE TABLE IF NOT EXISTS restaurant_visits (
            id BIGSERIAL PRIMARY KEY,
            store TEXT NOT NULL,
            address TEXT NOT NULL,
            raw JSONB,
            imported_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )",
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE INDEX IF NOT EXISTS restaurant_visits_address_idx ON restaurant_visits (address)",
    )
    .execute(pool)
    .await?;

    info!("Database schema initialized successfully");
    Ok(())
}

/// Find records whose address contains `pattern`.
///
/// `strpos` keeps `%` and `_` literal, unlike `LIKE`.
pub async fn find_records_by_address(pool: &PgPool, pattern: &str) -> Result<Vec<Record>, sqlx::Error> {
    let rows: Vec<(String, String)> = sqlx::query_as(
        "SELECT store, address FROM restaurant_visits WHERE strpos(address, $1) > 0 ORDER BY id",
    )
    .bind(pattern)
    .fetch_all(pool)
    .await?;

    debug!(pattern = %pattern, rows = rows.len(), "Fetched records by address");

    Ok(rows
        .into_iter()
        .map(|(store, address)| Record { store, address })
        .collect())
}

/// Bind parameters per inserted row
const PARAMS_PER_ROW: usize = 3;

/// Largest batch that stays under the Postgres limit of 65535 bind parameters
pub const MAX_BATCH_ROWS: usize = u16::MAX as usize / PARAMS_PER_ROW;

/// Rows per INSERT statement for a requested batch size
pub fn effective_batch_size(requested: usize) -> usize {
    requested.clamp(1, MAX_BATCH_ROWS)
}

/// Insert records in one transaction, `batch_size` rows per statement.
///
/// Returns the number of inserted rows. Nothing is deduplicated.
pub async fn insert_records(pool: &PgPool, records: &[NewRecord], batch_size: usize) -> Result<u64, sqlx::Error> {
    let batch_size = effective_batch_size(batch_size);
    let mut tx = pool.begin().await?;
    let mut inserted = 0;

    for batch in records.chunks(batch_size) {
        let mut builder: QueryBuilder<Postgres> =
            QueryBuilder::new("INSERT INTO restaurant_visits (store, address, raw) ");
        builder.push_values(batch, |mut row, record| {
            row.push_bind(record.store.clone())
                .push_bind(record.address.clone())
                .push_bind(Json(record.raw.clone()));
        });
        inserted += builder.build().execute(&mut *tx).await?.rows_affected();
        debug!(batch_len = batch.len(), "Inserted record batch");
    }

    tx.commit().await?;
    info!(inserted, "Records committed");
    Ok(inserted)
}

pub async fn count_records(pool: &PgPool) -> Result<i64, sqlx::Error> {
    let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM restaurant_visits")
        .fetch_one(pool)
        .await?;
    Ok(count)
}

/// PostgreSQL-backed record source
#[derive(Debug, Clone)]
pub struct PgRecordSource {
    pool: PgPool,
}

impl PgRecordSource {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RecordSource for PgRecordSource {
    async fn find_by_address_substring(&self, pattern: &str) -> Result<Vec<Record>, DataSourceError> {
        Ok(find_records_by_address(&self.pool, pattern).await?)
    }
}

/// Record source over a fixed in-memory list
#[derive(Debug, Clone, Default)]
pub struct MemoryRecordSource {
    records: Vec<Record>,
}

impl MemoryRecordSource {
    pub fn new(records: Vec<Record>) -> Self {
        Self { records }
    }
}

#[async_trait]
impl RecordSource for MemoryRecordSource {
    async fn find_by_address_substring(&self, pattern: &str) -> Result<Vec<Record>, DataSourceError> {
        Ok(self
            .records
            .iter()
            .filter(|r| r.address.contains(pattern))
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_memory_source_filters_by_substring() {
        let source = MemoryRecordSource::new(vec![
            Record::new("A", "서울 마포구 연남동"),
            Record::new("B", "서울 종로구 익선동"),
            Record::new("C", "서울특별시 마포구"),
        ]);

        let found = source.find_by_address_substring("마포구").await.unwrap();
        let stores: Vec<_> = found.iter().map(|r| r.store.as_str()).collect();
        assert_eq!(stores, vec!["A", "C"]);
    }

    #[test]
    fn test_batch_size_is_clamped() {
        assert_eq!(MAX_BATCH_ROWS, 21845);
        assert_eq!(effective_batch_size(0), 1);
        assert_eq!(effective_batch_size(500), 500);
        assert_eq!(effective_batch_size(100_000), MAX_BATCH_ROWS);
        assert!(effective_batch_size(usize::MAX) * PARAMS_PER_ROW <= u16::MAX as usize);
    }

    #[tokio::test]
    async fn test_memory_source_empty() {
        let source = MemoryRecordSource::default();
        assert!(source.find_by_address_substring("중구").await.unwrap().is_empty());
    }
}
