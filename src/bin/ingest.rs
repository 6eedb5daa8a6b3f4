//! Bulk-load restaurant visit rows into the database.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use matjip_bot::db;
use matjip_bot::ingest::load_rows;
use matjip_bot::logging::init_tracing;

#[derive(Parser, Debug)]
#[command(name = "ingest", about = "Load spreadsheet rows (.xls/.xlsx or JSON records export) into the visits table")]
struct Cli {
    /// Workbook (first sheet, header row first) or JSON array of row objects,
    /// with at least `store` and `address` columns
    #[arg(short, long)]
    file: PathBuf,

    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    database_url: String,

    /// Rows per INSERT statement
    #[arg(long, default_value_t = 500)]
    batch_size: usize,

    /// Parse and report without touching the database
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    init_tracing();

    let cli = Cli::parse();

    let parsed = load_rows(&cli.file).with_context(|| format!("Failed to load {}", cli.file.display()))?;
    for record in parsed.records.iter().take(5) {
        info!(store = %record.store, address = %record.address, "Row preview");
    }

    if cli.dry_run {
        info!(
            rows = parsed.records.len(),
            skipped = parsed.skipped.len(),
            "Dry run, nothing inserted"
        );
        return Ok(());
    }

    let pool = db::connect(&cli.database_url, 1)
        .await
        .context("Failed to connect to database")?;
    db::init_database_schema(&pool).await?;

    let inserted = db::insert_records(&pool, &parsed.records, cli.batch_size)
        .await
        .context("Failed to insert rows")?;
    let total = db::count_records(&pool).await?;

    info!(inserted, skipped = parsed.skipped.len(), total, "Ingestion finished");
    pool.close().await;
    Ok(())
}
