//! Database schema for crawl results

use crate::store::error::StoreError;
use libsql::{Connection, params};

/// Initialize the database schema
pub async fn initialize_schema(conn: &Connection) -> Result<(), StoreError> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS crawl_results (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            url TEXT NOT NULL,
            title TEXT,
            content TEXT NOT NULL,
            metadata TEXT NOT NULL,
            crawled_at TEXT NOT NULL,
            status TEXT NOT NULL DEFAULT 'success'
        )",
        params![],
    )
    .await
    .map_err(|e| StoreError::Schema(format!("Failed to create crawl_results table: {}", e)))?;

    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_crawl_results_crawled_at ON crawl_results(crawled_at)",
        params![],
    )
    .await
    .map_err(|e| StoreError::Schema(format!("Failed to create index on crawl_results: {}", e)))?;

    Ok(())
}
