//! Database operations for the persistence store

use crate::store::error::StoreError;
use crate::store::schema;
use crate::store::{CrawlRecord, CrawlStatus, NewCrawlRecord};
use chrono::{DateTime, Utc};
use libsql::{Connection, Row, Rows, params};
use tracing::{debug, instrument};

/// Database manager for crawl results
#[derive(Clone)]
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Create a new database manager
    #[instrument(skip(conn))]
    pub async fn new(conn: Connection) -> Result<Self, StoreError> {
        schema::initialize_schema(&conn).await?;

        Ok(Self { conn })
    }

    /// Create a new database manager from a local file path
    pub async fn new_from_path(path: &str) -> Result<Self, StoreError> {
        let db = libsql::Builder::new_local(path)
            .build()
            .await
            .map_err(|e| StoreError::Connection(format!("Failed to open database: {}", e)))?;

        let conn = db
            .connect()
            .map_err(|e| StoreError::Connection(format!("Failed to connect to database: {}", e)))?;

        Self::new(conn).await
    }

    /// Execute a custom query with parameters
    pub async fn execute_query<P>(&self, sql: &str, params: P) -> Result<Rows, StoreError>
    where
        P: libsql::params::IntoParams,
    {
        self.conn
            .query(sql, params)
            .await
            .map_err(|e| StoreError::Query(format!("Failed to execute query: {}", e)))
    }

    /// Insert a crawl record and return the assigned row id.
    #[instrument(skip(self, record), fields(url = %record.url, status = %record.status))]
    pub async fn insert_record(&self, record: &NewCrawlRecord) -> Result<i64, StoreError> {
        let metadata = serde_json::to_string(&record.metadata)
            .map_err(|e| StoreError::Data(format!("Failed to serialize metadata: {}", e)))?;

        self.conn
            .execute(
                "INSERT INTO crawl_results (url, title, content, metadata, crawled_at, status)
                 VALUES (?, ?, ?, ?, ?, ?)",
                params![
                    record.url.clone(),
                    record.title.clone(),
                    record.content.clone(),
                    metadata,
                    record.crawled_at.to_rfc3339(),
                    record.status.as_str(),
                ],
            )
            .await
            .map_err(|e| StoreError::Query(format!("Failed to insert crawl record: {}", e)))?;

        let mut rows = self
            .conn
            .query("SELECT last_insert_rowid()", params![])
            .await
            .map_err(|e| StoreError::Query(format!("Failed to get last insert ID: {}", e)))?;

        let row = match rows.next().await {
            Ok(Some(row)) => row,
            Ok(None) => {
                return Err(StoreError::Data(
                    "No ID returned from last_insert_rowid()".to_string(),
                ));
            }
            Err(e) => return Err(StoreError::Data(format!("Failed to get ID: {}", e))),
        };

        let id: i64 = row
            .get(0)
            .map_err(|e| StoreError::Data(format!("Failed to get ID: {}", e)))?;
        debug!(id, "stored crawl record");
        Ok(id)
    }

    /// Get a crawl record by id.
    pub async fn get_record(&self, id: i64) -> Result<Option<CrawlRecord>, StoreError> {
        let mut rows = self
            .conn
            .query(
                "SELECT id, url, title, content, metadata, crawled_at, status
                 FROM crawl_results WHERE id = ?",
                params![id],
            )
            .await
            .map_err(|e| StoreError::Query(format!("Failed to get crawl record: {}", e)))?;

        match rows.next().await {
            Ok(Some(row)) => Ok(Some(row_to_record(&row)?)),
            Ok(None) => Ok(None),
            Err(e) => Err(StoreError::Query(format!("Failed to read row: {}", e))),
        }
    }

    /// List crawl records, newest first.
    pub async fn list_records(
        &self,
        limit: u32,
        offset: u32,
    ) -> Result<Vec<CrawlRecord>, StoreError> {
        let mut rows = self
            .conn
            .query(
                "SELECT id, url, title, content, metadata, crawled_at, status
                 FROM crawl_results
                 ORDER BY crawled_at DESC, id DESC
                 LIMIT ? OFFSET ?",
                params![limit as i64, offset as i64],
            )
            .await
            .map_err(|e| StoreError::Query(format!("Failed to list crawl records: {}", e)))?;

        let mut records = Vec::new();
        loop {
            match rows.next().await {
                Ok(Some(row)) => records.push(row_to_record(&row)?),
                Ok(None) => break,
                Err(e) => return Err(StoreError::Query(format!("Failed to read row: {}", e))),
            }
        }
        Ok(records)
    }
}

/// Convert a database row to a CrawlRecord
fn row_to_record(row: &Row) -> Result<CrawlRecord, StoreError> {
    let metadata_text: String = row
        .get(4)
        .map_err(|e| StoreError::Data(format!("Failed to get metadata: {}", e)))?;
    let metadata = serde_json::from_str(&metadata_text)
        .map_err(|e| StoreError::Data(format!("Failed to parse metadata: {}", e)))?;

    let crawled_at_text: String = row
        .get(5)
        .map_err(|e| StoreError::Data(format!("Failed to get crawled_at: {}", e)))?;
    let crawled_at = DateTime::parse_from_rfc3339(&crawled_at_text)
        .map_err(|e| StoreError::Data(format!("Failed to parse crawled_at: {}", e)))?
        .with_timezone(&Utc);

    let status_text: String = row
        .get(6)
        .map_err(|e| StoreError::Data(format!("Failed to get status: {}", e)))?;

    Ok(CrawlRecord {
        id: row
            .get(0)
            .map_err(|e| StoreError::Data(format!("Failed to get id: {}", e)))?,
        url: row
            .get(1)
            .map_err(|e| StoreError::Data(format!("Failed to get url: {}", e)))?,
        title: row
            .get(2)
            .map_err(|e| StoreError::Data(format!("Failed to get title: {}", e)))?,
        content: row
            .get(3)
            .map_err(|e| StoreError::Data(format!("Failed to get content: {}", e)))?,
        metadata,
        crawled_at,
        status: CrawlStatus::parse(&status_text)?,
    })
}
