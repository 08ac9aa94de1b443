//! Persistence store for crawl results
//!
//! A single `crawl_results` table over libsql: insert-returning-key,
//! read-by-id, and a newest-first paginated scan. Metadata is stored as
//! serialized JSON text and parsed back to a `serde_json::Value` on read.

mod database;
pub mod error;
mod schema;

pub use database::Database;
pub use error::StoreError;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Outcome status of a stored crawl
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CrawlStatus {
    /// The page rendered and an extraction was stored
    Success,
    /// An upstream failure was recorded in place of content
    Error,
}

impl CrawlStatus {
    /// Stable string form, as stored in the database
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Error => "error",
        }
    }

    /// Parse the stored string form; unknown values are data errors.
    pub fn parse(s: &str) -> Result<Self, StoreError> {
        match s {
            "success" => Ok(Self::Success),
            "error" => Ok(Self::Error),
            other => Err(StoreError::Data(format!("unknown crawl status: {other}"))),
        }
    }
}

impl std::fmt::Display for CrawlStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A stored crawl result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrawlRecord {
    /// Row id
    pub id: i64,

    /// The URL that was crawled
    pub url: String,

    /// Page title; None when the page had none or the crawl failed
    pub title: Option<String>,

    /// Extracted content, or the error message for failed crawls
    pub content: String,

    /// Metadata object captured at crawl time
    pub metadata: serde_json::Value,

    /// When the record was assembled
    pub crawled_at: DateTime<Utc>,

    /// Outcome status
    pub status: CrawlStatus,
}

/// A crawl result not yet persisted; the store assigns the id
#[derive(Debug, Clone)]
pub struct NewCrawlRecord {
    /// The URL that was crawled
    pub url: String,

    /// Page title
    pub title: Option<String>,

    /// Extracted content, or the error message for failed crawls
    pub content: String,

    /// Metadata object captured at crawl time
    pub metadata: serde_json::Value,

    /// When the record was assembled
    pub crawled_at: DateTime<Utc>,

    /// Outcome status
    pub status: CrawlStatus,
}

impl NewCrawlRecord {
    /// Attach the store-assigned id.
    pub fn into_record(self, id: i64) -> CrawlRecord {
        CrawlRecord {
            id,
            url: self.url,
            title: self.title,
            content: self.content,
            metadata: self.metadata,
            crawled_at: self.crawled_at,
            status: self.status,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_string_forms_round_trip() {
        assert_eq!(CrawlStatus::parse("success").unwrap(), CrawlStatus::Success);
        assert_eq!(CrawlStatus::parse("error").unwrap(), CrawlStatus::Error);
        assert!(CrawlStatus::parse("pending").is_err());
    }

    #[test]
    fn into_record_preserves_fields() {
        let new_record = NewCrawlRecord {
            url: "https://example.com".to_string(),
            title: Some("Example Domain".to_string()),
            content: "body text".to_string(),
            metadata: serde_json::json!({"url": "https://example.com"}),
            crawled_at: Utc::now(),
            status: CrawlStatus::Success,
        };

        let record = new_record.clone().into_record(42);
        assert_eq!(record.id, 42);
        assert_eq!(record.url, new_record.url);
        assert_eq!(record.title, new_record.title);
        assert_eq!(record.content, new_record.content);
        assert_eq!(record.metadata, new_record.metadata);
        assert_eq!(record.status, CrawlStatus::Success);
    }

    #[test]
    fn record_serializes_status_lowercase() {
        let record = CrawlRecord {
            id: 1,
            url: "https://example.com".to_string(),
            title: None,
            content: "navigation failed".to_string(),
            metadata: serde_json::json!({"error": "navigation failed"}),
            crawled_at: Utc::now(),
            status: CrawlStatus::Error,
        };

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["status"], "error");
        assert_eq!(json["title"], serde_json::Value::Null);
    }
}
