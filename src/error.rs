//! Error types for the pagesift crate

use thiserror::Error;

/// Result type for pagesift operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for pagesift operations
#[derive(Debug, Error)]
pub enum Error {
    /// HTTP client error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Invalid or non-absolute request URL
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Page rendering error
    #[error("Render error: {0}")]
    Render(String),

    /// AI provider error
    #[error("Provider error: {0}")]
    Provider(String),

    /// Operation not supported
    #[error("Operation not supported: {0}")]
    Unsupported(String),

    /// Content extraction error
    #[error("Extraction error: {0}")]
    Extract(String),

    /// Database error
    #[error("Database error: {0}")]
    Database(String),

    /// Other errors
    #[error("{0}")]
    Other(String),
}
