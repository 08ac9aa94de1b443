//! Error types for the AI extraction adapter

use crate::error::Error as CrateError;
use thiserror::Error;

/// Error type for AI provider operations
#[derive(Debug, Error)]
pub enum ProviderError {
    /// Required credential absent at call time
    #[error("missing API key for provider '{0}'")]
    MissingCredential(&'static str),

    /// HTTP client error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Provider returned a non-2xx response
    #[error("API error: {status_code} - {message}")]
    Api {
        /// HTTP status code
        status_code: u16,
        /// Response body text
        message: String,
    },

    /// Reply shape missing the expected text field, or text empty
    #[error("unexpected response format: {0}")]
    UnexpectedResponse(String),

    /// Provider name not recognized
    #[error("unsupported AI provider: {0}")]
    Unsupported(String),
}

impl From<ProviderError> for CrateError {
    fn from(err: ProviderError) -> Self {
        match err {
            ProviderError::Http(e) => CrateError::Http(e),
            ProviderError::Unsupported(p) => CrateError::Unsupported(format!("AI provider '{p}'")),
            _ => CrateError::Provider(err.to_string()),
        }
    }
}
