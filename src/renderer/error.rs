//! Error types for the renderer module

use crate::error::Error as CrateError;
use thiserror::Error;

/// Error type for page rendering operations
#[derive(Debug, Error)]
pub enum RenderError {
    /// Navigation did not complete within the configured timeout
    #[error("navigation timed out after {timeout_ms}ms: {url}")]
    Timeout {
        /// URL being rendered
        url: String,
        /// Configured timeout in milliseconds
        timeout_ms: u64,
    },

    /// DNS/connection/navigation failure
    #[error("navigation failed for {url}: {message}")]
    Navigation {
        /// URL being rendered
        url: String,
        /// Underlying failure
        message: String,
    },

    /// Browser launch, crash, or protocol failure
    #[error("render engine error: {0}")]
    Engine(String),
}

impl From<RenderError> for CrateError {
    fn from(err: RenderError) -> Self {
        CrateError::Render(err.to_string())
    }
}
