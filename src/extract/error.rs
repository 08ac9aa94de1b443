//! Error types for content extraction

use crate::ai::ProviderError;
use crate::error::Error as CrateError;
use thiserror::Error;

/// Error type for extraction strategies
#[derive(Debug, Error)]
pub enum ExtractError {
    /// AI provider failure
    #[error("provider failure: {0}")]
    Provider(#[from] ProviderError),

    /// Heuristic stage failure
    #[error("heuristic failure: {0}")]
    Heuristic(String),
}

impl From<ExtractError> for CrateError {
    fn from(err: ExtractError) -> Self {
        match err {
            ExtractError::Provider(e) => e.into(),
            ExtractError::Heuristic(msg) => CrateError::Extract(msg),
        }
    }
}
