//! Content extraction
//!
//! Turns rendered page text plus an optional natural-language prompt into the
//! text persisted as a crawl's `extracted_content`. Strategies are tried in
//! order by [`ExtractionRouter`]: the configured AI provider first when one is
//! set, then the always-available local heuristic. The router itself never
//! fails; the worst case is a labeled passthrough of the original text.

pub mod error;
pub mod heuristic;
mod router;

pub use error::ExtractError;
pub use heuristic::extract_locally;
pub use router::{AiStrategy, ExtractionRouter, ExtractionStrategy, HeuristicStrategy};

use serde::{Deserialize, Serialize};

/// Which mechanism produced an extraction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ExtractionProvider {
    /// No extraction ran; content passed through unchanged
    None,
    /// OpenAI chat completions
    Openai,
    /// Anthropic messages
    Anthropic,
    /// Local Ollama server
    Ollama,
    /// Built-in heuristic extractor
    LocalHeuristic,
}

impl ExtractionProvider {
    /// Stable string form, as stored in the database
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Openai => "openai",
            Self::Anthropic => "anthropic",
            Self::Ollama => "ollama",
            Self::LocalHeuristic => "local-heuristic",
        }
    }

    /// Parse the stored string form back to a provider.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "none" => Some(Self::None),
            "openai" => Some(Self::Openai),
            "anthropic" => Some(Self::Anthropic),
            "ollama" => Some(Self::Ollama),
            "local-heuristic" => Some(Self::LocalHeuristic),
            _ => None,
        }
    }
}

impl std::fmt::Display for ExtractionProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of one extraction pass
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractionOutcome {
    /// The extracted (or passed-through) text
    pub content: String,
    /// Which mechanism produced it
    pub provider: ExtractionProvider,
    /// Model name, when an AI provider produced it
    pub model: Option<String>,
}
