//! Extraction strategy routing
//!
//! An ordered strategy list tried until one succeeds. In the default
//! configuration the list is the configured AI provider (when any) followed
//! by the local heuristic, so a provider outage degrades to rule-based
//! extraction instead of failing the crawl.

use async_trait::async_trait;
use tracing::{debug, instrument, warn};

use crate::ai::{AiExtractor, ProviderError};
use crate::config::AiSettings;
use crate::extract::error::ExtractError;
use crate::extract::heuristic::extract_locally;
use crate::extract::{ExtractionOutcome, ExtractionProvider};

/// One way of turning page text plus a prompt into extracted content
#[async_trait]
pub trait ExtractionStrategy: Send + Sync {
    /// Strategy name, for logging
    fn name(&self) -> &'static str;

    /// Attempt the extraction.
    async fn extract(&self, content: &str, prompt: &str) -> Result<ExtractionOutcome, ExtractError>;
}

/// Strategy backed by a configured AI provider
pub struct AiStrategy {
    extractor: AiExtractor,
}

impl AiStrategy {
    pub fn new(extractor: AiExtractor) -> Self {
        Self { extractor }
    }
}

#[async_trait]
impl ExtractionStrategy for AiStrategy {
    fn name(&self) -> &'static str {
        "ai"
    }

    async fn extract(&self, content: &str, prompt: &str) -> Result<ExtractionOutcome, ExtractError> {
        let extracted = self.extractor.extract(content, prompt).await?;
        Ok(ExtractionOutcome {
            content: extracted,
            provider: self.extractor.provider(),
            model: Some(self.extractor.model().to_string()),
        })
    }
}

/// Always-available rule-based strategy
pub struct HeuristicStrategy;

#[async_trait]
impl ExtractionStrategy for HeuristicStrategy {
    fn name(&self) -> &'static str {
        "local-heuristic"
    }

    async fn extract(&self, content: &str, prompt: &str) -> Result<ExtractionOutcome, ExtractError> {
        Ok(ExtractionOutcome {
            content: extract_locally(content, prompt),
            provider: ExtractionProvider::LocalHeuristic,
            model: None,
        })
    }
}

/// Ordered strategy list with a passthrough floor
pub struct ExtractionRouter {
    strategies: Vec<Box<dyn ExtractionStrategy>>,
}

impl ExtractionRouter {
    /// Build a router over an explicit strategy list.
    pub fn new(strategies: Vec<Box<dyn ExtractionStrategy>>) -> Self {
        Self { strategies }
    }

    /// Build the default router from settings: AI first when a provider is
    /// configured, heuristic always last.
    pub fn from_settings(settings: &AiSettings) -> Result<Self, ProviderError> {
        let mut strategies: Vec<Box<dyn ExtractionStrategy>> = Vec::new();
        if let Some(extractor) = AiExtractor::from_settings(settings)? {
            strategies.push(Box::new(AiStrategy::new(extractor)));
        }
        strategies.push(Box::new(HeuristicStrategy));
        Ok(Self::new(strategies))
    }

    /// Route one extraction.
    ///
    /// An absent or empty prompt is the identity: content passes through
    /// unchanged with no provider attributed. Otherwise strategies run in
    /// order until one succeeds; when every strategy fails the original
    /// content is returned under an extraction-request banner.
    #[instrument(skip(self, text_content, prompt))]
    pub async fn route(&self, text_content: &str, prompt: Option<&str>) -> ExtractionOutcome {
        let prompt = match prompt.map(str::trim) {
            Some(p) if !p.is_empty() => p,
            _ => {
                debug!("no extraction prompt; passing content through");
                return ExtractionOutcome {
                    content: text_content.to_string(),
                    provider: ExtractionProvider::None,
                    model: None,
                };
            }
        };

        for strategy in &self.strategies {
            match strategy.extract(text_content, prompt).await {
                Ok(outcome) => {
                    debug!(strategy = strategy.name(), provider = %outcome.provider, "extraction succeeded");
                    return outcome;
                }
                Err(e) => {
                    warn!(strategy = strategy.name(), error = %e, "extraction strategy failed");
                }
            }
        }

        ExtractionOutcome {
            content: format!("Extraction Request: \"{prompt}\"\n\n{text_content}"),
            provider: ExtractionProvider::None,
            model: None,
        }
    }
}
