//! AI extraction adapter
//!
//! One call contract over the supported completion providers: run an
//! extraction instruction against supplied page text and return the reply's
//! primary text field. The provider set is closed — OpenAI chat completions,
//! Anthropic messages, and a local Ollama server — and is resolved once from
//! [`AiSettings`] at construction, not per call.

mod anthropic;
pub mod error;
mod ollama;
mod openai;

pub use anthropic::AnthropicClient;
pub use error::ProviderError;
pub use ollama::OllamaClient;
pub use openai::OpenAiClient;

use tracing::{debug, instrument};

use crate::config::AiSettings;
use crate::extract::ExtractionProvider;

/// Input content cap applied before building the provider prompt
pub const MAX_CONTENT_CHARS: usize = 8000;

/// HTTP client timeout for all provider calls, in seconds
pub(crate) const HTTP_TIMEOUT_SECS: u64 = 120;

/// Fixed system framing for every provider
const SYSTEM_PROMPT: &str = "You are a precise content-extraction assistant. \
    Extract only the information that matches the user's request. \
    If the requested information is not present in the content, state that plainly.";

/// AI extractor over a closed set of provider variants
pub enum AiExtractor {
    /// OpenAI chat completions
    OpenAi(OpenAiClient),
    /// Anthropic messages
    Anthropic(AnthropicClient),
    /// Local Ollama server
    Ollama(OllamaClient),
}

impl AiExtractor {
    /// Resolve an extractor from settings.
    ///
    /// Returns `Ok(None)` when no provider is configured and
    /// [`ProviderError::Unsupported`] for an unrecognized provider name.
    /// Credentials are not checked here; a missing key fails at call time.
    pub fn from_settings(settings: &AiSettings) -> Result<Option<Self>, ProviderError> {
        let Some(provider) = settings.provider.as_deref() else {
            return Ok(None);
        };

        let extractor = match provider.to_ascii_lowercase().as_str() {
            "openai" => Self::OpenAi(OpenAiClient::new(
                settings.openai_api_key.clone(),
                settings.model_for("openai"),
                settings.max_tokens,
                settings.temperature,
            )),
            "anthropic" => Self::Anthropic(AnthropicClient::new(
                settings.anthropic_api_key.clone(),
                settings.model_for("anthropic"),
                settings.max_tokens,
                settings.temperature,
            )),
            "ollama" => Self::Ollama(OllamaClient::new(
                settings.ollama_base_url.clone(),
                settings.model_for("ollama"),
                settings.max_tokens,
                settings.temperature,
            )),
            other => return Err(ProviderError::Unsupported(other.to_string())),
        };

        Ok(Some(extractor))
    }

    /// Which provider this extractor runs against
    pub fn provider(&self) -> ExtractionProvider {
        match self {
            Self::OpenAi(_) => ExtractionProvider::Openai,
            Self::Anthropic(_) => ExtractionProvider::Anthropic,
            Self::Ollama(_) => ExtractionProvider::Ollama,
        }
    }

    /// The resolved model name
    pub fn model(&self) -> &str {
        match self {
            Self::OpenAi(client) => client.model(),
            Self::Anthropic(client) => client.model(),
            Self::Ollama(client) => client.model(),
        }
    }

    /// Run the extraction instruction against the supplied content.
    ///
    /// Content is truncated to [`MAX_CONTENT_CHARS`] before the prompt is
    /// built. A single failure is surfaced as-is; no retry is performed.
    #[instrument(skip(self, content, prompt), level = "debug")]
    pub async fn extract(&self, content: &str, prompt: &str) -> Result<String, ProviderError> {
        let user = build_user_prompt(content, prompt);
        debug!(provider = ?self.provider(), prompt_chars = user.len(), "running AI extraction");

        let text = match self {
            Self::OpenAi(client) => client.extract(SYSTEM_PROMPT, &user).await?,
            Self::Anthropic(client) => client.extract(SYSTEM_PROMPT, &user).await?,
            Self::Ollama(client) => client.extract(SYSTEM_PROMPT, &user).await?,
        };

        let text = text.trim().to_string();
        if text.is_empty() {
            return Err(ProviderError::UnexpectedResponse(
                "provider returned empty extraction".to_string(),
            ));
        }
        Ok(text)
    }
}

/// Truncate content to the cap on a char boundary.
fn truncate_content(content: &str) -> &str {
    match content.char_indices().nth(MAX_CONTENT_CHARS) {
        Some((idx, _)) => &content[..idx],
        None => content,
    }
}

fn build_user_prompt(content: &str, prompt: &str) -> String {
    format!(
        "Request: {prompt}\n\nPage content:\n{}",
        truncate_content(content)
    )
}

/// Map a non-2xx provider response to [`ProviderError::Api`].
pub(crate) async fn api_error(response: reqwest::Response) -> ProviderError {
    let status_code = response.status().as_u16();
    let message = response.text().await.unwrap_or_default();
    ProviderError::Api {
        status_code,
        message,
    }
}
