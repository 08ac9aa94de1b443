//! Ollama local-inference client
//!
//! Talks to a self-hosted Ollama server; no credential required.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::ai::error::ProviderError;

/// Client for the Ollama generate endpoint
#[derive(Clone)]
pub struct OllamaClient {
    client: reqwest::Client,
    base_url: String,
    model: String,
    max_tokens: u32,
    temperature: f32,
}

impl OllamaClient {
    /// Create a new client against the given server base URL.
    pub fn new(base_url: String, model: String, max_tokens: u32, temperature: f32) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(super::HTTP_TIMEOUT_SECS))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            model,
            max_tokens,
            temperature,
        }
    }

    /// The model this client sends requests for
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Run one extraction completion and return the response text.
    #[instrument(skip(self, system, user), level = "debug")]
    pub async fn extract(&self, system: &str, user: &str) -> Result<String, ProviderError> {
        let body = GenerateRequest {
            model: &self.model,
            prompt: user,
            system,
            stream: false,
            options: GenerateOptions {
                num_predict: self.max_tokens,
                temperature: self.temperature,
            },
        };

        debug!(model = %self.model, "sending generate request");
        let response = self
            .client
            .post(format!("{}/api/generate", self.base_url))
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(super::api_error(response).await);
        }

        let reply: GenerateResponse = response.json().await?;
        reply.response.ok_or_else(|| {
            ProviderError::UnexpectedResponse("no response field in reply".to_string())
        })
    }
}

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    system: &'a str,
    stream: bool,
    options: GenerateOptions,
}

#[derive(Debug, Serialize)]
struct GenerateOptions {
    num_predict: u32,
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    response: Option<String>,
}
