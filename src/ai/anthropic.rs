//! Anthropic messages client

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::ai::error::ProviderError;

const DEFAULT_BASE_URL: &str = "https://api.anthropic.com";
const API_VERSION: &str = "2023-06-01";

/// Client for the Anthropic messages endpoint
#[derive(Clone)]
pub struct AnthropicClient {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
    model: String,
    max_tokens: u32,
    temperature: f32,
}

#[cfg(test)]
impl AnthropicClient {
    /// Set the base URL (for testing only)
    pub fn set_base_url(&mut self, url: String) {
        self.base_url = url;
    }
}

impl AnthropicClient {
    /// Create a new client; the credential is not validated here.
    pub fn new(api_key: Option<String>, model: String, max_tokens: u32, temperature: f32) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(super::HTTP_TIMEOUT_SECS))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key,
            model,
            max_tokens,
            temperature,
        }
    }

    /// The model this client sends requests for
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Run one extraction completion and return the primary response text.
    #[instrument(skip(self, system, user), level = "debug")]
    pub async fn extract(&self, system: &str, user: &str) -> Result<String, ProviderError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(ProviderError::MissingCredential("anthropic"))?;

        let body = MessagesRequest {
            model: &self.model,
            max_tokens: self.max_tokens,
            temperature: self.temperature,
            system,
            messages: vec![UserMessage {
                role: "user",
                content: user,
            }],
        };

        debug!(model = %self.model, "sending messages request");
        let response = self
            .client
            .post(format!("{}/v1/messages", self.base_url))
            .header("x-api-key", api_key)
            .header("anthropic-version", API_VERSION)
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(super::api_error(response).await);
        }

        let reply: MessagesResponse = response.json().await?;
        reply
            .content
            .into_iter()
            .next()
            .and_then(|block| block.text)
            .ok_or_else(|| {
                ProviderError::UnexpectedResponse("no text block in message content".to_string())
            })
    }
}

#[derive(Debug, Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    temperature: f32,
    system: &'a str,
    messages: Vec<UserMessage<'a>>,
}

#[derive(Debug, Serialize)]
struct UserMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    text: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Server;

    fn test_client(api_key: Option<&str>) -> AnthropicClient {
        AnthropicClient::new(
            api_key.map(String::from),
            "claude-3-haiku-20240307".to_string(),
            2000,
            0.1,
        )
    }

    #[tokio::test]
    async fn extract_returns_first_text_block() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/v1/messages")
            .match_header("x-api-key", "test-key")
            .match_header("anthropic-version", API_VERSION)
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"content":[{"type":"text","text":"extracted text"}]}"#)
            .expect(1)
            .create_async()
            .await;

        let mut client = test_client(Some("test-key"));
        client.set_base_url(server.url());

        let result = client.extract("system", "user").await.unwrap();
        assert_eq!(result, "extracted text");

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn missing_credential_fails_without_request() {
        let client = test_client(None);

        let result = client.extract("system", "user").await;
        assert!(matches!(
            result,
            Err(ProviderError::MissingCredential("anthropic"))
        ));
    }

    #[tokio::test]
    async fn non_success_status_maps_to_api_error() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("POST", "/v1/messages")
            .with_status(529)
            .with_body("overloaded")
            .create_async()
            .await;

        let mut client = test_client(Some("test-key"));
        client.set_base_url(server.url());

        let result = client.extract("system", "user").await;
        assert!(matches!(
            result,
            Err(ProviderError::Api { status_code: 529, .. })
        ));
    }
}
