//! OpenAI chat-completions client

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::ai::error::ProviderError;

const DEFAULT_BASE_URL: &str = "https://api.openai.com";

/// Client for the OpenAI chat-completions endpoint
#[derive(Clone)]
pub struct OpenAiClient {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
    model: String,
    max_tokens: u32,
    temperature: f32,
}

#[cfg(test)]
impl OpenAiClient {
    /// Set the base URL (for testing only)
    pub fn set_base_url(&mut self, url: String) {
        self.base_url = url;
    }
}

impl OpenAiClient {
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
            .ok_or(ProviderError::MissingCredential("openai"))?;

        let body = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: system,
                },
                ChatMessage {
                    role: "user",
                    content: user,
                },
            ],
            max_tokens: self.max_tokens,
            temperature: self.temperature,
        };

        debug!(model = %self.model, "sending chat completion request");
        let response = self
            .client
            .post(format!("{}/v1/chat/completions", self.base_url))
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(super::api_error(response).await);
        }

        let reply: ChatResponse = response.json().await?;
        reply
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| {
                ProviderError::UnexpectedResponse("no message content in choices".to_string())
            })
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatReplyMessage,
}

#[derive(Debug, Deserialize)]
struct ChatReplyMessage {
    content: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Server;

    fn test_client(api_key: Option<&str>) -> OpenAiClient {
        OpenAiClient::new(api_key.map(String::from), "gpt-3.5-turbo".to_string(), 2000, 0.1)
    }

    #[tokio::test]
    async fn extract_returns_first_choice_content() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/v1/chat/completions")
            .match_header("authorization", "Bearer test-key")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"choices":[{"message":{"role":"assistant","content":"a@b.com"}}]}"#)
            .expect(1)
            .create_async()
            .await;

        let mut client = test_client(Some("test-key"));
        client.set_base_url(server.url());

        let result = client.extract("system", "user").await.unwrap();
        assert_eq!(result, "a@b.com");

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn missing_credential_fails_without_request() {
        let client = test_client(None);

        let result = client.extract("system", "user").await;
        assert!(matches!(result, Err(ProviderError::MissingCredential("openai"))));
    }

    #[tokio::test]
    async fn non_success_status_maps_to_api_error() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("POST", "/v1/chat/completions")
            .with_status(401)
            .with_body("invalid key")
            .create_async()
            .await;

        let mut client = test_client(Some("bad-key"));
        client.set_base_url(server.url());

        let result = client.extract("system", "user").await;
        match result {
            Err(ProviderError::Api {
                status_code,
                message,
            }) => {
                assert_eq!(status_code, 401);
                assert_eq!(message, "invalid key");
            }
            other => panic!("expected Api error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn missing_content_field_is_unexpected_response() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("POST", "/v1/chat/completions")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"choices":[]}"#)
            .create_async()
            .await;

        let mut client = test_client(Some("test-key"));
        client.set_base_url(server.url());

        let result = client.extract("system", "user").await;
        assert!(matches!(result, Err(ProviderError::UnexpectedResponse(_))));
    }
}
