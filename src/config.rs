//! # AI Configuration Module
//!
//! Environment-resolved settings for the AI extraction adapter. Resolution
//! never validates credentials; a missing API key only surfaces when the
//! provider is actually called.
//!
//! Recognized environment values:
//!
//! - `AI_PROVIDER`: provider selector (`openai`, `anthropic`, `ollama`)
//! - `AI_MODEL`: model override (per-provider default when unset)
//! - `AI_MAX_TOKENS`: completion token cap (default 2000)
//! - `AI_TEMPERATURE`: sampling temperature (default 0.1)
//! - `OPENAI_API_KEY` / `ANTHROPIC_API_KEY`: hosted-provider credentials
//! - `OLLAMA_BASE_URL`: local inference server (default `http://localhost:11434`)

use serde::Serialize;

/// Default model when `AI_MODEL` is unset, per provider.
pub const DEFAULT_OPENAI_MODEL: &str = "gpt-3.5-turbo";
pub const DEFAULT_ANTHROPIC_MODEL: &str = "claude-3-haiku-20240307";
pub const DEFAULT_OLLAMA_MODEL: &str = "llama2";

const DEFAULT_OLLAMA_BASE_URL: &str = "http://localhost:11434";
const DEFAULT_MAX_TOKENS: u32 = 2000;
const DEFAULT_TEMPERATURE: f32 = 0.1;

/// Settings for the AI extraction adapter
#[derive(Debug, Clone)]
pub struct AiSettings {
    /// Configured provider name, as given (None disables AI extraction)
    pub provider: Option<String>,

    /// Model override; per-provider default when None
    pub model: Option<String>,

    /// API key for the OpenAI provider
    pub openai_api_key: Option<String>,

    /// API key for the Anthropic provider
    pub anthropic_api_key: Option<String>,

    /// Base URL of the local Ollama server
    pub ollama_base_url: String,

    /// Maximum completion tokens per extraction
    pub max_tokens: u32,

    /// Sampling temperature
    pub temperature: f32,
}

impl Default for AiSettings {
    fn default() -> Self {
        Self {
            provider: None,
            model: None,
            openai_api_key: None,
            anthropic_api_key: None,
            ollama_base_url: DEFAULT_OLLAMA_BASE_URL.to_string(),
            max_tokens: DEFAULT_MAX_TOKENS,
            temperature: DEFAULT_TEMPERATURE,
        }
    }
}

impl AiSettings {
    /// Resolve settings from the environment.
    ///
    /// Unparseable numeric values fall back to the defaults rather than
    /// failing; credential presence is not checked here.
    pub fn from_env() -> Self {
        let non_empty = |name: &str| std::env::var(name).ok().filter(|v| !v.trim().is_empty());

        Self {
            provider: non_empty("AI_PROVIDER"),
            model: non_empty("AI_MODEL"),
            openai_api_key: non_empty("OPENAI_API_KEY"),
            anthropic_api_key: non_empty("ANTHROPIC_API_KEY"),
            ollama_base_url: non_empty("OLLAMA_BASE_URL")
                .unwrap_or_else(|| DEFAULT_OLLAMA_BASE_URL.to_string()),
            max_tokens: non_empty("AI_MAX_TOKENS")
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_MAX_TOKENS),
            temperature: non_empty("AI_TEMPERATURE")
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_TEMPERATURE),
        }
    }

    /// The model to use for the given provider name, applying the
    /// per-provider default when no override is configured.
    pub fn model_for(&self, provider: &str) -> String {
        if let Some(model) = &self.model {
            return model.clone();
        }

        match provider.to_ascii_lowercase().as_str() {
            "anthropic" => DEFAULT_ANTHROPIC_MODEL.to_string(),
            "ollama" => DEFAULT_OLLAMA_MODEL.to_string(),
            _ => DEFAULT_OPENAI_MODEL.to_string(),
        }
    }

    /// Whether the configured provider has the credential it needs.
    ///
    /// Ollama needs none, so it always reports true; an absent provider
    /// reports false.
    pub fn has_credential(&self) -> bool {
        match self.provider.as_deref().map(str::to_ascii_lowercase) {
            Some(p) if p == "openai" => self.openai_api_key.is_some(),
            Some(p) if p == "anthropic" => self.anthropic_api_key.is_some(),
            Some(p) if p == "ollama" => true,
            _ => false,
        }
    }

    /// Display snapshot of the configuration
    pub fn summary(&self) -> AiConfigSummary {
        AiConfigSummary {
            enabled: self.provider.is_some(),
            provider: self.provider.clone(),
            model: self.provider.as_deref().map(|p| self.model_for(p)),
            has_api_key: self.has_credential(),
            max_tokens: self.max_tokens,
            temperature: self.temperature,
        }
    }
}

/// Snapshot of the AI configuration for display
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AiConfigSummary {
    /// Whether an AI provider is configured at all
    pub enabled: bool,

    /// Configured provider name
    pub provider: Option<String>,

    /// Resolved model name
    pub model: Option<String>,

    /// Whether the required credential is present (always true for Ollama)
    pub has_api_key: bool,

    /// Completion token cap
    pub max_tokens: u32,

    /// Sampling temperature
    pub temperature: f32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_have_no_provider() {
        let settings = AiSettings::default();

        assert!(settings.provider.is_none());
        assert_eq!(settings.ollama_base_url, "http://localhost:11434");
        assert_eq!(settings.max_tokens, 2000);
        assert!((settings.temperature - 0.1).abs() < f32::EPSILON);
    }

    #[test]
    fn model_for_applies_provider_defaults() {
        let settings = AiSettings::default();

        assert_eq!(settings.model_for("openai"), "gpt-3.5-turbo");
        assert_eq!(settings.model_for("anthropic"), "claude-3-haiku-20240307");
        assert_eq!(settings.model_for("ollama"), "llama2");
    }

    #[test]
    fn model_override_wins_over_default() {
        let settings = AiSettings {
            model: Some("gpt-4".to_string()),
            ..AiSettings::default()
        };

        assert_eq!(settings.model_for("openai"), "gpt-4");
        assert_eq!(settings.model_for("ollama"), "gpt-4");
    }

    #[test]
    fn summary_reports_credential_presence() {
        let disabled = AiSettings::default();
        assert!(!disabled.summary().enabled);
        assert!(!disabled.summary().has_api_key);

        let openai_no_key = AiSettings {
            provider: Some("openai".to_string()),
            ..AiSettings::default()
        };
        let summary = openai_no_key.summary();
        assert!(summary.enabled);
        assert!(!summary.has_api_key);
        assert_eq!(summary.model.as_deref(), Some("gpt-3.5-turbo"));

        let ollama = AiSettings {
            provider: Some("ollama".to_string()),
            ..AiSettings::default()
        };
        assert!(ollama.summary().has_api_key);
    }

    #[test]
    fn summary_serializes_with_camel_case_keys() {
        let settings = AiSettings {
            provider: Some("anthropic".to_string()),
            anthropic_api_key: Some("sk-test".to_string()),
            ..AiSettings::default()
        };

        let value = serde_json::to_value(settings.summary()).unwrap();
        assert_eq!(value["enabled"], true);
        assert_eq!(value["hasApiKey"], true);
        assert_eq!(value["maxTokens"], 2000);
        assert_eq!(value["model"], "claude-3-haiku-20240307");
    }
}
