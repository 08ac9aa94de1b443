//! # Renderer Configuration Module
//!
//! Configuration for the headless-browser page renderer: navigation timeout,
//! settle delay for deferred scripts, viewport dimensions, user agent, and the
//! CSS selectors stripped from the document before text extraction. Uses a
//! builder pattern for flexible configuration.

use std::time::Duration;

/// Configuration for the page renderer
#[derive(Debug, Clone)]
pub struct RendererConfig {
    /// Navigation timeout in milliseconds
    pub timeout_ms: u64,

    /// Settle delay after the load event, in milliseconds
    pub settle_ms: u64,

    /// Viewport width in pixels
    pub viewport_width: u32,

    /// Viewport height in pixels
    pub viewport_height: u32,

    /// User agent to present to the page
    pub user_agent: String,

    /// CSS selectors for elements to exclude from extracted text
    pub exclude_selectors: Vec<String>,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            timeout_ms: 60_000,
            settle_ms: 2_000,
            viewport_width: 1920,
            viewport_height: 1080,
            user_agent: format!("pagesift/{}", env!("CARGO_PKG_VERSION")),
            exclude_selectors: vec![
                "script".to_string(),
                "style".to_string(),
                "nav".to_string(),
                "header".to_string(),
                "footer".to_string(),
                "aside".to_string(),
                ".nav".to_string(),
                ".header".to_string(),
                ".footer".to_string(),
                ".sidebar".to_string(),
                ".ads".to_string(),
                ".advertisement".to_string(),
                ".cookie-banner".to_string(),
                "#cookie-banner".to_string(),
            ],
        }
    }
}

/// Builder for RendererConfig
#[derive(Debug, Default)]
pub struct RendererConfigBuilder {
    config: RendererConfig,
}

impl RendererConfigBuilder {
    /// Create a new builder with default configuration
    pub fn new() -> Self {
        Self {
            config: RendererConfig::default(),
        }
    }

    /// Set the navigation timeout in milliseconds
    pub fn timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.config.timeout_ms = timeout_ms;
        self
    }

    /// Set the post-load settle delay in milliseconds
    pub fn settle_ms(mut self, settle_ms: u64) -> Self {
        self.config.settle_ms = settle_ms;
        self
    }

    /// Set the viewport dimensions
    pub fn viewport(mut self, width: u32, height: u32) -> Self {
        self.config.viewport_width = width;
        self.config.viewport_height = height;
        self
    }

    /// Set the user agent
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.config.user_agent = user_agent.into();
        self
    }

    /// Set the CSS selectors to exclude from extracted text
    pub fn exclude_selectors(mut self, exclude_selectors: Vec<String>) -> Self {
        self.config.exclude_selectors = exclude_selectors;
        self
    }

    /// Build the configuration
    pub fn build(self) -> RendererConfig {
        self.config
    }
}

impl RendererConfig {
    /// Create a new builder
    pub fn builder() -> RendererConfigBuilder {
        RendererConfigBuilder::new()
    }

    /// Get the navigation timeout as a Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Get the settle delay as a Duration
    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_ms)
    }
}
