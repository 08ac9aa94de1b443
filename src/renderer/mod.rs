//! Page renderer module
//!
//! Drives a shared headless-Chromium engine to a target URL, waits for the
//! content to settle, strips non-content DOM nodes, and yields the page's
//! title, whitespace-normalized text, and metadata.

mod config;
mod engine;
pub mod error;
mod metadata;
mod page;

pub use config::{RendererConfig, RendererConfigBuilder};
pub use engine::RenderEngine;
pub use error::RenderError;
pub use metadata::{CRAWL_METHOD, PageMetadata};

use std::sync::Arc;

use chromiumoxide::Page;
use chromiumoxide::cdp::browser_protocol::network::SetUserAgentOverrideParams;
use chromiumoxide::error::CdpError;
use scraper::Html;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

/// A rendered page: settled title, text, and metadata
///
/// Produced once per render attempt and owned by the pipeline invocation that
/// created it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderedPage {
    /// Resolved page title (`<title>`, else first `<h1>`, else empty)
    pub title: String,

    /// Body text with boilerplate removed and whitespace normalized
    pub text_content: String,

    /// Metadata harvested from the document
    pub metadata: PageMetadata,

    /// URL this page was rendered from
    pub source_url: String,
}

/// Renders URLs against a shared [`RenderEngine`]
///
/// Each render acquires a fresh tab scoped to that call and releases it
/// whether the render succeeds or fails; no tab is shared across concurrent
/// renders.
pub struct Renderer {
    engine: Arc<RenderEngine>,
    config: RendererConfig,
}

impl Renderer {
    /// Create a renderer over the given engine
    pub fn new(engine: Arc<RenderEngine>, config: RendererConfig) -> Self {
        Self { engine, config }
    }

    /// Render a URL to a settled page.
    ///
    /// Waits for the page load event (not network-idle, so long-polling pages
    /// terminate), then applies the configured settle delay for deferred
    /// scripts before capturing the document.
    #[instrument(skip(self), level = "debug")]
    pub async fn render(&self, url: &str) -> Result<RenderedPage, RenderError> {
        let page = self.engine.new_page().await?;

        let captured = self.capture(&page, url).await;

        // Release the tab regardless of how the capture went
        if let Err(err) = page.close().await {
            debug!(error = %err, "failed to close tab");
        }

        let html = captured?;
        Ok(process_document(&html, url, &self.config))
    }

    async fn capture(&self, page: &Page, url: &str) -> Result<String, RenderError> {
        let user_agent = SetUserAgentOverrideParams::new(self.config.user_agent.clone());
        if let Err(err) = page.set_user_agent(user_agent).await {
            debug!(error = %err, "failed to set user agent");
        }

        let navigation = async {
            page.goto(url).await?;
            page.wait_for_navigation().await?;
            Ok::<_, CdpError>(())
        };

        match tokio::time::timeout(self.config.timeout(), navigation).await {
            Ok(Ok(())) => {}
            Ok(Err(err)) => {
                return Err(RenderError::Navigation {
                    url: url.to_string(),
                    message: err.to_string(),
                });
            }
            Err(_) => {
                return Err(RenderError::Timeout {
                    url: url.to_string(),
                    timeout_ms: self.config.timeout_ms,
                });
            }
        }

        // Let deferred scripts populate the DOM
        tokio::time::sleep(self.config.settle_delay()).await;

        page.content()
            .await
            .map_err(|e| RenderError::Engine(e.to_string()))
    }
}

/// Build a [`RenderedPage`] from captured HTML.
fn process_document(html: &str, url: &str, config: &RendererConfig) -> RenderedPage {
    let document = Html::parse_document(html);

    let title = page::extract_title(&document);
    let text_content = page::extract_text(&document, &config.exclude_selectors);

    let mut metadata = PageMetadata::from_document(&document);
    metadata.content_length = text_content.len();

    RenderedPage {
        title,
        text_content,
        metadata,
        source_url: url.to_string(),
    }
}
