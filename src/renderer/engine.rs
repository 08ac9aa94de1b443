//! Shared headless-browser engine
//!
//! One Chromium instance serves the whole process. It is lazily launched on
//! the first tab request (or eagerly via [`RenderEngine::init`]), and torn
//! down with [`RenderEngine::shutdown`]. When a running instance stops
//! handing out tabs, the engine relaunches the browser once before surfacing
//! the failure, so a crashed Chromium does not poison every later crawl.

use chromiumoxide::Page;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::handler::viewport::Viewport;
use futures::StreamExt;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::renderer::RendererConfig;
use crate::renderer::error::RenderError;

/// Chromium launch flags for containerized/headless environments
const BROWSER_ARGS: &[&str] = &["--no-sandbox", "--disable-dev-shm-usage", "--disable-gpu"];

/// Long-lived handle to the shared browser instance
pub struct RenderEngine {
    config: RendererConfig,
    inner: Mutex<Option<EngineInner>>,
}

struct EngineInner {
    browser: Browser,
    event_loop: JoinHandle<()>,
}

impl RenderEngine {
    /// Create an engine handle; the browser is not launched until first use.
    pub fn new(config: RendererConfig) -> Self {
        Self {
            config,
            inner: Mutex::new(None),
        }
    }

    /// Launch the browser eagerly instead of on the first tab request.
    pub async fn init(&self) -> Result<(), RenderError> {
        let mut guard = self.inner.lock().await;
        if guard.is_none() {
            *guard = Some(launch(&self.config).await?);
        }
        Ok(())
    }

    /// Acquire a fresh isolated tab.
    ///
    /// Launches the browser if it is not running. If the running instance
    /// refuses a tab, tears it down and relaunches once; a second refusal is
    /// surfaced as [`RenderError::Engine`].
    pub async fn new_page(&self) -> Result<Page, RenderError> {
        let mut guard = self.inner.lock().await;
        if guard.is_none() {
            *guard = Some(launch(&self.config).await?);
        }
        let inner = guard
            .as_mut()
            .ok_or_else(|| RenderError::Engine("browser not running".to_string()))?;

        match inner.browser.new_page("about:blank").await {
            Ok(page) => Ok(page),
            Err(err) => {
                warn!(error = %err, "tab acquisition failed, relaunching browser");
                if let Some(old) = guard.take() {
                    teardown(old).await;
                }

                let relaunched = launch(&self.config).await?;
                let page = relaunched
                    .browser
                    .new_page("about:blank")
                    .await
                    .map_err(|e| RenderError::Engine(e.to_string()))?;
                *guard = Some(relaunched);
                Ok(page)
            }
        }
    }

    /// Tear down the browser instance, if running.
    pub async fn shutdown(&self) {
        let mut guard = self.inner.lock().await;
        if let Some(inner) = guard.take() {
            teardown(inner).await;
        }
    }
}

async fn launch(config: &RendererConfig) -> Result<EngineInner, RenderError> {
    debug!(
        width = config.viewport_width,
        height = config.viewport_height,
        "launching headless browser"
    );

    let browser_config = BrowserConfig::builder()
        .viewport(Some(Viewport {
            width: config.viewport_width,
            height: config.viewport_height,
            ..Default::default()
        }))
        .args(BROWSER_ARGS.iter().copied())
        .build()
        .map_err(RenderError::Engine)?;

    let (browser, mut handler) = Browser::launch(browser_config)
        .await
        .map_err(|e| RenderError::Engine(format!("failed to launch browser: {e}")))?;

    // Drive the CDP event loop for the lifetime of this instance
    let event_loop = tokio::spawn(async move { while handler.next().await.is_some() {} });

    Ok(EngineInner {
        browser,
        event_loop,
    })
}

async fn teardown(mut inner: EngineInner) {
    if let Err(err) = inner.browser.close().await {
        debug!(error = %err, "browser close failed");
    }
    let _ = inner.browser.wait().await;
    inner.event_loop.abort();
}
