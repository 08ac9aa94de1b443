//! Crawl pipeline
//!
//! Orchestrates one crawl end to end: validate the URL, render the page,
//! route the extraction, assemble a record, and persist it. Renderer failures
//! do not propagate; they are stored as error records and returned as success
//! values, so every submitted crawl yields a viewable row. The only hard
//! errors from [`Pipeline::crawl`] are an invalid URL and a store failure.

use async_trait::async_trait;
use chrono::Utc;
use serde_json::json;
use tokio::sync::Semaphore;
use tracing::{debug, instrument, warn};

use crate::error::{Error, Result};
use crate::extract::{ExtractionOutcome, ExtractionRouter};
use crate::renderer::{RenderError, RenderedPage, Renderer};
use crate::store::{CrawlRecord, CrawlStatus, Database, NewCrawlRecord};

/// Default cap on concurrent renders
pub const DEFAULT_RENDER_PERMITS: usize = 4;

/// Source of rendered pages; the seam between the pipeline and the browser
#[async_trait]
pub trait PageSource: Send + Sync {
    /// Fetch one settled page.
    async fn fetch(&self, url: &str) -> std::result::Result<RenderedPage, RenderError>;
}

#[async_trait]
impl PageSource for Renderer {
    async fn fetch(&self, url: &str) -> std::result::Result<RenderedPage, RenderError> {
        self.render(url).await
    }
}

/// The crawl pipeline
pub struct Pipeline {
    source: Box<dyn PageSource>,
    router: ExtractionRouter,
    db: Database,
    render_slots: Semaphore,
}

impl Pipeline {
    /// Build a pipeline with the default render concurrency cap.
    pub fn new(source: Box<dyn PageSource>, router: ExtractionRouter, db: Database) -> Self {
        Self::with_render_permits(source, router, db, DEFAULT_RENDER_PERMITS)
    }

    /// Build a pipeline with an explicit render concurrency cap.
    pub fn with_render_permits(
        source: Box<dyn PageSource>,
        router: ExtractionRouter,
        db: Database,
        permits: usize,
    ) -> Self {
        Self {
            source,
            router,
            db,
            render_slots: Semaphore::new(permits),
        }
    }

    /// Run one crawl and return the stored record.
    ///
    /// The semaphore permit covers only the render phase; extraction and the
    /// database write run after the tab is released.
    #[instrument(skip(self, prompt))]
    pub async fn crawl(&self, url: &str, prompt: Option<&str>) -> Result<CrawlRecord> {
        validate_url(url)?;

        let rendered = {
            let _permit = self
                .render_slots
                .acquire()
                .await
                .map_err(|_| Error::Other("render slots closed".to_string()))?;
            self.source.fetch(url).await
        };

        let record = match rendered {
            Ok(page) => {
                let outcome = self.router.route(&page.text_content, prompt).await;
                debug!(provider = %outcome.provider, "assembling crawl record");
                assemble(&page, &outcome, prompt)
            }
            Err(err) => {
                warn!(error = %err, "render failed; storing error record");
                assemble_error(url, &err.to_string())
            }
        };

        let id = self.db.insert_record(&record).await?;
        Ok(record.into_record(id))
    }
}

/// Reject non-absolute or non-http(s) URLs before any render is attempted.
fn validate_url(url: &str) -> Result<()> {
    let parsed = url::Url::parse(url).map_err(|e| Error::InvalidUrl(format!("{url}: {e}")))?;
    match parsed.scheme() {
        "http" | "https" => Ok(()),
        scheme => Err(Error::InvalidUrl(format!(
            "{url}: unsupported scheme '{scheme}'"
        ))),
    }
}

/// Assemble the success record for a rendered page and its extraction.
fn assemble(page: &RenderedPage, outcome: &ExtractionOutcome, prompt: Option<&str>) -> NewCrawlRecord {
    let mut metadata = page.metadata.clone();
    metadata.extraction_prompt = prompt
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(str::to_string);

    let mut value = serde_json::to_value(&metadata).unwrap_or_else(|_| json!({}));
    if let serde_json::Value::Object(map) = &mut value {
        map.insert("url".to_string(), json!(page.source_url));
        map.insert("title".to_string(), json!(page.title));
        map.insert("provider".to_string(), json!(outcome.provider.as_str()));
        map.insert("model".to_string(), json!(outcome.model));
    }

    let title = if page.title.is_empty() {
        None
    } else {
        Some(page.title.clone())
    };

    NewCrawlRecord {
        url: page.source_url.clone(),
        title,
        content: outcome.content.clone(),
        metadata: value,
        // Assembly time, not render start; elapsed duration is not derivable
        crawled_at: Utc::now(),
        status: CrawlStatus::Success,
    }
}

/// Assemble the error record for a failed render.
fn assemble_error(request_url: &str, message: &str) -> NewCrawlRecord {
    NewCrawlRecord {
        url: request_url.to_string(),
        title: None,
        content: message.to_string(),
        metadata: json!({
            "error": message,
            "url": request_url,
        }),
        crawled_at: Utc::now(),
        status: CrawlStatus::Error,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use scraper::Html;
    use tempfile::tempdir;

    use crate::extract::{ExtractionProvider, HeuristicStrategy};
    use crate::renderer::PageMetadata;

    struct StubSource {
        calls: Arc<AtomicUsize>,
        result: StubResult,
    }

    enum StubResult {
        Page { title: &'static str, text: &'static str },
        Fail(&'static str),
    }

    #[async_trait]
    impl PageSource for StubSource {
        async fn fetch(&self, url: &str) -> std::result::Result<RenderedPage, RenderError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match &self.result {
                StubResult::Page { title, text } => {
                    let mut metadata =
                        PageMetadata::from_document(&Html::parse_document("<html></html>"));
                    metadata.content_length = text.len();
                    Ok(RenderedPage {
                        title: title.to_string(),
                        text_content: text.to_string(),
                        metadata,
                        source_url: url.to_string(),
                    })
                }
                StubResult::Fail(message) => Err(RenderError::Navigation {
                    url: url.to_string(),
                    message: message.to_string(),
                }),
            }
        }
    }

    async fn test_pipeline(result: StubResult) -> (Pipeline, Arc<AtomicUsize>, tempfile::TempDir) {
        let temp_dir = tempdir().unwrap();
        let db_path = temp_dir
            .path()
            .join("test.db")
            .to_string_lossy()
            .to_string();
        let db = Database::new_from_path(&db_path).await.unwrap();

        let calls = Arc::new(AtomicUsize::new(0));
        let source = StubSource {
            calls: calls.clone(),
            result,
        };
        let router = ExtractionRouter::new(vec![Box::new(HeuristicStrategy)]);

        (
            Pipeline::new(Box::new(source), router, db),
            calls,
            temp_dir,
        )
    }

    async fn row_count(pipeline: &Pipeline) -> usize {
        pipeline.db.list_records(100, 0).await.unwrap().len()
    }

    #[tokio::test]
    async fn invalid_url_fails_before_any_render() {
        let (pipeline, calls, _dir) = test_pipeline(StubResult::Page {
            title: "t",
            text: "x",
        })
        .await;

        for bad in ["not a url", "ftp://example.com/file", "example.com"] {
            let result = pipeline.crawl(bad, None).await;
            assert!(matches!(result, Err(Error::InvalidUrl(_))), "url: {bad}");
        }
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert_eq!(row_count(&pipeline).await, 0);
    }

    #[tokio::test]
    async fn successful_crawl_stores_exactly_one_row() {
        let (pipeline, calls, _dir) = test_pipeline(StubResult::Page {
            title: "Example Domain",
            text: "This domain is for use in illustrative examples.",
        })
        .await;

        let record = pipeline.crawl("https://example.com", None).await.unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(row_count(&pipeline).await, 1);

        assert!(record.id > 0);
        assert_eq!(record.title.as_deref(), Some("Example Domain"));
        assert_eq!(record.status, CrawlStatus::Success);
        // No prompt: content passes through and no provider is attributed
        assert_eq!(
            record.content,
            "This domain is for use in illustrative examples."
        );
        assert_eq!(record.metadata["provider"], "none");
        assert!(record.metadata["extractionPrompt"].is_null());
        assert_eq!(record.metadata["url"], "https://example.com");
    }

    #[tokio::test]
    async fn prompted_crawl_attributes_the_heuristic() {
        let (pipeline, _calls, _dir) = test_pipeline(StubResult::Page {
            title: "Contact",
            text: "Email: a@b.com, Call 555-123-4567",
        })
        .await;

        let record = pipeline
            .crawl("https://example.com/contact", Some("extract contact information"))
            .await
            .unwrap();

        assert_eq!(record.metadata["provider"], "local-heuristic");
        assert_eq!(
            record.metadata["extractionPrompt"],
            "extract contact information"
        );
        assert!(record.content.contains("a@b.com"));
        assert!(record.content.contains("555-123-4567"));
    }

    #[tokio::test]
    async fn render_failure_stores_an_error_record() {
        let (pipeline, _calls, _dir) =
            test_pipeline(StubResult::Fail("net::ERR_NAME_NOT_RESOLVED")).await;

        let record = pipeline.crawl("https://bad.example", None).await.unwrap();
        assert_eq!(row_count(&pipeline).await, 1);

        assert_eq!(record.status, CrawlStatus::Error);
        assert_eq!(record.title, None);
        assert!(record.content.contains("net::ERR_NAME_NOT_RESOLVED"));
        assert_eq!(record.metadata["url"], "https://bad.example");
        assert!(
            record.metadata["error"]
                .as_str()
                .unwrap()
                .contains("net::ERR_NAME_NOT_RESOLVED")
        );

        // The stored row reads back identically
        let stored = pipeline.db.get_record(record.id).await.unwrap().unwrap();
        assert_eq!(stored.content, record.content);
        assert_eq!(stored.metadata, record.metadata);
    }

    #[tokio::test]
    async fn empty_title_assembles_to_none() {
        let (pipeline, _calls, _dir) = test_pipeline(StubResult::Page {
            title: "",
            text: "page without a title",
        })
        .await;

        let record = pipeline.crawl("https://example.com", None).await.unwrap();
        assert_eq!(record.title, None);
        // The metadata echo keeps the empty string form
        assert_eq!(record.metadata["title"], "");
    }

    #[test]
    fn outcome_provider_reaches_the_metadata() {
        let page = RenderedPage {
            title: "T".to_string(),
            text_content: "text".to_string(),
            metadata: PageMetadata::from_document(&Html::parse_document("<html></html>")),
            source_url: "https://example.com".to_string(),
        };
        let outcome = ExtractionOutcome {
            content: "extracted".to_string(),
            provider: ExtractionProvider::Openai,
            model: Some("gpt-3.5-turbo".to_string()),
        };

        let record = assemble(&page, &outcome, Some("find things"));
        assert_eq!(record.metadata["provider"], "openai");
        assert_eq!(record.metadata["model"], "gpt-3.5-turbo");
        assert_eq!(record.metadata["extractionPrompt"], "find things");
        assert_eq!(record.content, "extracted");
    }
}
