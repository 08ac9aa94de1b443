//! # pagesift - Web Crawling with Prompt-Driven Content Extraction
//!
//! This crate renders web pages in a headless browser, extracts their text and
//! metadata, optionally refines the text against a natural-language extraction
//! prompt (via an AI provider or local heuristics), and persists every crawl
//! attempt as a record in a local database.
//!
//! ## Features
//!
//! - Headless-Chromium page rendering with deterministic boilerplate removal
//! - Metadata harvesting (description, keywords, Open Graph tags, canonical
//!   URL, author)
//! - Prompt-driven extraction routed through an ordered strategy list:
//!   configured AI provider first (OpenAI, Anthropic, or Ollama), local
//!   regex/keyword heuristics as the fallback
//! - Every crawl, success or failure, stored as exactly one record
//! - Async API with Tokio
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use pagesift::config::AiSettings;
//! use pagesift::extract::ExtractionRouter;
//! use pagesift::pipeline::Pipeline;
//! use pagesift::renderer::{RenderEngine, Renderer, RendererConfig};
//! use pagesift::store::Database;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = RendererConfig::default();
//!     let engine = Arc::new(RenderEngine::new(config.clone()));
//!     let renderer = Renderer::new(Arc::clone(&engine), config);
//!
//!     let router = ExtractionRouter::from_settings(&AiSettings::from_env())?;
//!     let db = Database::new_from_path("crawls.db").await?;
//!
//!     let pipeline = Pipeline::new(Box::new(renderer), router, db);
//!     let record = pipeline
//!         .crawl("https://example.com", Some("extract contact information"))
//!         .await?;
//!     println!("stored crawl #{}", record.id);
//!
//!     engine.shutdown().await;
//!     Ok(())
//! }
//! ```

mod error;

pub mod ai;
pub mod config;
pub mod extract;
pub mod pipeline;
pub mod renderer;
pub mod store;

pub use error::Error;

/// Re-export of common types for public use
pub mod prelude {
    pub use crate::error::Error;
    pub use crate::error::Result;
}
