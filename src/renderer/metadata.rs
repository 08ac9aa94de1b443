//! Metadata extraction from rendered documents
//!
//! Harvests well-known `<meta>` and `<link>` tags by attribute lookup. Every
//! tag-derived field defaults to the empty string when the selector matches
//! nothing; the extractor never fails and is idempotent over a static
//! document.

use chrono::{DateTime, Utc};
use scraper::{Html, Selector};
use serde::{Deserialize, Serialize};

/// Tag identifying which renderer produced a page
pub const CRAWL_METHOD: &str = "headless-chromium";

/// Metadata for a rendered page
///
/// Serialized with camelCase keys so the stored JSON shape matches the
/// dashboard views reading it. `extraction_prompt` serializes to JSON null
/// when absent, never omitted, so "no extraction requested" stays
/// distinguishable from a missing field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageMetadata {
    /// `meta[name='description']`
    pub description: String,

    /// `meta[name='keywords']`
    pub keywords: String,

    /// `meta[property='og:title']`
    pub og_title: String,

    /// `meta[property='og:description']`
    pub og_description: String,

    /// `meta[property='og:image']`
    pub og_image: String,

    /// `link[rel='canonical']` href
    pub canonical: String,

    /// `meta[name='author']`
    pub author: String,

    /// Length of the whitespace-normalized page text
    pub content_length: usize,

    /// Capture time
    pub timestamp: DateTime<Utc>,

    /// Renderer that produced this page
    pub crawl_method: String,

    /// Echo of the request prompt; null when no extraction was requested
    pub extraction_prompt: Option<String>,
}

impl PageMetadata {
    /// Extract the tag-derived fields from a rendered document.
    ///
    /// `content_length` is stamped later, once the page text is known;
    /// `extraction_prompt` is stamped by the pipeline.
    pub fn from_document(document: &Html) -> Self {
        Self {
            description: meta_content(document, "meta[name='description']"),
            keywords: meta_content(document, "meta[name='keywords']"),
            og_title: meta_content(document, "meta[property='og:title']"),
            og_description: meta_content(document, "meta[property='og:description']"),
            og_image: meta_content(document, "meta[property='og:image']"),
            canonical: attr_value(document, "link[rel='canonical']", "href"),
            author: meta_content(document, "meta[name='author']"),
            content_length: 0,
            timestamp: Utc::now(),
            crawl_method: CRAWL_METHOD.to_string(),
            extraction_prompt: None,
        }
    }
}

fn meta_content(document: &Html, selector: &str) -> String {
    attr_value(document, selector, "content")
}

/// First match's attribute value, or the empty string.
fn attr_value(document: &Html, selector: &str, attr: &str) -> String {
    Selector::parse(selector)
        .ok()
        .and_then(|sel| {
            document
                .select(&sel)
                .next()
                .and_then(|element| element.value().attr(attr))
                .map(str::to_string)
        })
        .unwrap_or_default()
}
