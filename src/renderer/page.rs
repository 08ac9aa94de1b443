//! Document processing for rendered pages
//!
//! Pure functions over the captured HTML: strip non-content nodes, resolve
//! the title, and read the body text with whitespace collapsed.

use std::collections::HashSet;

use scraper::{Html, Selector};
use tracing::warn;

/// Resolve the page title: `<title>` text, else the first `<h1>`, else empty.
pub fn extract_title(document: &Html) -> String {
    for selector_str in ["title", "h1"] {
        if let Ok(selector) = Selector::parse(selector_str) {
            if let Some(element) = document.select(&selector).next() {
                let text = element.text().collect::<String>().trim().to_string();
                if !text.is_empty() {
                    return text;
                }
            }
        }
    }

    String::new()
}

/// Read the body text, skipping every node under an excluded element.
///
/// Exclusion covers the element and all of its descendants, so a nav bar's
/// nested lists disappear along with the nav itself. The result has all
/// whitespace runs collapsed to single spaces and is trimmed at both ends.
pub fn extract_text(document: &Html, exclude_selectors: &[String]) -> String {
    let mut excluded = HashSet::new();
    for selector_str in exclude_selectors {
        match Selector::parse(selector_str) {
            Ok(selector) => {
                for element in document.select(&selector) {
                    excluded.insert(element.id());
                }
            }
            Err(e) => {
                warn!("failed to parse exclude selector '{}': {}", selector_str, e);
            }
        }
    }

    let Ok(body_selector) = Selector::parse("body") else {
        return String::new();
    };
    let Some(body) = document.select(&body_selector).next() else {
        return String::new();
    };

    let mut raw = String::new();
    for node in body.descendants() {
        let Some(text) = node.value().as_text() else {
            continue;
        };
        if node.ancestors().any(|a| excluded.contains(&a.id())) {
            continue;
        }
        raw.push_str(text);
        raw.push(' ');
    }

    normalize_whitespace(&raw)
}

/// Collapse all whitespace runs to single spaces and trim the ends.
pub fn normalize_whitespace(raw: &str) -> String {
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}
