//! Local heuristic extractor
//!
//! Prompt-driven rule engine used when no AI provider is configured or the
//! configured provider fails. Classifies the prompt into a category by
//! keyword hits against an ordered lexicon table, applies category-specific
//! regex extraction, and degrades through keyword matching and paragraph
//! relevance down to a truncated passthrough. Never fails; the original page
//! text is always carried in the output, only annotated.

use regex::Regex;

/// Extraction category, classified from the prompt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    Contact,
    Prices,
    Games,
    Products,
    Events,
    People,
    Links,
    /// Zero-hit default; no category patterns, straight to keyword matching
    Text,
}

/// Ordered lexicon table. Ties between categories resolve to the
/// earlier-declared entry, so this order is part of the contract.
const LEXICONS: &[(Category, &[&str])] = &[
    (
        Category::Contact,
        &["contact", "email", "phone", "address", "call", "reach"],
    ),
    (
        Category::Prices,
        &["price", "prices", "cost", "dollar", "fee", "charge", "pricing", "payment"],
    ),
    (
        Category::Games,
        &["game", "games", "gaming", "play", "player"],
    ),
    (
        Category::Products,
        &["product", "products", "item", "items", "buy", "shop", "sale"],
    ),
    (
        Category::Events,
        &["event", "events", "date", "dates", "schedule", "calendar", "when"],
    ),
    (
        Category::People,
        &["people", "person", "name", "names", "who", "staff", "team", "author"],
    ),
    (
        Category::Links,
        &["link", "links", "url", "urls", "website", "websites"],
    ),
];

/// Prompt tokens ignored by the keyword-overlap fallback
const STOPWORDS: &[&str] = &[
    "the", "and", "for", "with", "from", "this", "that", "what", "which", "extract", "find",
    "show", "list", "give", "please", "about", "information", "page", "content", "want", "need",
    "all",
];

const MAX_KEYWORD_LINES: usize = 20;
const MAX_PARAGRAPHS: usize = 5;
const MIN_PARAGRAPH_LEN: usize = 50;
const PASSTHROUGH_CHARS: usize = 1000;

/// Extract the prompt-relevant part of `content`, infallibly.
///
/// The result always wraps the extracted snippet together with the full
/// original content under fixed labeled sections.
pub fn extract_locally(content: &str, prompt: &str) -> String {
    let category = classify_prompt(prompt);

    let snippet = Patterns::new()
        .ok()
        .and_then(|patterns| category_extract(&patterns, category, content))
        .or_else(|| keyword_match(content, prompt))
        .or_else(|| paragraph_relevance(content, prompt))
        .unwrap_or_else(|| truncated_passthrough(content));

    format!(
        "Extraction Request: \"{prompt}\"\n\nExtracted Content:\n{snippet}\n\nFull Page Content:\n{content}"
    )
}

/// Classify a prompt by counting lexicon hits; most hits wins, ties keep the
/// earlier-declared category, zero hits selects [`Category::Text`].
pub fn classify_prompt(prompt: &str) -> Category {
    let lower = prompt.to_lowercase();

    let mut best = Category::Text;
    let mut best_hits = 0usize;
    for (category, keywords) in LEXICONS {
        let hits = keywords.iter().filter(|kw| lower.contains(**kw)).count();
        if hits > best_hits {
            best_hits = hits;
            best = *category;
        }
    }
    best
}

struct Patterns {
    email: Regex,
    phone: Regex,
    address: Regex,
    price_symbol: Regex,
    price_word: Regex,
    date: Regex,
    time: Regex,
    person: Regex,
    link: Regex,
}

impl Patterns {
    fn new() -> Result<Self, regex::Error> {
        Ok(Self {
            email: Regex::new(r"[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}")?,
            phone: Regex::new(r"(?:\+1[\s.-]?)?\(?\d{3}\)?[\s.-]?\d{3}[\s.-]?\d{4}")?,
            address: Regex::new(
                r"\d+\s+(?:[A-Za-z]+\s+){1,4}(?:Street|St|Avenue|Ave|Road|Rd|Boulevard|Blvd|Drive|Dr|Lane|Ln|Court|Ct|Place|Pl|Way)\b",
            )?,
            price_symbol: Regex::new(r"\$\d+(?:,\d{3})*(?:\.\d{1,2})?")?,
            price_word: Regex::new(
                r"(?i)\b\d+(?:\.\d{1,2})?\s?(?:USD|EUR|GBP|dollars|euros|pounds)\b",
            )?,
            date: Regex::new(
                r"(?i)\b(?:\d{1,2}[/-]\d{1,2}[/-]\d{2,4}|(?:January|February|March|April|May|June|July|August|September|October|November|December)\s+\d{1,2}(?:,\s*\d{4})?)\b",
            )?,
            time: Regex::new(r"\b\d{1,2}:\d{2}(?:\s?(?:AM|PM|am|pm))?\b")?,
            person: Regex::new(
                r"\b(?:Mr|Mrs|Ms|Dr|Prof)\.?\s+[A-Z][a-z]+(?:\s+[A-Z][a-z]+)?|\b[A-Z][a-z]+\s+[A-Z][a-z]+(?:,\s+(?:CEO|CTO|CFO|COO|Director|Manager|President|Founder|Engineer))?",
            )?,
            link: Regex::new(r#"https?://[^\s"'<>]+"#)?,
        })
    }
}

/// Category-specific pattern extraction; None when nothing matched.
fn category_extract(patterns: &Patterns, category: Category, content: &str) -> Option<String> {
    match category {
        Category::Contact => {
            let groups = [
                ("Emails:", find_all(&patterns.email, content)),
                ("Phone Numbers:", find_all(&patterns.phone, content)),
                ("Addresses:", find_all(&patterns.address, content)),
            ];
            join_groups(&groups)
        }
        Category::Prices => {
            let mut prices = find_all(&patterns.price_symbol, content);
            for word_price in find_all(&patterns.price_word, content) {
                if !prices.contains(&word_price) {
                    prices.push(word_price);
                }
            }
            join_groups(&[("Prices:", prices)])
        }
        Category::Games => keyword_lines(content, lexicon(Category::Games), "Games:"),
        Category::Products => keyword_lines(content, lexicon(Category::Products), "Products:"),
        Category::Events => {
            let groups = [
                ("Dates:", find_all(&patterns.date, content)),
                ("Times:", find_all(&patterns.time, content)),
            ];
            join_groups(&groups)
        }
        Category::People => join_groups(&[("People:", find_all(&patterns.person, content))]),
        Category::Links => join_groups(&[("Links:", find_all(&patterns.link, content))]),
        Category::Text => None,
    }
}

fn lexicon(category: Category) -> &'static [&'static str] {
    LEXICONS
        .iter()
        .find(|(c, _)| *c == category)
        .map(|(_, keywords)| *keywords)
        .unwrap_or(&[])
}

/// All matches, deduplicated in first-seen order.
fn find_all(re: &Regex, content: &str) -> Vec<String> {
    let mut seen = Vec::new();
    for m in re.find_iter(content) {
        let text = m.as_str().to_string();
        if !seen.contains(&text) {
            seen.push(text);
        }
    }
    seen
}

/// Join non-empty labeled groups; None when every group is empty.
fn join_groups(groups: &[(&str, Vec<String>)]) -> Option<String> {
    let sections: Vec<String> = groups
        .iter()
        .filter(|(_, matches)| !matches.is_empty())
        .map(|(label, matches)| format!("{label}\n{}", matches.join("\n")))
        .collect();

    if sections.is_empty() {
        None
    } else {
        Some(sections.join("\n\n"))
    }
}

/// Lines containing a category keyword, within the length band that filters
/// out menu fragments and whole paragraphs.
fn keyword_lines(content: &str, keywords: &[&str], label: &str) -> Option<String> {
    let mut lines = Vec::new();
    for line in content.lines() {
        let trimmed = line.trim();
        if !(10..=200).contains(&trimmed.len()) {
            continue;
        }
        let lower = trimmed.to_lowercase();
        if keywords.iter().any(|kw| lower.contains(*kw)) {
            lines.push(trimmed);
        }
    }

    if lines.is_empty() {
        None
    } else {
        Some(format!("{label}\n{}", lines.join("\n")))
    }
}

/// Prompt tokens surviving stopword and length filtering.
fn prompt_keywords(prompt: &str) -> Vec<String> {
    prompt
        .to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|token| token.len() >= 4 && !STOPWORDS.contains(token))
        .map(str::to_string)
        .collect()
}

/// Content lines containing any surviving prompt token, capped.
fn keyword_match(content: &str, prompt: &str) -> Option<String> {
    let keywords = prompt_keywords(prompt);
    if keywords.is_empty() {
        return None;
    }

    let mut lines = Vec::new();
    for line in content.lines() {
        let lower = line.to_lowercase();
        if keywords.iter().any(|kw| lower.contains(kw.as_str())) {
            lines.push(line.trim());
            if lines.len() == MAX_KEYWORD_LINES {
                break;
            }
        }
    }

    if lines.is_empty() {
        None
    } else {
        Some(lines.join("\n"))
    }
}

/// Paragraphs (blank-line separated, minimum length) containing a prompt
/// token, capped.
fn paragraph_relevance(content: &str, prompt: &str) -> Option<String> {
    let keywords = prompt_keywords(prompt);
    if keywords.is_empty() {
        return None;
    }

    let mut paragraphs = Vec::new();
    for paragraph in content.split("\n\n") {
        let trimmed = paragraph.trim();
        if trimmed.len() < MIN_PARAGRAPH_LEN {
            continue;
        }
        let lower = trimmed.to_lowercase();
        if keywords.iter().any(|kw| lower.contains(kw.as_str())) {
            paragraphs.push(trimmed);
            if paragraphs.len() == MAX_PARAGRAPHS {
                break;
            }
        }
    }

    if paragraphs.is_empty() {
        None
    } else {
        Some(paragraphs.join("\n\n"))
    }
}

/// Final floor: the leading slice of the content plus an ellipsis marker.
fn truncated_passthrough(content: &str) -> String {
    let cut = match content.char_indices().nth(PASSTHROUGH_CHARS) {
        Some((idx, _)) => &content[..idx],
        None => content,
    };
    format!("{cut}...")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_contact_prompts() {
        assert_eq!(classify_prompt("extract contact information"), Category::Contact);
        assert_eq!(classify_prompt("get all email addresses"), Category::Contact);
    }

    #[test]
    fn classifies_each_category() {
        assert_eq!(classify_prompt("list the prices"), Category::Prices);
        assert_eq!(classify_prompt("which games are featured"), Category::Games);
        assert_eq!(classify_prompt("show me the products for sale"), Category::Products);
        assert_eq!(classify_prompt("upcoming events and dates"), Category::Events);
        assert_eq!(classify_prompt("who is on the team"), Category::People);
        assert_eq!(classify_prompt("collect all links"), Category::Links);
    }

    #[test]
    fn zero_hit_prompt_defaults_to_text() {
        assert_eq!(classify_prompt("summarize the weather"), Category::Text);
        assert_eq!(classify_prompt(""), Category::Text);
    }

    #[test]
    fn ties_resolve_by_declaration_order() {
        // One hit each for prices and events; prices is declared earlier
        assert_eq!(classify_prompt("price of the event"), Category::Prices);
        // One hit each for contact and links; contact is declared earlier
        assert_eq!(classify_prompt("contact link"), Category::Contact);
    }

    #[test]
    fn contact_extraction_labels_emails_and_phones() {
        let content = "Welcome. Email: a@b.com, Call 555-123-4567 for details.";
        let output = extract_locally(content, "extract contact information");

        let emails = output.find("Emails:\na@b.com").expect("emails section");
        let phones = output
            .find("Phone Numbers:\n555-123-4567")
            .expect("phones section");
        let full = output.find("Full Page Content:").expect("full content section");

        assert!(emails < full);
        assert!(phones < full);
        assert!(output.contains(content));
    }

    #[test]
    fn contact_extraction_finds_street_addresses() {
        let content = "Visit us at 123 Main Street or 456 Oak Grove Ave anytime.";
        let output = extract_locally(content, "what is your address");

        assert!(output.contains("Addresses:"));
        assert!(output.contains("123 Main Street"));
        assert!(output.contains("456 Oak Grove Ave"));
    }

    #[test]
    fn price_extraction_collects_symbol_and_word_forms() {
        let content = "Basic plan $9.99, premium $1,299. Enterprise from 500 USD.";
        let output = extract_locally(content, "list the prices");

        assert!(output.contains("Prices:"));
        assert!(output.contains("$9.99"));
        assert!(output.contains("$1,299"));
        assert!(output.contains("500 USD"));
    }

    #[test]
    fn event_extraction_reports_dates_and_times_separately() {
        let content = "Doors open 12/31/2024 at 7:30 PM. Encore on January 1, 2025.";
        let output = extract_locally(content, "when are the events");

        let dates = output.find("Dates:").expect("dates section");
        let times = output.find("Times:").expect("times section");
        assert!(dates < times);
        assert!(output.contains("12/31/2024"));
        assert!(output.contains("January 1, 2025"));
        assert!(output.contains("7:30 PM"));
    }

    #[test]
    fn link_extraction_collects_http_tokens() {
        let content = "See https://example.com/docs and http://other.org for more.";
        let output = extract_locally(content, "collect all links");

        assert!(output.contains("Links:"));
        assert!(output.contains("https://example.com/docs"));
        assert!(output.contains("http://other.org"));
    }

    #[test]
    fn matches_deduplicate_in_first_seen_order() {
        let content = "a@b.com then c@d.com then a@b.com again";
        let output = extract_locally(content, "find email contacts");

        assert!(output.contains("Emails:\na@b.com\nc@d.com"));
    }

    #[test]
    fn game_lines_respect_the_length_band() {
        let content = "play\nThis game of chess runs nightly in the main hall\nx";
        let output = extract_locally(content, "which games are featured");

        assert!(output.contains("Games:"));
        assert!(output.contains("This game of chess runs nightly"));
        // The 4-char line "play" falls below the band
        assert!(!output.contains("Games:\nplay"));
    }

    #[test]
    fn keyword_fallback_keeps_matching_lines() {
        // "weather" classifies as text; no category patterns apply
        let content = "The weather today is sunny.\nUnrelated line.\nWeather tomorrow: rain.";
        let output = extract_locally(content, "summarize the weather");

        assert!(output.contains("The weather today is sunny."));
        assert!(output.contains("Weather tomorrow: rain."));
        let extracted_start = output.find("Extracted Content:").unwrap();
        let unrelated = output.find("Unrelated line.").unwrap();
        let full_start = output.find("Full Page Content:").unwrap();
        // The unrelated line only appears in the full-content section
        assert!(unrelated > full_start && extracted_start < full_start);
    }

    #[test]
    fn keyword_fallback_caps_at_twenty_lines() {
        let content = (0..40)
            .map(|i| format!("weather report number {i}"))
            .collect::<Vec<_>>()
            .join("\n");
        let output = extract_locally(&content, "summarize the weather");

        let extracted = &output[output.find("Extracted Content:").unwrap()
            ..output.find("Full Page Content:").unwrap()];
        assert_eq!(extracted.matches("weather report").count(), 20);
    }

    #[test]
    fn unmatched_prompt_falls_through_to_truncated_passthrough() {
        let content = "z".repeat(3000);
        let output = extract_locally(&content, "find the xylophone schedule availability");

        let extracted = &output[output.find("Extracted Content:").unwrap()
            ..output.find("Full Page Content:").unwrap()];
        // Snippet is the first 1000 chars plus the ellipsis marker
        assert!(extracted.contains(&format!("{}...", "z".repeat(1000))));
        assert!(!extracted.contains(&"z".repeat(1001)));
    }

    #[test]
    fn output_always_carries_request_and_original_content() {
        let content = "short content";
        let output = extract_locally(content, "anything at all");

        assert!(output.starts_with("Extraction Request: \"anything at all\""));
        assert!(output.contains("Extracted Content:"));
        assert!(output.ends_with("Full Page Content:\nshort content"));
    }
}
