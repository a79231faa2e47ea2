//! HTML parser for extracting words and links
//!
//! This module turns an HTML page into a [`ParsedPage`]:
//! - Word counts from the visible text of the body
//! - Links to follow (from <a> tags and canonical links)

use crate::config::Config;
use crate::crawler::fetcher::{build_http_client, fetch_page};
use crate::crawler::{PageParser, ParsedPage};
use crate::url::{resolve_link, PatternSet};
use crate::{ParseError, RippleError};
use reqwest::Client;
use scraper::{ElementRef, Html, Node, Selector};
use std::collections::HashMap;
use url::Url;

/// Elements whose text is not part of the page's prose
const SKIPPED_ELEMENTS: &[&str] = &["script", "style", "noscript", "template"];

/// Page parser that fetches pages over HTTP
#[derive(Debug, Clone)]
pub struct HttpPageParser {
    client: Client,
    ignored_words: PatternSet,
}

impl HttpPageParser {
    /// Builds a parser from the user agent and ignored word settings
    pub fn new(config: &Config) -> Result<Self, RippleError> {
        Ok(Self {
            client: build_http_client(&config.user_agent)?,
            ignored_words: PatternSet::new(&config.crawler.ignored_words)?,
        })
    }
}

impl PageParser for HttpPageParser {
    async fn parse(&self, url: &str) -> Result<ParsedPage, ParseError> {
        let fetched = fetch_page(&self.client, url).await?;
        let base_url = Url::parse(&fetched.final_url)?;
        Ok(parse_html(&fetched.body, &base_url, &self.ignored_words))
    }
}

/// Parses HTML content and extracts word counts and links
///
/// # Word Rules
///
/// - Only text inside `<body>` counts, excluding script, style, noscript and
///   template contents
/// - Words are maximal runs of alphanumeric characters, lowercased
/// - Words fully matching any ignored pattern are dropped
///
/// # Link Extraction Rules
///
/// **Include:**
/// - `<a href="...">` tags
/// - `<link rel="canonical" href="...">`
///
/// **Exclude:**
/// - `<a href="..." download>`
/// - `javascript:`, `mailto:`, `tel:` links and data URIs
/// - Fragment-only links
///
/// # Example
///
/// ```
/// use ripple_count::crawler::parse_html;
/// use ripple_count::url::PatternSet;
/// use url::Url;
///
/// let html = r#"<html><body><p>Rust rust crab</p><a href="/page">Link</a></body></html>"#;
/// let base_url = Url::parse("https://example.com/").unwrap();
/// let parsed = parse_html(html, &base_url, &PatternSet::default());
/// assert_eq!(parsed.word_counts.get("rust"), Some(&2));
/// assert_eq!(parsed.links, vec!["https://example.com/page".to_string()]);
/// ```
pub fn parse_html(html: &str, base_url: &Url, ignored_words: &PatternSet) -> ParsedPage {
    let document = Html::parse_document(html);

    ParsedPage {
        word_counts: count_words(&document, ignored_words),
        links: extract_links(&document, base_url),
    }
}

/// Counts the words of the body's visible text
fn count_words(document: &Html, ignored_words: &PatternSet) -> HashMap<String, u64> {
    let mut counts = HashMap::new();

    let Ok(body_selector) = Selector::parse("body") else {
        return counts;
    };

    for body in document.select(&body_selector) {
        for node in body.descendants() {
            let Node::Text(text) = node.value() else {
                continue;
            };

            let skipped = node.ancestors().any(|ancestor| {
                ElementRef::wrap(ancestor)
                    .map(|element| SKIPPED_ELEMENTS.contains(&element.value().name()))
                    .unwrap_or(false)
            });
            if skipped {
                continue;
            }

            for word in text.split(|c: char| !c.is_alphanumeric()) {
                if word.is_empty() {
                    continue;
                }
                let word = word.to_lowercase();
                if ignored_words.matches(&word) {
                    continue;
                }
                *counts.entry(word).or_insert(0) += 1;
            }
        }
    }

    counts
}

/// Extracts all valid links from the HTML document
fn extract_links(document: &Html, base_url: &Url) -> Vec<String> {
    let mut links = Vec::new();

    // Extract links from <a> tags
    if let Ok(a_selector) = Selector::parse("a[href]") {
        for element in document.select(&a_selector) {
            // Skip if it has the download attribute
            if element.value().attr("download").is_some() {
                continue;
            }

            if let Some(absolute_url) = element
                .value()
                .attr("href")
                .and_then(|href| resolve_link(href, base_url))
            {
                links.push(absolute_url);
            }
        }
    }

    // Extract canonical link
    if let Ok(canonical_selector) = Selector::parse("link[rel='canonical'][href]") {
        for element in document.select(&canonical_selector) {
            if let Some(absolute_url) = element
                .value()
                .attr("href")
                .and_then(|href| resolve_link(href, base_url))
            {
                links.push(absolute_url);
            }
        }
    }

    links
}
