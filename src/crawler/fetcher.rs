//! HTTP fetcher implementation
//!
//! This module handles the HTTP side of the default page parser:
//! - Building HTTP clients with proper user agent strings
//! - GET requests to fetch page content
//! - Rejecting non-success statuses and non-HTML responses

use crate::config::UserAgentConfig;
use crate::ParseError;
use reqwest::Client;
use std::time::Duration;

/// A successfully fetched HTML page
#[derive(Debug, Clone)]
pub struct FetchedPage {
    /// Final URL after redirects, used to resolve relative links
    pub final_url: String,

    /// Page body content
    pub body: String,
}

/// Builds an HTTP client with proper configuration
///
/// # Example
///
/// ```no_run
/// use ripple_count::config::UserAgentConfig;
/// use ripple_count::crawler::build_http_client;
///
/// let config = UserAgentConfig {
///     crawler_name: "RippleCount".to_string(),
///     crawler_version: "1.0".to_string(),
///     contact_url: "https://example.com/about".to_string(),
///     contact_email: "admin@example.com".to_string(),
/// };
///
/// let client = build_http_client(&config).unwrap();
/// ```
pub fn build_http_client(config: &UserAgentConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.header_value())
        .timeout(Duration::from_secs(30))
        .connect_timeout(Duration::from_secs(10))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches a URL and returns its body if it is a successful HTML response
///
/// # Errors
///
/// | Condition | Error |
/// |-----------|-------|
/// | Connection failure, timeout, bad body | `ParseError::Http` |
/// | Non-2xx status | `ParseError::Status` |
/// | Content-Type other than `text/html` | `ParseError::ContentMismatch` |
pub async fn fetch_page(client: &Client, url: &str) -> Result<FetchedPage, ParseError> {
    let response = client.get(url).send().await?;
    let status = response.status();
    let final_url = response.url().to_string();

    if !status.is_success() {
        return Err(ParseError::Status(status.as_u16()));
    }

    let content_type = response
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_string();

    if !content_type.contains("text/html") {
        return Err(ParseError::ContentMismatch(content_type));
    }

    let body = response.text().await?;

    Ok(FetchedPage {
        final_url,
        body,
    })
}
