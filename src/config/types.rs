use serde::Deserialize;
use std::time::Duration;

/// Main configuration structure for Ripple-Count
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub crawler: CrawlerConfig,
    #[serde(rename = "user-agent")]
    pub user_agent: UserAgentConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct CrawlerConfig {
    /// Seed URLs the crawl starts from
    pub start_pages: Vec<String>,

    /// Regexes matched against the whole URL; matching pages are never parsed
    #[serde(default)]
    pub ignored_urls: Vec<String>,

    /// Regexes matched against whole words; matching words are never counted
    #[serde(default)]
    pub ignored_words: Vec<String>,

    /// Requested number of concurrent page parses (clamped to the CPU count)
    #[serde(default = "default_parallelism")]
    pub parallelism: usize,

    /// Number of link hops allowed from a seed page, seeds included
    pub max_depth: u32,

    /// Wall-clock budget for the whole crawl
    pub timeout_seconds: u64,

    /// Number of words kept in the result
    pub popular_word_count: usize,

    /// What to do when a page cannot be parsed
    #[serde(default)]
    pub on_parse_error: ParseErrorPolicy,
}

impl CrawlerConfig {
    /// Returns the crawl timeout as a duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

fn default_parallelism() -> usize {
    1
}

/// Policy applied when the page parser fails on a URL
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ParseErrorPolicy {
    /// Log the failure and keep crawling; the page counts as visited
    #[default]
    Skip,

    /// Stop the crawl and return the failure
    Abort,
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
pub struct UserAgentConfig {
    /// Name of the crawler
    #[serde(rename = "crawler-name")]
    pub crawler_name: String,

    /// Version of the crawler
    #[serde(rename = "crawler-version")]
    pub crawler_version: String,

    /// URL with information about the crawler
    #[serde(rename = "contact-url")]
    pub contact_url: String,

    /// Email address for crawler-related contact
    #[serde(rename = "contact-email")]
    pub contact_email: String,
}

impl UserAgentConfig {
    /// Formats the User-Agent header value
    ///
    /// Format: `CrawlerName/Version (+ContactURL; ContactEmail)`
    pub fn header_value(&self) -> String {
        format!(
            "{}/{} (+{}; {})",
            self.crawler_name, self.crawler_version, self.contact_url, self.contact_email
        )
    }
}

/// Output configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OutputConfig {
    /// Where the crawl result JSON is written; stdout when absent
    #[serde(rename = "result-path")]
    pub result_path: Option<String>,

    /// Where the profiler report is written; stdout when absent
    #[serde(rename = "profile-output-path")]
    pub profile_output_path: Option<String>,
}
