//! Ripple-Count: a parallel word-frequency crawler
//!
//! This crate crawls a link graph from a set of seed pages, bounded by depth and
//! a deadline, and tallies the most popular words found along the way. A small
//! profiler can wrap the crawler's collaborators to record how long their
//! operations take.

pub mod clock;
pub mod config;
pub mod crawler;
pub mod output;
pub mod profiler;
pub mod url;

use thiserror::Error;

/// Main error type for Ripple-Count operations
#[derive(Debug, Error)]
pub enum RippleError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Failed to parse {url}: {source}")]
    Parse { url: String, source: ParseError },

    #[error("Crawl task failed: {0}")]
    Task(#[from] tokio::task::JoinError),

    #[error("Worker pool closed: {0}")]
    PoolClosed(#[from] tokio::sync::AcquireError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("Profiler error: {0}")]
    Profiler(#[from] profiler::ProfilerError),

    #[error("Failed to serialize result: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),

    #[error("Invalid pattern: {0}")]
    InvalidPattern(String),
}

/// Errors reported by a page parser for a single page
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP status {0}")]
    Status(u16),

    #[error("Expected HTML, got {0}")]
    ContentMismatch(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] ::url::ParseError),

    #[error("{0}")]
    Other(String),
}

// Re-export commonly used types
pub use clock::{Clock, FakeClock, SystemClock};
pub use config::Config;
pub use crawler::{PageParser, ParallelCrawler, ParsedPage};
pub use output::{CrawlResult, PopularWords, WordCountSelector, WordCounts};
pub use profiler::{Capability, Operation, Profiled, Profiler};
