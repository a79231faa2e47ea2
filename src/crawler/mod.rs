//! Crawler module for parallel word counting
//!
//! This module contains the core crawling logic, including:
//! - The page parser capability and its HTTP implementation
//! - Shared crawl state (visited set and word counts)
//! - The bounded worker pool
//! - The parallel crawl engine

mod engine;
mod fetcher;
mod parser;
mod scheduler;
mod state;

pub use engine::{CrawlTask, ParallelCrawler};
pub use fetcher::{build_http_client, fetch_page, FetchedPage};
pub use parser::{parse_html, HttpPageParser};
pub use scheduler::{worker_count, WorkerPool};
pub use state::SharedCrawlState;

pub use crate::output::CrawlResult;

use crate::profiler::{Capability, Operation, Profiled};
use crate::ParseError;
use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;

/// Words and outgoing links found on a page
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedPage {
    /// Number of occurrences of each word on the page
    pub word_counts: HashMap<String, u64>,

    /// Outgoing links, in document order
    pub links: Vec<String>,
}

/// Fetches and parses a single page
pub trait PageParser: Send + Sync {
    fn parse(&self, url: &str) -> impl Future<Output = Result<ParsedPage, ParseError>> + Send;
}

impl<P: PageParser> PageParser for Arc<P> {
    fn parse(&self, url: &str) -> impl Future<Output = Result<ParsedPage, ParseError>> + Send {
        self.as_ref().parse(url)
    }
}

/// Profiling descriptor for [`PageParser`]
pub enum PageParserCapability {}

impl Capability for PageParserCapability {
    const NAME: &'static str = "PageParser";
    const OPERATIONS: &'static [Operation] = &[Operation::timed("parse")];
}

impl<P: PageParser> PageParser for Profiled<PageParserCapability, P> {
    async fn parse(&self, url: &str) -> Result<ParsedPage, ParseError> {
        self.time_async("parse", |parser| parser.parse(url)).await
    }
}
