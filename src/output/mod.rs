//! Output module for crawl results
//!
//! This module handles:
//! - Selecting the most popular words from the final counts
//! - Rendering the crawl result as JSON

mod result;
mod words;

pub use result::{write_result, write_result_to_path, CrawlResult};
pub use words::{PopularWords, WordCountSelector, WordCountSelectorCapability, WordCounts};
