//! Shared state of a single crawl

use dashmap::{DashMap, DashSet};
use std::collections::HashMap;

/// Visited URLs and word totals shared by every task of one crawl
///
/// Both structures are sharded maps: inserting a URL and adding to a word's
/// count are atomic per key, and unrelated keys can be updated concurrently.
#[derive(Debug, Default)]
pub struct SharedCrawlState {
    visited: DashSet<String>,
    word_counts: DashMap<String, u64>,
}

impl SharedCrawlState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claims a URL for this crawl
    ///
    /// Returns true for exactly one caller per URL, however many race for it.
    pub fn mark_visited(&self, url: &str) -> bool {
        if self.visited.contains(url) {
            return false;
        }
        self.visited.insert(url.to_string())
    }

    /// Adds a page's word counts into the totals
    pub fn merge_word_counts<I>(&self, counts: I)
    where
        I: IntoIterator<Item = (String, u64)>,
    {
        for (word, count) in counts {
            *self.word_counts.entry(word).or_insert(0) += count;
        }
    }

    /// Number of URLs claimed so far
    pub fn visited_count(&self) -> usize {
        self.visited.len()
    }

    /// Copy of the current word totals
    pub fn word_counts(&self) -> HashMap<String, u64> {
        self.word_counts
            .iter()
            .map(|entry| (entry.key().clone(), *entry.value()))
            .collect()
    }
}
