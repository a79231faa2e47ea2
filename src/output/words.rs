//! Popular word selection
//!
//! The crawler hands its final word-count map to a [`WordCountSelector`], which
//! picks the entries that make it into the result.

use crate::profiler::{Capability, Operation, Profiled};
use serde::ser::{Serialize, SerializeMap, Serializer};
use std::cmp::Ordering;
use std::collections::HashMap;

/// Ordered word -> count mapping
///
/// Serializes as a JSON object whose keys keep this order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WordCounts(Vec<(String, u64)>);

impl WordCounts {
    /// Returns the count of a word, if present
    pub fn get(&self, word: &str) -> Option<u64> {
        self.0
            .iter()
            .find(|(candidate, _)| candidate == word)
            .map(|(_, count)| *count)
    }

    /// Words in order
    pub fn words(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|(word, _)| word.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.0.iter().map(|(word, count)| (word.as_str(), *count))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<(String, u64)>> for WordCounts {
    fn from(entries: Vec<(String, u64)>) -> Self {
        Self(entries)
    }
}

impl Serialize for WordCounts {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (word, count) in &self.0 {
            map.serialize_entry(word, count)?;
        }
        map.end()
    }
}

/// Picks the top entries of a word-count map
///
/// Implementations must return at most `n` entries, ordered by descending
/// count, with a deterministic total order among equal counts.
pub trait WordCountSelector: Send + Sync {
    fn select_top(&self, counts: &HashMap<String, u64>, n: usize) -> WordCounts;
}

/// Default selector
///
/// Orders words by descending count, then by descending length, then
/// alphabetically.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PopularWords;

impl WordCountSelector for PopularWords {
    fn select_top(&self, counts: &HashMap<String, u64>, n: usize) -> WordCounts {
        let mut entries: Vec<(String, u64)> = counts
            .iter()
            .map(|(word, count)| (word.clone(), *count))
            .collect();
        entries.sort_by(compare_popularity);
        entries.truncate(n);
        WordCounts(entries)
    }
}

fn compare_popularity(a: &(String, u64), b: &(String, u64)) -> Ordering {
    b.1.cmp(&a.1)
        .then_with(|| b.0.len().cmp(&a.0.len()))
        .then_with(|| a.0.cmp(&b.0))
}

/// Profiling descriptor for [`WordCountSelector`]
pub enum WordCountSelectorCapability {}

impl Capability for WordCountSelectorCapability {
    const NAME: &'static str = "WordCountSelector";
    const OPERATIONS: &'static [Operation] = &[Operation::timed("select_top")];
}

impl<T: WordCountSelector> WordCountSelector for Profiled<WordCountSelectorCapability, T> {
    fn select_top(&self, counts: &HashMap<String, u64>, n: usize) -> WordCounts {
        self.time("select_top", |selector| selector.select_top(counts, n))
    }
}
