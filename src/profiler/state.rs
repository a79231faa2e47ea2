//! Shared accumulator of per-operation timings

use dashmap::DashMap;
use std::collections::BTreeMap;
use std::fmt;
use std::io::{self, Write};
use std::time::Duration;

/// Identifies a timed operation on a concrete implementation type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ProfiledOperation {
    /// Fully qualified type name of the wrapped value
    pub implementation: &'static str,

    /// Operation signature as declared by the capability
    pub operation: &'static str,
}

impl fmt::Display for ProfiledOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.implementation, self.operation)
    }
}

/// Cumulative elapsed time per profiled operation
///
/// Every proxy created by one profiler records into the same state. Each key is
/// accumulated under its shard's lock, so concurrent recordings of the same
/// operation never lose an increment and different operations do not contend
/// beyond sharing a shard.
#[derive(Debug, Default)]
pub struct ProfilingState {
    data: DashMap<ProfiledOperation, Duration>,
}

impl ProfilingState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `elapsed` to the running total of an operation
    pub fn record(&self, implementation: &'static str, operation: &'static str, elapsed: Duration) {
        let key = ProfiledOperation {
            implementation,
            operation,
        };
        *self.data.entry(key).or_default() += elapsed;
    }

    /// Total recorded time for an operation, if it was ever recorded
    pub fn total(&self, implementation: &str, operation: &str) -> Option<Duration> {
        self.data
            .iter()
            .find(|entry| {
                entry.key().implementation == implementation && entry.key().operation == operation
            })
            .map(|entry| *entry.value())
    }

    /// Sorted copy of the current totals
    pub fn snapshot(&self) -> BTreeMap<ProfiledOperation, Duration> {
        self.data
            .iter()
            .map(|entry| (*entry.key(), *entry.value()))
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Writes one line per operation, sorted by type then operation
    pub fn write<W: Write + ?Sized>(&self, writer: &mut W) -> io::Result<()> {
        for (operation, elapsed) in self.snapshot() {
            writeln!(writer, "{} took {}", operation, format_duration(elapsed))?;
        }
        Ok(())
    }
}

/// Formats a duration as `<minutes>m <seconds>s <millis>ms`
pub fn format_duration(duration: Duration) -> String {
    let total_secs = duration.as_secs();
    format!(
        "{}m {}s {}ms",
        total_secs / 60,
        total_secs % 60,
        duration.subsec_millis()
    )
}
