//! Operation profiler
//!
//! The profiler measures how long selected operations take without touching
//! their implementations. A value is wrapped in a [`Profiled`] decorator that
//! implements the same capability trait; calls to the operations the
//! capability declares as timed are measured with the profiler's clock and
//! accumulated in a [`ProfilingState`] shared by every wrapped value.
//!
//! # Example
//!
//! ```no_run
//! use ripple_count::clock::SystemClock;
//! use ripple_count::crawler::{HttpPageParser, PageParserCapability};
//! use ripple_count::profiler::Profiler;
//! use std::sync::Arc;
//!
//! # fn example(parser: HttpPageParser) -> Result<(), Box<dyn std::error::Error>> {
//! let profiler = Profiler::new(Arc::new(SystemClock));
//! let parser = profiler.wrap::<PageParserCapability, _>(parser)?;
//! // ... crawl with `parser` ...
//! profiler.write_data(&mut std::io::stdout())?;
//! # Ok(())
//! # }
//! ```

mod capability;
mod proxy;
mod state;

pub use capability::{Capability, Operation};
pub use proxy::Profiled;
pub use state::{format_duration, ProfiledOperation, ProfilingState};

use crate::clock::Clock;
use chrono::{DateTime, Utc};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;

/// Errors that can occur while profiling
#[derive(Debug, Error)]
pub enum ProfilerError {
    #[error("Capability {capability} does not declare any timed operations")]
    NoProfiledOperations { capability: &'static str },

    #[error("Failed to write profile data: {0}")]
    Io(#[from] std::io::Error),
}

/// Creates profiled wrappers and reports their accumulated timings
pub struct Profiler {
    clock: Arc<dyn Clock>,
    state: Arc<ProfilingState>,
    start_time: DateTime<Utc>,
}

impl Profiler {
    /// Creates a profiler; its creation time heads every report
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        let start_time = clock.now();
        Self {
            clock,
            state: Arc::new(ProfilingState::new()),
            start_time,
        }
    }

    /// Wraps `delegate` so the timed operations of capability `C` are measured
    ///
    /// # Errors
    ///
    /// Returns [`ProfilerError::NoProfiledOperations`] if `C` declares no timed
    /// operation.
    pub fn wrap<C: Capability, T>(&self, delegate: T) -> Result<Profiled<C, T>, ProfilerError> {
        if !C::has_timed_operations() {
            return Err(ProfilerError::NoProfiledOperations {
                capability: C::NAME,
            });
        }

        tracing::debug!(
            "Profiling {} operations of {}",
            C::NAME,
            std::any::type_name::<T>()
        );

        Ok(Profiled::new(
            delegate,
            Arc::clone(&self.clock),
            Arc::clone(&self.state),
        ))
    }

    /// Timings recorded so far by every wrapper of this profiler
    pub fn state(&self) -> &ProfilingState {
        &self.state
    }

    /// Writes the current timings
    ///
    /// The output is a `Run at <timestamp>` header, one line per operation and
    /// a trailing blank line. The sink is flushed before returning.
    pub fn write_data<W: Write + ?Sized>(&self, writer: &mut W) -> Result<(), ProfilerError> {
        writeln!(writer, "Run at {}", format_rfc1123(&self.start_time))?;
        self.state.write(writer)?;
        writeln!(writer)?;
        writer.flush()?;
        Ok(())
    }

    /// Writes the current timings to a file, replacing its contents
    pub fn write_data_to_path(&self, path: &Path) -> Result<(), ProfilerError> {
        let mut writer = BufWriter::new(File::create(path)?);
        self.write_data(&mut writer)
    }
}

/// Formats a timestamp like `Tue, 3 Jun 2008 11:05:30 GMT`
pub fn format_rfc1123(instant: &DateTime<Utc>) -> String {
    instant.format("%a, %-d %b %Y %H:%M:%S GMT").to_string()
}
