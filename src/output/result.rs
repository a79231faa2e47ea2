//! Crawl result and its JSON rendering

use crate::output::words::WordCounts;
use crate::RippleError;
use serde::Serialize;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Outcome of a crawl
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CrawlResult {
    /// Most popular words, ordered
    pub word_counts: WordCounts,

    /// Number of distinct URLs the crawler parsed or attempted to parse
    pub urls_visited: usize,
}

/// Writes a crawl result as pretty JSON followed by a newline
pub fn write_result<W: Write + ?Sized>(result: &CrawlResult, writer: &mut W) -> Result<(), RippleError> {
    serde_json::to_writer_pretty(&mut *writer, result)?;
    writeln!(writer)?;
    writer.flush()?;
    Ok(())
}

/// Writes a crawl result to a file, replacing its contents
pub fn write_result_to_path(result: &CrawlResult, path: &Path) -> Result<(), RippleError> {
    let mut writer = BufWriter::new(File::create(path)?);
    write_result(result, &mut writer)
}
