//! Parallel crawl engine
//!
//! Every discovered URL becomes a [`CrawlTask`] running on its own tokio task.
//! A task checks, in order: the deadline, its remaining depth, the ignored URL
//! patterns, and whether another task already claimed the URL. Only then does
//! it take a worker slot, parse the page, merge the words into the shared
//! totals and spawn one child per link. A task completes only once all of its
//! children have, so `crawl` returns after the whole reachable graph is done.
//!
//! A failing task does not abort its siblings. It marks the crawl cancelled,
//! which stops tasks that have not started yet, and every join set is still
//! drained, so no task outlives `crawl`.

use crate::clock::Clock;
use crate::config::{CrawlerConfig, ParseErrorPolicy};
use crate::crawler::scheduler::WorkerPool;
use crate::crawler::state::SharedCrawlState;
use crate::crawler::PageParser;
use crate::output::{CrawlResult, PopularWords, WordCountSelector, WordCounts};
use crate::url::PatternSet;
use crate::{ConfigError, RippleError};
use chrono::{DateTime, Utc};
use futures::future::{BoxFuture, FutureExt};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinSet;

/// A unit of crawl work
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlTask {
    /// URL to visit
    pub url: String,

    /// Link hops left; a task at depth 0 does nothing
    pub depth: u32,

    /// Tasks starting at or after this instant do nothing
    pub deadline: DateTime<Utc>,
}

impl CrawlTask {
    /// Task for a link found on this task's page
    fn child(&self, url: String) -> Self {
        Self {
            url,
            depth: self.depth.saturating_sub(1),
            deadline: self.deadline,
        }
    }
}

/// Everything the tasks of one crawl share
struct CrawlContext<P> {
    parser: Arc<P>,
    clock: Arc<dyn Clock>,
    pool: WorkerPool,
    ignored_urls: PatternSet,
    on_parse_error: ParseErrorPolicy,
    state: SharedCrawlState,
    cancelled: AtomicBool,
}

/// Crawls pages in parallel and counts their words
///
/// # Example
///
/// ```no_run
/// use ripple_count::clock::SystemClock;
/// use ripple_count::config::load_config;
/// use ripple_count::crawler::{HttpPageParser, ParallelCrawler};
/// use std::path::Path;
/// use std::sync::Arc;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = load_config(Path::new("config.toml"))?;
/// let parser = HttpPageParser::new(&config)?;
/// let crawler = ParallelCrawler::new(&config.crawler, parser, Arc::new(SystemClock))?;
/// let result = crawler.crawl(&config.crawler.start_pages).await?;
/// println!("Visited {} pages", result.urls_visited);
/// # Ok(())
/// # }
/// ```
pub struct ParallelCrawler<P, S = PopularWords> {
    parser: Arc<P>,
    selector: S,
    clock: Arc<dyn Clock>,
    pool: WorkerPool,
    ignored_urls: PatternSet,
    timeout: Duration,
    max_depth: u32,
    popular_word_count: usize,
    on_parse_error: ParseErrorPolicy,
}

impl<P: PageParser + 'static> ParallelCrawler<P, PopularWords> {
    /// Creates a crawler using the default word selection
    pub fn new(
        config: &CrawlerConfig,
        parser: P,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, ConfigError> {
        Self::with_selector(config, parser, PopularWords, clock)
    }
}

impl<P: PageParser + 'static, S: WordCountSelector> ParallelCrawler<P, S> {
    /// Creates a crawler with a custom word selector
    ///
    /// The worker pool holds `min(parallelism, available_parallelism)` slots.
    pub fn with_selector(
        config: &CrawlerConfig,
        parser: P,
        selector: S,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, ConfigError> {
        Ok(Self {
            parser: Arc::new(parser),
            selector,
            clock,
            pool: WorkerPool::new(config.parallelism),
            ignored_urls: PatternSet::new(&config.ignored_urls)?,
            timeout: config.timeout(),
            max_depth: config.max_depth,
            popular_word_count: config.popular_word_count,
            on_parse_error: config.on_parse_error,
        })
    }

    /// Replaces the worker pool
    pub fn with_pool(mut self, pool: WorkerPool) -> Self {
        self.pool = pool;
        self
    }

    /// Number of pages that can be parsed at the same time
    pub fn worker_count(&self) -> usize {
        self.pool.size()
    }

    /// Crawls from the given seeds until the graph, the depth or the time runs out
    ///
    /// The deadline is checked when each task starts; a parse already under
    /// way is allowed to finish.
    ///
    /// # Errors
    ///
    /// With [`ParseErrorPolicy::Abort`], the first page that fails to parse is
    /// returned as [`RippleError::Parse`]. Tasks not yet started are skipped
    /// and parses already under way are waited for, so nothing is left running
    /// when this returns. A panicking parser is reported as
    /// [`RippleError::Task`].
    pub async fn crawl(&self, seeds: &[String]) -> Result<CrawlResult, RippleError> {
        let started_at = self.clock.now();
        let deadline = chrono::Duration::from_std(self.timeout)
            .ok()
            .and_then(|timeout| started_at.checked_add_signed(timeout))
            .unwrap_or(DateTime::<Utc>::MAX_UTC);

        tracing::info!(
            "Starting crawl of {} seeds (max depth {}, {} workers, deadline {})",
            seeds.len(),
            self.max_depth,
            self.pool.size(),
            deadline
        );

        let context = Arc::new(CrawlContext {
            parser: Arc::clone(&self.parser),
            clock: Arc::clone(&self.clock),
            pool: self.pool.clone(),
            ignored_urls: self.ignored_urls.clone(),
            on_parse_error: self.on_parse_error,
            state: SharedCrawlState::new(),
            cancelled: AtomicBool::new(false),
        });

        let mut tasks = JoinSet::new();
        for seed in seeds {
            let task = CrawlTask {
                url: seed.clone(),
                depth: self.max_depth,
                deadline,
            };
            tasks.spawn(run_task(task, Arc::clone(&context)));
        }
        join_all(&mut tasks, &context.cancelled).await?;

        let counts = context.state.word_counts();
        let word_counts = if counts.is_empty() {
            WordCounts::default()
        } else {
            self.selector.select_top(&counts, self.popular_word_count)
        };
        let urls_visited = context.state.visited_count();

        tracing::info!(
            "Crawl finished: {} pages visited, {} distinct words",
            urls_visited,
            counts.len()
        );

        Ok(CrawlResult {
            word_counts,
            urls_visited,
        })
    }
}

/// Runs one task and, recursively, all of its children
fn run_task<P: PageParser + 'static>(
    task: CrawlTask,
    context: Arc<CrawlContext<P>>,
) -> BoxFuture<'static, Result<(), RippleError>> {
    async move {
        if context.cancelled.load(Ordering::Acquire) {
            return Ok(());
        }

        if context.clock.now() >= task.deadline {
            tracing::trace!("Deadline passed, skipping {}", task.url);
            return Ok(());
        }

        if task.depth == 0 {
            return Ok(());
        }

        if context.ignored_urls.matches(&task.url) {
            tracing::trace!("Ignoring {}", task.url);
            return Ok(());
        }

        if !context.state.mark_visited(&task.url) {
            return Ok(());
        }

        let parsed = {
            let _worker = context.pool.acquire().await?;
            context.parser.parse(&task.url).await
        };

        let page = match parsed {
            Ok(page) => page,
            Err(source) => match context.on_parse_error {
                ParseErrorPolicy::Skip => {
                    tracing::warn!("Skipping {}: {}", task.url, source);
                    return Ok(());
                }
                ParseErrorPolicy::Abort => {
                    context.cancelled.store(true, Ordering::Release);
                    return Err(RippleError::Parse {
                        url: task.url,
                        source,
                    });
                }
            },
        };

        tracing::debug!(
            "Visited {} (depth {}, {} words, {} links)",
            task.url,
            task.depth,
            page.word_counts.len(),
            page.links.len()
        );

        context.state.merge_word_counts(page.word_counts);

        let mut children = JoinSet::new();
        for link in page.links {
            children.spawn(run_task(task.child(link), Arc::clone(&context)));
        }
        join_all(&mut children, &context.cancelled).await
    }
    .boxed()
}

/// Waits for every task in the set and returns the first failure
///
/// A failure cancels the crawl but the set is still drained to the end.
async fn join_all(
    tasks: &mut JoinSet<Result<(), RippleError>>,
    cancelled: &AtomicBool,
) -> Result<(), RippleError> {
    let mut first_error = None;
    while let Some(joined) = tasks.join_next().await {
        let outcome = joined.map_err(RippleError::from).and_then(|result| result);
        if let Err(e) = outcome {
            cancelled.store(true, Ordering::Release);
            first_error.get_or_insert(e);
        }
    }
    match first_error {
        Some(e) => Err(e),
        None => Ok(()),
    }
}
