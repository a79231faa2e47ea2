//! Integration tests for the profiler
//!
//! A fake clock drives every measurement, so the recorded durations and the
//! rendered report are exact.

use chrono::{Duration as ChronoDuration, TimeZone, Utc};
use ripple_count::clock::FakeClock;
use ripple_count::config::{CrawlerConfig, ParseErrorPolicy};
use ripple_count::crawler::{PageParser, PageParserCapability, ParallelCrawler, ParsedPage, WorkerPool};
use ripple_count::output::{PopularWords, WordCountSelectorCapability};
use ripple_count::profiler::{Capability, Operation, Profiled, Profiler, ProfilerError};
use ripple_count::ParseError;
use std::any::type_name;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;

fn start() -> chrono::DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
}

/// Work whose duration is simulated by moving a shared fake clock
trait Worker {
    fn work(&self, millis: i64) -> Result<(), String>;
    fn name(&self) -> &'static str;
}

enum WorkerCapability {}

impl Capability for WorkerCapability {
    const NAME: &'static str = "Worker";
    const OPERATIONS: &'static [Operation] =
        &[Operation::timed("work"), Operation::untimed("name")];
}

enum UntimedWorkerCapability {}

impl Capability for UntimedWorkerCapability {
    const NAME: &'static str = "UntimedWorker";
    const OPERATIONS: &'static [Operation] = &[Operation::untimed("name")];
}

impl<T: Worker> Worker for Profiled<WorkerCapability, T> {
    fn work(&self, millis: i64) -> Result<(), String> {
        self.time("work", |worker| worker.work(millis))
    }

    fn name(&self) -> &'static str {
        self.time("name", |worker| worker.name())
    }
}

struct Digger {
    clock: Arc<FakeClock>,
}

impl Worker for Digger {
    fn work(&self, millis: i64) -> Result<(), String> {
        self.clock.advance(ChronoDuration::milliseconds(millis));
        if millis < 0 {
            return Err("negative work".to_string());
        }
        Ok(())
    }

    fn name(&self) -> &'static str {
        "digger"
    }
}

struct Hauler {
    clock: Arc<FakeClock>,
}

impl Worker for Hauler {
    fn work(&self, millis: i64) -> Result<(), String> {
        self.clock.advance(ChronoDuration::milliseconds(millis));
        Ok(())
    }

    fn name(&self) -> &'static str {
        "hauler"
    }
}

fn report(profiler: &Profiler) -> String {
    let mut out = Vec::new();
    profiler.write_data(&mut out).unwrap();
    String::from_utf8(out).unwrap()
}

#[test]
fn test_wrap_rejects_capability_without_timed_operations() {
    let clock = Arc::new(FakeClock::new(start()));
    let profiler = Profiler::new(clock.clone());

    let result = profiler.wrap::<UntimedWorkerCapability, _>(Digger { clock });
    assert!(matches!(
        result,
        Err(ProfilerError::NoProfiledOperations {
            capability: "UntimedWorker"
        })
    ));
    assert!(profiler.state().is_empty());
}

#[test]
fn test_durations_accumulate() {
    let clock = Arc::new(FakeClock::new(start()));
    let profiler = Profiler::new(clock.clone());
    let digger = profiler
        .wrap::<WorkerCapability, _>(Digger { clock: clock.clone() })
        .unwrap();

    digger.work(1_500).unwrap();
    digger.work(62_250).unwrap();

    assert_eq!(
        profiler
            .state()
            .total(type_name::<Digger>(), "work"),
        Some(Duration::from_millis(63_750))
    );
}

#[test]
fn test_untimed_operation_is_not_recorded() {
    let clock = Arc::new(FakeClock::with_tick(start(), ChronoDuration::seconds(1)));
    let profiler = Profiler::new(clock.clone());
    let digger = profiler
        .wrap::<WorkerCapability, _>(Digger { clock: clock.clone() })
        .unwrap();

    assert_eq!(digger.name(), "digger");
    assert!(profiler.state().is_empty());
}

#[test]
fn test_failed_call_is_still_timed() {
    let clock = Arc::new(FakeClock::new(start()));
    let profiler = Profiler::new(clock.clone());
    let digger = profiler
        .wrap::<WorkerCapability, _>(Digger { clock: clock.clone() })
        .unwrap();

    // The clock moves backwards, which counts as no time at all
    assert_eq!(digger.work(-10), Err("negative work".to_string()));
    assert_eq!(
        profiler.state().total(type_name::<Digger>(), "work"),
        Some(Duration::ZERO)
    );
}

#[test]
fn test_report_lists_every_wrapped_implementation() {
    let clock = Arc::new(FakeClock::new(start()));
    let profiler = Profiler::new(clock.clone());
    let digger = profiler
        .wrap::<WorkerCapability, _>(Digger { clock: clock.clone() })
        .unwrap();
    let hauler = profiler
        .wrap::<WorkerCapability, _>(Hauler { clock: clock.clone() })
        .unwrap();

    digger.work(2_000).unwrap();
    hauler.work(61_005).unwrap();

    let expected = format!(
        "Run at Mon, 1 Jan 2024 00:00:00 GMT\n{}#work took 0m 2s 0ms\n{}#work took 1m 1s 5ms\n\n",
        type_name::<Digger>(),
        type_name::<Hauler>()
    );
    assert_eq!(report(&profiler), expected);
}

#[test]
fn test_each_report_shows_current_totals() {
    let clock = Arc::new(FakeClock::new(start()));
    let profiler = Profiler::new(clock.clone());
    let digger = profiler
        .wrap::<WorkerCapability, _>(Digger { clock: clock.clone() })
        .unwrap();

    digger.work(1_000).unwrap();
    let first = report(&profiler);
    assert!(first.contains("#work took 0m 1s 0ms"));

    digger.work(1_000).unwrap();
    let second = report(&profiler);
    assert!(second.contains("#work took 0m 2s 0ms"));

    // The header always shows when the profiler was created
    assert!(second.starts_with("Run at Mon, 1 Jan 2024 00:00:00 GMT\n"));
}

#[test]
fn test_write_data_to_file() {
    let clock = Arc::new(FakeClock::new(start()));
    let profiler = Profiler::new(clock.clone());
    let digger = profiler
        .wrap::<WorkerCapability, _>(Digger { clock: clock.clone() })
        .unwrap();
    digger.work(750).unwrap();

    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("profile.txt");
    profiler.write_data_to_path(&path).unwrap();

    let content = std::fs::read_to_string(&path).unwrap();
    assert_eq!(content, report(&profiler));
    assert!(content.contains("#work took 0m 0s 750ms"));
}

// ===== Profiling a crawl =====

/// Two-page graph used to time parses during a real crawl
struct TwoPages;

impl PageParser for TwoPages {
    async fn parse(&self, url: &str) -> Result<ParsedPage, ParseError> {
        match url {
            "home" => Ok(ParsedPage {
                word_counts: HashMap::from([("hello".to_string(), 2)]),
                links: vec!["about".to_string()],
            }),
            "about" => Ok(ParsedPage {
                word_counts: HashMap::from([("world".to_string(), 1)]),
                links: vec![],
            }),
            other => Err(ParseError::Other(format!("no page at {}", other))),
        }
    }
}

#[tokio::test]
async fn test_profiled_crawl_times_parses_and_selection() {
    // Only the profiler reads this clock, one tick per reading
    let profiler_clock = Arc::new(FakeClock::with_tick(start(), ChronoDuration::milliseconds(100)));
    let crawl_clock = Arc::new(FakeClock::new(start()));
    let profiler = Profiler::new(profiler_clock);

    let parser = profiler.wrap::<PageParserCapability, _>(TwoPages).unwrap();
    let selector = profiler
        .wrap::<WordCountSelectorCapability, _>(PopularWords)
        .unwrap();

    let config = CrawlerConfig {
        start_pages: vec!["home".to_string()],
        ignored_urls: vec![],
        ignored_words: vec![],
        parallelism: 1,
        max_depth: 5,
        timeout_seconds: 60,
        popular_word_count: 5,
        on_parse_error: ParseErrorPolicy::Skip,
    };
    let crawler = ParallelCrawler::with_selector(&config, parser, selector, crawl_clock)
        .unwrap()
        .with_pool(WorkerPool::with_exact_size(1));
    let result = crawler.crawl(&config.start_pages).await.unwrap();

    assert_eq!(result.urls_visited, 2);
    assert_eq!(
        result.word_counts.iter().collect::<Vec<_>>(),
        vec![("hello", 2), ("world", 1)]
    );

    // One worker, so each parse reads the clock twice in a row
    let state = profiler.state();
    assert_eq!(
        state.total(type_name::<TwoPages>(), "parse"),
        Some(Duration::from_millis(200))
    );
    assert_eq!(
        state.total(type_name::<PopularWords>(), "select_top"),
        Some(Duration::from_millis(100))
    );

    let report = report(&profiler);
    assert!(report.contains("TwoPages#parse took 0m 0s 200ms"));
    assert!(report.contains("PopularWords#select_top took 0m 0s 100ms"));
}
