//! Fetch metrics, which are recorded on the spawned fetch task.
//!
//! A thread-local recorder cannot see that task, so this binary installs a
//! global `DebuggingRecorder`. Keep it to a single test: the global
//! recorder is shared by everything in the process.

use std::sync::Arc;

use async_trait::async_trait;
use metrics_util::MetricKind;
use metrics_util::debugging::{DebugValue, DebuggingRecorder};

use windoc::telemetry;
use windoc::{CacheStore, DocFetcher, DocLookup, DocResult, DocSections, FetchResult};

/// Documents `Sleep`, reports everything else as missing.
struct SleepOnlyFetcher;

#[async_trait]
impl DocFetcher for SleepOnlyFetcher {
    fn name(&self) -> &str {
        "sleep-only"
    }

    async fn fetch(&self, identifier: &str) -> FetchResult {
        if identifier == "Sleep" {
            FetchResult::Found(DocSections::new().syntax("void Sleep(DWORD dwMilliseconds);"))
        } else {
            FetchResult::NotFound
        }
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn fetches_record_status_and_duration() {
    let recorder = DebuggingRecorder::new();
    let snapshotter = recorder.snapshotter();
    assert!(metrics::set_global_recorder(recorder).is_ok());

    let dir = tempfile::tempdir().unwrap();
    let store = Arc::new(CacheStore::open(dir.path().join("cache.json")));
    let lookup = DocLookup::new(store, Arc::new(SleepOnlyFetcher));

    assert!(matches!(lookup.get_docs("Sleep").await, DocResult::Documented(_)));
    assert_eq!(lookup.get_docs("NoSuchFunction123").await, DocResult::Undocumented);
    // Cache hit: no third fetch.
    assert!(matches!(lookup.get_docs("Sleep").await, DocResult::Documented(_)));

    let snapshot = snapshotter.snapshot().into_vec();

    let fetches_with_status = |status: &str| -> u64 {
        snapshot
            .iter()
            .filter(|(key, _, _, _)| {
                key.kind() == MetricKind::Counter
                    && key.key().name() == telemetry::FETCHES_TOTAL
                    && key
                        .key()
                        .labels()
                        .any(|label| label.key() == "status" && label.value() == status)
            })
            .map(|(_, _, _, value)| match value {
                DebugValue::Counter(v) => *v,
                _ => 0,
            })
            .sum()
    };
    assert_eq!(fetches_with_status("found"), 1);
    assert_eq!(fetches_with_status("not_found"), 1);
    assert_eq!(fetches_with_status("error"), 0);

    let durations: usize = snapshot
        .iter()
        .filter(|(key, _, _, _)| {
            key.kind() == MetricKind::Histogram
                && key.key().name() == telemetry::FETCH_DURATION_SECONDS
        })
        .map(|(_, _, _, value)| match value {
            DebugValue::Histogram(samples) => samples.len(),
            _ => 0,
        })
        .sum();
    assert_eq!(durations, 2);
}
