//! DocLookup - cache-first documentation lookups

use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::{debug, warn};

use super::inflight::{self, Claim, InFlight, SettleGuard};
use crate::cache::CacheStore;
use crate::fetcher::DocFetcher;
use crate::normalize::normalize_identifier;
use crate::telemetry;
use crate::types::{DocRecord, DocResult, FetchResult};
use crate::{Result, WindocError};

/// Default ceiling on a single fetch, across all of its requests.
pub const DEFAULT_LOOKUP_TIMEOUT: Duration = Duration::from_secs(30);

/// Public entry point: answers lookups from the cache, fetching on a miss.
///
/// Cheap to share behind an `Arc`; all methods take `&self`. Requires a
/// tokio runtime, since fetches run on spawned tasks.
///
/// - A cache hit never touches the network.
/// - Concurrent lookups of the same identifier share one fetch.
/// - A caller that stops waiting does not cancel the fetch; its result is
///   still cached.
pub struct DocLookup {
    store: Arc<CacheStore>,
    fetcher: Arc<dyn DocFetcher>,
    inflight: Arc<InFlight>,
    lookup_timeout: Duration,
}

impl DocLookup {
    /// Create a lookup over an existing store and fetcher.
    pub fn new(store: Arc<CacheStore>, fetcher: Arc<dyn DocFetcher>) -> Self {
        Self {
            store,
            fetcher,
            inflight: Arc::new(InFlight::new()),
            lookup_timeout: DEFAULT_LOOKUP_TIMEOUT,
        }
    }

    /// Set the ceiling on a single fetch.
    pub fn with_lookup_timeout(mut self, timeout: Duration) -> Self {
        self.lookup_timeout = timeout;
        self
    }

    /// The underlying cache store.
    pub fn store(&self) -> &Arc<CacheStore> {
        &self.store
    }

    /// Look up documentation for an identifier.
    ///
    /// The identifier is normalized first (see
    /// [`normalize_identifier`](crate::normalize_identifier)). Never fails:
    /// transient problems come back as [`DocResult::Unavailable`] and leave
    /// nothing in the cache.
    pub async fn get_docs(&self, identifier: &str) -> DocResult {
        let identifier = normalize_identifier(identifier);
        let result = self.resolve(&identifier, false).await;
        metrics::counter!(telemetry::LOOKUPS_TOTAL, "outcome" => result.label()).increment(1);
        result
    }

    /// Fetch again even if the identifier is cached.
    ///
    /// A `Found`/`NotFound` outcome replaces the cached record; a transient
    /// failure leaves the existing record in place.
    pub async fn refresh(&self, identifier: &str) -> DocResult {
        let identifier = normalize_identifier(identifier);
        self.resolve(&identifier, true).await
    }

    /// Cached result for an identifier, without any network access.
    pub fn cached(&self, identifier: &str) -> Option<DocResult> {
        self.cached_normalized(&normalize_identifier(identifier))
    }

    /// Remove the cached entry for an identifier. Returns whether one existed.
    pub fn forget(&self, identifier: &str) -> Result<bool> {
        self.store.remove(&normalize_identifier(identifier))
    }

    /// Remove every cached entry.
    pub fn clear_cache(&self) -> Result<()> {
        self.store.clear()
    }

    /// Number of fetches currently outstanding.
    pub fn pending_fetches(&self) -> usize {
        self.inflight.len()
    }

    fn cached_normalized(&self, identifier: &str) -> Option<DocResult> {
        self.store.get(identifier).map(record_to_result)
    }

    async fn resolve(&self, identifier: &str, bypass_cache: bool) -> DocResult {
        if identifier.is_empty() {
            debug!("empty identifier, nothing to look up");
            return DocResult::Undocumented;
        }

        if !bypass_cache {
            if let Some(result) = self.cached_normalized(identifier) {
                metrics::counter!(telemetry::CACHE_HITS_TOTAL).increment(1);
                debug!(%identifier, outcome = result.label(), "cache hit");
                return result;
            }
        }

        let claim = self.inflight.claim(identifier, || {
            if bypass_cache {
                None
            } else {
                self.cached_normalized(identifier)
            }
        });

        match claim {
            Claim::Cached(result) => {
                // Another lookup settled and stored it after our first check.
                metrics::counter!(telemetry::CACHE_HITS_TOTAL).increment(1);
                result
            }
            Claim::Join(rx) => {
                metrics::counter!(telemetry::CACHE_MISSES_TOTAL).increment(1);
                metrics::counter!(telemetry::INFLIGHT_JOINS_TOTAL).increment(1);
                debug!(%identifier, "joining in-flight fetch");
                inflight::wait(rx).await
            }
            Claim::Lead(tx, rx) => {
                metrics::counter!(telemetry::CACHE_MISSES_TOTAL).increment(1);
                let guard = SettleGuard::new(Arc::clone(&self.inflight), identifier.to_string());
                let store = Arc::clone(&self.store);
                let fetcher = Arc::clone(&self.fetcher);
                let identifier = identifier.to_string();
                let deadline = self.lookup_timeout;

                tokio::spawn(async move {
                    let result = fetch_and_store(store, fetcher, &identifier, deadline).await;
                    drop(guard);
                    // No receivers left means every caller gave up; the
                    // result is already cached.
                    let _ = tx.send(Some(result));
                });

                inflight::wait(rx).await
            }
        }
    }
}

impl std::fmt::Debug for DocLookup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DocLookup")
            .field("store", &self.store)
            .field("fetcher", &self.fetcher.name())
            .field("lookup_timeout", &self.lookup_timeout)
            .finish()
    }
}

fn record_to_result(record: DocRecord) -> DocResult {
    if record.found {
        DocResult::Documented(record.sections)
    } else {
        DocResult::Undocumented
    }
}

/// Run one fetch, cache a settled outcome, and translate it for callers.
async fn fetch_and_store(
    store: Arc<CacheStore>,
    fetcher: Arc<dyn DocFetcher>,
    identifier: &str,
    deadline: Duration,
) -> DocResult {
    debug!(%identifier, fetcher = fetcher.name(), "fetching documentation");
    let started = Instant::now();
    let fetched = match tokio::time::timeout(deadline, fetcher.fetch(identifier)).await {
        Ok(fetched) => fetched,
        Err(_) => FetchResult::error(format!("lookup timed out after {deadline:?}")),
    };
    metrics::histogram!(telemetry::FETCH_DURATION_SECONDS).record(started.elapsed().as_secs_f64());
    metrics::counter!(telemetry::FETCHES_TOTAL, "status" => fetched.label()).increment(1);

    let (record, result) = match fetched {
        FetchResult::Found(sections) => (
            DocRecord::found(identifier, sections.clone()),
            DocResult::Documented(sections),
        ),
        FetchResult::NotFound => (DocRecord::not_found(identifier), DocResult::Undocumented),
        FetchResult::FetchError { reason } => {
            warn!(%identifier, %reason, "documentation unavailable");
            return DocResult::Unavailable { reason };
        }
    };

    if let Err(e) = persist(store, record).await {
        warn!(%identifier, error = %e, "failed to persist doc cache, keeping entry in memory");
    } else {
        debug!(%identifier, outcome = result.label(), "cached lookup result");
    }
    result
}

/// Write a record through the store on the blocking pool.
async fn persist(store: Arc<CacheStore>, record: DocRecord) -> Result<()> {
    tokio::task::spawn_blocking(move || store.put(record))
        .await
        .map_err(|e| WindocError::CacheWrite(format!("cache write task failed: {e}")))?
}
