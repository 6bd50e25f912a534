//! Telemetry metric name constants.
//!
//! Hosts install their own `metrics` recorder; without one, all metric
//! calls are no-ops.
//!
//! All metrics are prefixed with `windoc_`. Counters end in `_total`,
//! histograms carry their unit (`_seconds`).

/// Total `get_docs` calls.
///
/// Labels: `outcome` ("documented" | "undocumented" | "unavailable").
pub const LOOKUPS_TOTAL: &str = "windoc_lookups_total";

/// Lookups answered from the cache without a fetch.
pub const CACHE_HITS_TOTAL: &str = "windoc_cache_hits_total";

/// Lookups that needed a fetch (including ones joining an in-flight fetch).
pub const CACHE_MISSES_TOTAL: &str = "windoc_cache_misses_total";

/// Fetches issued to the [`DocFetcher`](crate::DocFetcher).
///
/// Labels: `status` ("found" | "not_found" | "error").
pub const FETCHES_TOTAL: &str = "windoc_fetches_total";

/// Fetch duration in seconds.
pub const FETCH_DURATION_SECONDS: &str = "windoc_fetch_duration_seconds";

/// Lookups that attached to an already outstanding fetch.
pub const INFLIGHT_JOINS_TOTAL: &str = "windoc_inflight_joins_total";
