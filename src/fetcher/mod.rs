//! Documentation fetchers.
//!
//! [`DocFetcher`] is the seam between the lookup coordinator and the
//! network. [`LearnFetcher`] is the production implementation; tests and
//! hosts with their own transport can provide another.

mod extract;
pub mod learn;

use async_trait::async_trait;

pub use learn::{DEFAULT_BASE_URL, LearnFetcher};

use crate::types::FetchResult;

/// Resolves one identifier to documentation.
///
/// Implementations must bound their own latency (per-request timeout) and
/// must not retry internally. Failures are reported as
/// [`FetchResult::FetchError`], never by panicking.
#[async_trait]
pub trait DocFetcher: Send + Sync {
    /// Fetcher name, for logs.
    fn name(&self) -> &str;

    /// Fetch documentation for a normalized identifier.
    async fn fetch(&self, identifier: &str) -> FetchResult;
}
