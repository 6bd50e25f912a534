//! Builder for configuring lookup instances

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use tracing::info;

use super::DocLookup;
use crate::Result;
use crate::cache::CacheStore;
use crate::config::LookupConfig;
use crate::fetcher::{DocFetcher, LearnFetcher};

/// Main entry point for creating lookup instances.
pub struct Windoc;

impl Windoc {
    /// Create a new builder for configuring the lookup.
    pub fn builder() -> WindocBuilder {
        WindocBuilder::new()
    }
}

/// Builder for configuring [`DocLookup`] instances.
///
/// ```rust,no_run
/// # use windoc::{Windoc, DocResult};
/// # async fn run() -> windoc::Result<()> {
/// let lookup = Windoc::builder()
///     .cache_path("/tmp/windoc-cache.json")
///     .build()?;
///
/// if let DocResult::Documented(docs) = lookup.get_docs("KERNEL32.dll!CloseHandle").await {
///     println!("{}", docs.syntax.unwrap_or_default());
/// }
/// # Ok(())
/// # }
/// ```
pub struct WindocBuilder {
    config: LookupConfig,
    fetcher: Option<Arc<dyn DocFetcher>>,
    store: Option<Arc<CacheStore>>,
}

impl WindocBuilder {
    pub fn new() -> Self {
        Self {
            config: LookupConfig::default(),
            fetcher: None,
            store: None,
        }
    }

    /// Replace the whole configuration (e.g. from [`LookupConfig::from_env`]).
    pub fn config(mut self, config: LookupConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the cache file location.
    pub fn cache_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.cache_path = path.into();
        self
    }

    /// Set the per-request HTTP timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.request_timeout = timeout;
        self
    }

    /// Set the ceiling on a whole fetch.
    pub fn lookup_timeout(mut self, timeout: Duration) -> Self {
        self.config.lookup_timeout = timeout;
        self
    }

    /// Set the documentation host (for testing with wiremock).
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.config.base_url = url.into();
        self
    }

    /// Set the `User-Agent` header.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.config.user_agent = user_agent.into();
        self
    }

    /// Use a custom fetcher instead of [`LearnFetcher`].
    ///
    /// `base_url`, `user_agent` and `timeout` only configure the default
    /// fetcher and are ignored when a custom one is supplied.
    pub fn fetcher(mut self, fetcher: Arc<dyn DocFetcher>) -> Self {
        self.fetcher = Some(fetcher);
        self
    }

    /// Use an already opened store instead of opening `cache_path`.
    pub fn store(mut self, store: Arc<CacheStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Build the lookup.
    ///
    /// Opens (and loads) the cache file; a missing or corrupt file yields
    /// an empty cache rather than an error. Fails only if the default
    /// fetcher's HTTP client cannot be built.
    pub fn build(self) -> Result<DocLookup> {
        let fetcher = match self.fetcher {
            Some(fetcher) => fetcher,
            None => Arc::new(LearnFetcher::from_config(&self.config)?),
        };
        let store = self
            .store
            .unwrap_or_else(|| Arc::new(CacheStore::open(&self.config.cache_path)));

        info!(
            path = %store.path().display(),
            entries = store.len(),
            fetcher = fetcher.name(),
            "doc lookup ready"
        );

        Ok(DocLookup::new(store, fetcher).with_lookup_timeout(self.config.lookup_timeout))
    }
}

impl Default for WindocBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_with_defaults_and_temp_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cache.json");
        let lookup = Windoc::builder().cache_path(&path).build().unwrap();
        assert_eq!(lookup.store().path(), path.as_path());
        assert!(lookup.store().is_empty());
    }

    #[test]
    fn invalid_user_agent_fails_build() {
        let dir = tempfile::tempdir().unwrap();
        let result = Windoc::builder()
            .cache_path(dir.path().join("cache.json"))
            .user_agent("bad\nagent")
            .build();
        assert!(result.is_err());
    }

    #[test]
    fn supplied_store_is_used() {
        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(CacheStore::open(dir.path().join("shared.json")));
        let lookup = Windoc::builder()
            .store(Arc::clone(&store))
            .build()
            .unwrap();
        assert!(Arc::ptr_eq(lookup.store(), &store));
    }
}
