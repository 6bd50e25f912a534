//! Lookup configuration.
//!
//! Defaults suit an interactive host: a 10 second budget per HTTP request
//! and a 30 second ceiling on a whole lookup. Two environment variables can
//! override settings (mainly for tests and debugging):
//!
//! - `WINDOC_CACHE_PATH`: cache file location
//! - `WINDOC_TIMEOUT_SECS`: per-request timeout in seconds

use std::path::PathBuf;
use std::time::Duration;

use crate::fetcher::DEFAULT_BASE_URL;
use crate::{Result, WindocError};

/// Environment variable overriding the cache file path.
pub const CACHE_PATH_ENV: &str = "WINDOC_CACHE_PATH";

/// Environment variable overriding the per-request timeout (seconds).
pub const TIMEOUT_ENV: &str = "WINDOC_TIMEOUT_SECS";

/// Default cache file, relative to the working directory.
pub const DEFAULT_CACHE_FILE: &str = "cache.json";

/// Configuration for a [`DocLookup`](crate::DocLookup).
///
/// ```rust
/// # use windoc::LookupConfig;
/// # use std::time::Duration;
/// let config = LookupConfig::new()
///     .cache_path("/tmp/windoc.json")
///     .request_timeout(Duration::from_secs(5));
/// assert_eq!(config.request_timeout, Duration::from_secs(5));
/// ```
#[derive(Debug, Clone)]
pub struct LookupConfig {
    /// Cache file location. Default: `cache.json`.
    pub cache_path: PathBuf,
    /// Timeout for each HTTP request. Default: 10s.
    pub request_timeout: Duration,
    /// Ceiling on a whole fetch (all requests of one lookup). Default: 30s.
    pub lookup_timeout: Duration,
    /// Documentation host. Default: learn.microsoft.com.
    pub base_url: String,
    /// `User-Agent` sent with every request.
    pub user_agent: String,
}

impl Default for LookupConfig {
    fn default() -> Self {
        Self {
            cache_path: PathBuf::from(DEFAULT_CACHE_FILE),
            request_timeout: Duration::from_secs(10),
            lookup_timeout: Duration::from_secs(30),
            base_url: DEFAULT_BASE_URL.to_string(),
            user_agent: format!("windoc/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl LookupConfig {
    /// Create a config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Defaults with `WINDOC_CACHE_PATH` / `WINDOC_TIMEOUT_SECS` applied.
    pub fn from_env() -> Result<Self> {
        Self::default().with_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from a variable lookup function.
    ///
    /// [`from_env`](Self::from_env) passes the process environment; tests
    /// pass a map.
    pub fn with_overrides(mut self, var: impl Fn(&str) -> Option<String>) -> Result<Self> {
        if let Some(path) = var(CACHE_PATH_ENV).filter(|p| !p.trim().is_empty()) {
            self.cache_path = PathBuf::from(path);
        }
        if let Some(secs) = var(TIMEOUT_ENV) {
            let secs: u64 = secs.trim().parse().map_err(|e| {
                WindocError::Configuration(format!("{TIMEOUT_ENV}={secs:?} is not a number: {e}"))
            })?;
            if secs == 0 {
                return Err(WindocError::Configuration(format!(
                    "{TIMEOUT_ENV} must be greater than zero"
                )));
            }
            self.request_timeout = Duration::from_secs(secs);
        }
        Ok(self)
    }

    /// Set the cache file location.
    pub fn cache_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.cache_path = path.into();
        self
    }

    /// Set the per-request timeout.
    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Set the ceiling on a whole fetch.
    pub fn lookup_timeout(mut self, timeout: Duration) -> Self {
        self.lookup_timeout = timeout;
        self
    }

    /// Set the documentation host (for testing with wiremock).
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set the `User-Agent` header.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }
}
