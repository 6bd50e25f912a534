//! Windoc error types

use std::time::Duration;

/// Windoc error types
///
/// These never reach the host through [`DocLookup::get_docs`](crate::DocLookup::get_docs);
/// the coordinator folds them into a [`DocResult`](crate::DocResult). They are
/// returned directly by the store maintenance operations and by
/// [`LearnFetcher::lookup`](crate::fetcher::LearnFetcher::lookup).
#[derive(Debug, thiserror::Error)]
pub enum WindocError {
    // Network errors
    #[error("HTTP error: {0}")]
    Http(String),

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("rate limited, retry after {retry_after:?}")]
    RateLimited { retry_after: Option<Duration> },

    #[error("request timed out")]
    Timeout,

    // Data errors
    #[error("unrecognized documentation page: {0}")]
    Parse(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // Cache errors
    #[error("failed to write cache file: {0}")]
    CacheWrite(String),

    // Configuration errors
    #[error("configuration error: {0}")]
    Configuration(String),
}

impl From<reqwest::Error> for WindocError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            WindocError::Timeout
        } else if let Some(status) = err.status() {
            WindocError::Api {
                status: status.as_u16(),
                message: err.to_string(),
            }
        } else {
            WindocError::Http(err.to_string())
        }
    }
}

/// Result type alias for Windoc operations
pub type Result<T> = std::result::Result<T, WindocError>;
