//! Microsoft Learn fetcher for Win32 API reference pages.
//!
//! Resolution is two requests:
//!
//! 1. `GET {base}/api/search?search=<name>&locale=en-us&$filter=...` and pick
//!    the first Win32 API reference hit whose title names the function.
//! 2. `GET` that page and extract its sections.
//!
//! If no hit matches and the name ends in `A` or `W`, the search is retried
//! with the suffix stripped: `OpenMutexA` and `OpenMutexW` are documented on
//! a single page under the base name.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{ACCEPT_LANGUAGE, HeaderMap, HeaderValue, RETRY_AFTER, USER_AGENT};
use reqwest::{Client, Response, StatusCode};
use serde::Deserialize;
use tracing::{debug, instrument};

use super::DocFetcher;
use super::extract::{PageShape, extract_page};
use crate::config::LookupConfig;
use crate::types::{DocSections, FetchResult};
use crate::{Result, WindocError};

/// Default base URL for Microsoft Learn.
pub const DEFAULT_BASE_URL: &str = "https://learn.microsoft.com";

/// Only pages under this path are API reference pages.
const API_REFERENCE_PATH: &str = "/windows/win32/api/";

const SEARCH_FILTER: &str = "(category eq 'Documentation')";

/// Longest error body we keep in an error message.
const MAX_ERROR_BODY: usize = 200;

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Option<Vec<SearchHit>>,
}

#[derive(Debug, Deserialize)]
struct SearchHit {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    url: Option<String>,
}

/// Fetches Win32 documentation from Microsoft Learn.
#[derive(Clone)]
pub struct LearnFetcher {
    http: Client,
    base_url: String,
}

impl LearnFetcher {
    /// Create a fetcher against learn.microsoft.com with default settings.
    pub fn new() -> Result<Self> {
        Self::from_config(&LookupConfig::default())
    }

    /// Create a fetcher with a custom base URL (for testing with wiremock).
    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self> {
        Self::from_config(&LookupConfig::default().base_url(base_url))
    }

    /// Create a fetcher from lookup configuration.
    ///
    /// Uses `base_url`, `user_agent` and `request_timeout`.
    pub fn from_config(config: &LookupConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&config.user_agent)
                .map_err(|e| WindocError::Configuration(format!("invalid user agent: {e}")))?,
        );
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.9"));

        let http = Client::builder()
            .default_headers(headers)
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| WindocError::Configuration(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Resolve `identifier` to its documentation.
    ///
    /// - `Ok(Some(_))`: a function reference page was found
    /// - `Ok(None)`: no reference page exists, or the page found is not a
    ///   function page
    /// - `Err(_)`: network failure, bad status, or an unrecognized page
    #[instrument(skip(self), level = "debug")]
    pub async fn lookup(&self, identifier: &str) -> Result<Option<DocSections>> {
        for (candidate, documented_as) in candidates(identifier) {
            let Some(url) = self.find_page_url(&candidate).await? else {
                continue;
            };
            debug!(%candidate, %url, "resolved reference page");

            let html = self.fetch_page(&url).await?;
            return match extract_page(&html) {
                PageShape::Function(mut sections) => {
                    if documented_as != identifier {
                        sections.resolved_as = Some(documented_as);
                    }
                    Ok(Some(sections))
                }
                PageShape::NotAFunction => {
                    debug!(%url, "page has no Syntax section, not a function");
                    Ok(None)
                }
                PageShape::Unrecognized => Err(WindocError::Parse(format!(
                    "no readable sections at {url}"
                ))),
            };
        }
        Ok(None)
    }

    async fn find_page_url(&self, name: &str) -> Result<Option<String>> {
        let url = format!("{}/api/search", self.base_url);
        let response = self
            .http
            .get(&url)
            .query(&[
                ("search", name),
                ("locale", "en-us"),
                ("$filter", SEARCH_FILTER),
            ])
            .send()
            .await?;
        let response = check_status(response).await?;

        let body: SearchResponse = response
            .json()
            .await
            .map_err(|e| WindocError::Http(format!("invalid search response: {e}")))?;

        Ok(select_hit(
            name,
            body.results.as_deref().unwrap_or_default(),
            &self.base_url,
        ))
    }

    async fn fetch_page(&self, url: &str) -> Result<String> {
        let response = self.http.get(url).send().await?;
        let response = check_status(response).await?;
        Ok(response.text().await?)
    }
}

#[async_trait]
impl DocFetcher for LearnFetcher {
    fn name(&self) -> &str {
        "learn"
    }

    async fn fetch(&self, identifier: &str) -> FetchResult {
        self.lookup(identifier).await.into()
    }
}

/// Names to search for, each paired with the name the page documents.
///
/// `OpenMutexA` yields `[("OpenMutexA", "OpenMutexA"), ("OpenMutex", "OpenMutexW")]`:
/// the ANSI variant is documented on the Unicode page.
fn candidates(identifier: &str) -> Vec<(String, String)> {
    let mut names = vec![(identifier.to_string(), identifier.to_string())];
    if identifier.len() > 1 {
        if let Some(base) = identifier.strip_suffix('A') {
            names.push((base.to_string(), format!("{base}W")));
        } else if let Some(base) = identifier.strip_suffix('W') {
            names.push((base.to_string(), identifier.to_string()));
        }
    }
    names
}

/// Pick the first hit that is an API reference page titled after `name`.
///
/// A title must start with `name` and must not continue it with a
/// lowercase letter, so `CreateFile` matches "CreateFileA function" but not
/// "CreateFilemapping".
fn select_hit(name: &str, hits: &[SearchHit], base_url: &str) -> Option<String> {
    hits.iter().find_map(|hit| {
        let title = hit.title.as_deref().unwrap_or_default().trim();
        let url = hit.url.as_deref().unwrap_or_default().trim();
        if url.is_empty() {
            return None;
        }
        let url = if url.starts_with('/') {
            format!("{base_url}{url}")
        } else {
            url.to_string()
        };

        if !url.contains(API_REFERENCE_PATH) {
            return None;
        }
        let rest = title.strip_prefix(name)?;
        if rest.chars().next().is_some_and(char::is_lowercase) {
            return None;
        }
        Some(url)
    })
}

/// Map non-success responses to errors.
async fn check_status(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    if status == StatusCode::TOO_MANY_REQUESTS {
        let retry_after = response
            .headers()
            .get(RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse::<u64>().ok())
            .map(Duration::from_secs);
        return Err(WindocError::RateLimited { retry_after });
    }

    let mut message = response.text().await.unwrap_or_default();
    if message.len() > MAX_ERROR_BODY {
        let cut = (0..=MAX_ERROR_BODY)
            .rev()
            .find(|&i| message.is_char_boundary(i))
            .unwrap_or(0);
        message.truncate(cut);
    }
    Err(WindocError::Api {
        status: status.as_u16(),
        message,
    })
}
