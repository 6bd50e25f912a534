//! Fetch and lookup outcome types

use super::DocSections;
use crate::WindocError;

/// Outcome of a single fetch attempt against the documentation source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchResult {
    /// A documentation page exists. Sections may be partial.
    Found(DocSections),
    /// The source affirmatively has no documentation for the identifier.
    /// Cacheable.
    NotFound,
    /// Transient failure (network, timeout, rate limit, unrecognized page).
    /// Never cached.
    FetchError { reason: String },
}

impl FetchResult {
    /// Build a transient failure from any displayable reason.
    pub fn error(reason: impl std::fmt::Display) -> Self {
        FetchResult::FetchError {
            reason: reason.to_string(),
        }
    }

    /// Short label used for logging and metrics.
    pub fn label(&self) -> &'static str {
        match self {
            FetchResult::Found(_) => "found",
            FetchResult::NotFound => "not_found",
            FetchResult::FetchError { .. } => "error",
        }
    }
}

impl From<crate::Result<Option<DocSections>>> for FetchResult {
    fn from(result: crate::Result<Option<DocSections>>) -> Self {
        match result {
            Ok(Some(sections)) => FetchResult::Found(sections),
            Ok(None) => FetchResult::NotFound,
            Err(e) => FetchResult::error(e),
        }
    }
}

impl From<WindocError> for FetchResult {
    fn from(err: WindocError) -> Self {
        FetchResult::error(err)
    }
}

/// What the host receives from [`DocLookup::get_docs`](crate::DocLookup::get_docs).
///
/// A closed set: every failure inside the cache/fetch pipeline is folded
/// into one of these variants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocResult {
    /// Documentation exists; any of the sections may be absent.
    Documented(DocSections),
    /// Confirmed that no documentation exists for the identifier.
    Undocumented,
    /// Documentation could not be retrieved right now. Nothing was cached;
    /// a later call retries. Hosts should leave their display unchanged.
    Unavailable { reason: String },
}

impl DocResult {
    pub(crate) fn unavailable(reason: impl std::fmt::Display) -> Self {
        DocResult::Unavailable {
            reason: reason.to_string(),
        }
    }

    /// The documentation sections, if any.
    pub fn sections(&self) -> Option<&DocSections> {
        match self {
            DocResult::Documented(sections) => Some(sections),
            _ => None,
        }
    }

    /// Whether this outcome settles the identifier (cached either way).
    pub fn is_settled(&self) -> bool {
        !matches!(self, DocResult::Unavailable { .. })
    }

    /// Short label used for logging and metrics.
    pub fn label(&self) -> &'static str {
        match self {
            DocResult::Documented(_) => "documented",
            DocResult::Undocumented => "undocumented",
            DocResult::Unavailable { .. } => "unavailable",
        }
    }
}
