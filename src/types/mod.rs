//! Core types for documentation lookups

pub mod doc;
pub mod result;

pub use doc::{DocRecord, DocSections};
pub use result::{DocResult, FetchResult};
