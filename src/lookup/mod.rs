//! Lookup coordinator
//!
//! [`DocLookup`] is the only thing a host needs: it normalizes the
//! identifier, answers from the [`CacheStore`](crate::CacheStore) when it
//! can, and otherwise runs a single de-duplicated fetch whose settled
//! outcome (documented or confirmed undocumented) is written back.

mod builder;
mod coordinator;
mod inflight;

pub use builder::{Windoc, WindocBuilder};
pub use coordinator::{DEFAULT_LOOKUP_TIMEOUT, DocLookup};
