//! Caching subsystem.
//!
//! [`CacheStore`] is the single durable cache: a JSON file mapping normalized
//! identifiers to [`DocRecord`](crate::DocRecord)s. It holds both positive
//! entries (`found = true`) and negative ones (`found = false`), so neither
//! documented nor confirmed-undocumented identifiers hit the network twice.
//!
//! There is no expiry. Entries live until removed with
//! [`CacheStore::remove`] or [`CacheStore::clear`].

pub mod store;

pub use store::CacheStore;
