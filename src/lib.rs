//! Windoc - cached Win32 API documentation lookups
//!
//! Given the name of an imported Win32 function, windoc returns its syntax,
//! description and return-value semantics from Microsoft Learn, and keeps
//! every settled answer in a local JSON file so the same name never costs a
//! second network round-trip.
//!
//! ```rust,no_run
//! use windoc::{DocResult, Windoc};
//!
//! #[tokio::main]
//! async fn main() -> windoc::Result<()> {
//!     let lookup = Windoc::builder().cache_path("cache.json").build()?;
//!
//!     match lookup.get_docs("KERNEL32.dll!CloseHandle").await {
//!         DocResult::Documented(docs) => {
//!             println!("{}", docs.syntax.unwrap_or_default());
//!             println!("{}", docs.return_value.unwrap_or_default());
//!         }
//!         DocResult::Undocumented => println!("no documentation"),
//!         DocResult::Unavailable { reason } => eprintln!("try again later: {reason}"),
//!     }
//!     Ok(())
//! }
//! ```
//!
//! Hosts with their own transport can implement [`DocFetcher`] and pass it
//! to [`WindocBuilder::fetcher`].

pub mod cache;
pub mod config;
pub mod error;
pub mod fetcher;
pub mod lookup;
mod normalize;
pub mod telemetry;
pub mod types;

pub use cache::CacheStore;
pub use config::LookupConfig;
pub use error::{Result, WindocError};
pub use fetcher::{DocFetcher, LearnFetcher};
pub use lookup::{DocLookup, Windoc, WindocBuilder};
pub use normalize::normalize_identifier;
pub use types::{DocRecord, DocResult, DocSections, FetchResult};

/// Package version from Cargo.toml.
pub const PKG_VERSION: &str = env!("CARGO_PKG_VERSION");
