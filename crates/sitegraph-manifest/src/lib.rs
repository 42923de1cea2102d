//! # sitegraph-manifest: Manifest Repository
//!
//! Serves the manifest to consumers. The first query either deserializes the
//! cache artifact or runs the discovery pipeline; the result is memoized until
//! [`ManifestRepository::clear`].
//!
//! - [`cache`]: JSON artifact store ([`CacheStore`]).
//! - [`repository`]: [`ManifestRepository`] and the indexed [`ManifestSnapshot`].
//! - [`sitemap`]: sitemap entries and XML rendering.
//!
//! ## Crate Policy
//!
//! - Cache failures never fail a read. An unreadable artifact is a cache miss
//!   and is replaced on the next write.
//! - [`ManifestRepository::rebuild`] and [`ManifestRepository::clear`] do
//!   report I/O errors, because the caller asked for the write.

pub mod cache;
pub mod error;
pub mod repository;
pub mod sitemap;

pub use cache::{CacheStore, CACHE_FORMAT_VERSION};
pub use error::{ManifestError, ManifestResult};
pub use repository::{ManifestRepository, ManifestSnapshot, RebuildOutcome};
pub use sitemap::{build_entries, render_xml, SitemapEntry};
