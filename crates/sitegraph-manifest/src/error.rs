//! Manifest repository error types.

use std::path::PathBuf;

use thiserror::Error;

/// Errors from the manifest cache and repository.
#[derive(Debug, Error)]
pub enum ManifestError {
    /// The cache artifact could not be read.
    #[error("failed to read manifest cache {path}: {source}")]
    CacheRead {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The cache artifact could not be written.
    #[error("failed to write manifest cache {path}: {source}")]
    CacheWrite {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The cache artifact is not a valid manifest document.
    #[error("corrupt manifest cache {path}: {source}")]
    CacheCorrupt {
        path: PathBuf,
        source: serde_json::Error,
    },

    /// The cache artifact was written by an incompatible version.
    #[error("manifest cache {path} has format version {found}, expected {expected}")]
    FormatVersion {
        path: PathBuf,
        found: u32,
        expected: u32,
    },

    /// The manifest could not be serialized.
    #[error("failed to serialize manifest: {0}")]
    Serialize(#[source] serde_json::Error),

    /// Writing the sitemap failed.
    #[error("failed to write sitemap: {0}")]
    SitemapWrite(#[source] std::fmt::Error),
}

/// Result type alias for manifest operations.
pub type ManifestResult<T> = Result<T, ManifestError>;
