//! # Error Types
//!
//! Structured errors for configuration loading and core validation. All
//! errors use `thiserror` and carry the path or key that caused them.

use std::path::PathBuf;

use thiserror::Error;

/// Top-level error type for `sitegraph-core`.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Configuration could not be loaded or is inconsistent.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// A URI pattern could not be parsed.
    #[error("invalid URI pattern {pattern:?}: {reason}")]
    InvalidUri {
        /// The offending pattern.
        pattern: String,
        /// Why it was rejected.
        reason: String,
    },

    /// Serialization/deserialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Errors raised while loading or validating [`SitegraphConfig`](crate::SitegraphConfig).
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The configuration file does not exist.
    #[error("configuration file not found: {path}")]
    FileNotFound { path: PathBuf },

    /// The configuration file could not be read.
    #[error("failed to read configuration at {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    /// YAML parsing failed.
    #[error("failed to parse YAML at {path}: {source}")]
    YamlParse {
        path: PathBuf,
        source: serde_yaml::Error,
    },

    /// `default_zone` names a zone that is not configured.
    #[error("default zone {zone:?} is not configured")]
    UnknownDefaultZone { zone: String },

    /// A zone's map key disagrees with its `name` field.
    #[error("zone key {key:?} does not match zone name {name:?}")]
    ZoneNameMismatch { key: String, name: String },

    /// A zone URI prefix is malformed.
    #[error("zone {zone:?} has an invalid uri_prefix {prefix:?}")]
    InvalidPrefix { zone: String, prefix: String },

    /// A numeric setting is outside its allowed range.
    #[error("{key} = {value} is out of range ({expected})")]
    OutOfRange {
        key: &'static str,
        value: String,
        expected: &'static str,
    },

    /// A setting required by the requested operation is missing.
    #[error("missing required setting: {key}")]
    Missing { key: &'static str },
}

/// Result type alias for core operations.
pub type CoreResult<T> = Result<T, CoreError>;
