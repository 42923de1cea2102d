//! Pipeline error types.
//!
//! Entity-level errors carry the entity id so the engine can report which
//! entity was skipped and why.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while discovering or processing components.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// The attribute source could not load an entity.
    #[error("failed to load entity {entity}: {reason}")]
    Source { entity: String, reason: String },

    /// The source listed the same entity id more than once.
    #[error("entity {entity}: duplicate entity id, entry #{ordinal} ignored")]
    DuplicateEntity { entity: String, ordinal: usize },

    /// A processor needed a fragment that no earlier processor produced.
    #[error("entity {entity}: missing {fragment} fragment (processor ordering)")]
    MissingFragment {
        entity: String,
        fragment: &'static str,
    },

    /// The route declaration is malformed.
    #[error("entity {entity}: {source}")]
    InvalidRoute {
        entity: String,
        source: sitegraph_core::CoreError,
    },

    /// A catalog file could not be read.
    #[error("failed to read catalog at {path}: {source}")]
    CatalogRead {
        path: PathBuf,
        source: std::io::Error,
    },

    /// A catalog file is not valid YAML or lacks a `components` list.
    #[error("failed to parse catalog at {path}: {source}")]
    CatalogParse {
        path: PathBuf,
        source: serde_yaml::Error,
    },
}

/// Result type alias for pipeline operations.
pub type PipelineResult<T> = Result<T, PipelineError>;
