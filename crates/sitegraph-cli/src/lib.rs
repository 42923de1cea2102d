//! # sitegraph-cli: Command-Line Tool
//!
//! Provides the `sitegraph` binary for working with the manifest outside a
//! running application.
//!
//! ## Subcommands
//!
//! - `sitegraph rebuild`: Run discovery and persist the manifest cache.
//! - `sitegraph clear`: Remove the cache artifact.
//! - `sitegraph list`: Print routes as a table or JSON.
//! - `sitegraph sitemap`: Render the XML sitemap.
//!
//! ## Exit Codes
//!
//! `0` on success, `1` when a rebuilt manifest violates its invariants, `2` on
//! configuration or I/O errors.
//!
//! ```bash
//! sitegraph --config sitegraph.yaml rebuild --force
//! sitegraph list --zone admin --nav
//! sitegraph sitemap --output public/sitemap.xml
//! ```

pub mod cache;
pub mod list;
pub mod sitemap;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};

use sitegraph_core::SitegraphConfig;
use sitegraph_manifest::ManifestRepository;
use sitegraph_pipeline::{AttributeSource, CatalogSource, RegisteredComponents};

/// Configuration file looked up when `--config` is not given.
pub const DEFAULT_CONFIG_FILE: &str = "sitegraph.yaml";

/// Load the configuration.
///
/// An explicit path must exist. Without one, `sitegraph.yaml` in the current
/// directory is used when present and built-in defaults otherwise.
pub fn load_config(explicit: Option<&Path>) -> Result<SitegraphConfig> {
    let path = match explicit {
        Some(path) => path.to_path_buf(),
        None => {
            let fallback = PathBuf::from(DEFAULT_CONFIG_FILE);
            if !fallback.exists() {
                tracing::info!("no {DEFAULT_CONFIG_FILE} found; using default configuration");
                return Ok(SitegraphConfig::default());
            }
            fallback
        }
    };
    tracing::debug!(path = %path.display(), "loading configuration");
    SitegraphConfig::load(&path)
        .with_context(|| format!("failed to load configuration: {}", path.display()))
}

/// The component catalog when one is configured, the statically registered
/// components otherwise.
pub fn open_source(config: &SitegraphConfig) -> Result<Arc<dyn AttributeSource>> {
    match config.catalog.as_deref() {
        Some(path) => {
            let catalog = CatalogSource::load(path)
                .with_context(|| format!("failed to load catalog: {}", path.display()))?;
            tracing::debug!(
                path = %path.display(),
                entries = catalog.len(),
                "loaded component catalog"
            );
            Ok(Arc::new(catalog))
        }
        None => Ok(Arc::new(RegisteredComponents)),
    }
}

/// Repository over the configured source and cache.
pub fn open_repository(config: &SitegraphConfig) -> Result<ManifestRepository> {
    let source = open_source(config)?;
    Ok(ManifestRepository::from_config(config, source))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_missing_config_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_config(Some(&dir.path().join("absent.yaml"))).unwrap_err();
        assert!(format!("{err:#}").contains("configuration file not found"));
    }

    #[test]
    fn relative_paths_resolve_against_config_dir() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sitegraph.yaml");
        std::fs::write(
            &path,
            "cache:\n  path: var/manifest.json\ncatalog: catalog.yaml\n",
        )
        .unwrap();
        let config = load_config(Some(&path)).unwrap();
        assert_eq!(
            config.cache.path.as_deref(),
            Some(dir.path().join("var/manifest.json").as_path())
        );
        assert_eq!(
            config.catalog.as_deref(),
            Some(dir.path().join("catalog.yaml").as_path())
        );
    }

    #[test]
    fn missing_catalog_file_fails_to_open() {
        let dir = tempfile::tempdir().unwrap();
        let config = SitegraphConfig {
            catalog: Some(dir.path().join("catalog.yaml")),
            ..SitegraphConfig::default()
        };
        assert!(open_source(&config).is_err());
    }
}
