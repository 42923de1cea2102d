//! # Manifest Cache
//!
//! The manifest is persisted as a JSON artifact:
//!
//! ```json
//! { "format_version": 1, "records": { "<route name>": { ... } } }
//! ```
//!
//! Loading is lossless: a stored manifest deserializes to an equal value.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use sitegraph_core::Manifest;

use crate::error::{ManifestError, ManifestResult};

/// Version written into every artifact.
pub const CACHE_FORMAT_VERSION: u32 = 1;

#[derive(Serialize)]
struct ArtifactRef<'a> {
    format_version: u32,
    records: &'a Manifest,
}

#[derive(Deserialize)]
struct Artifact {
    format_version: u32,
    records: Manifest,
}

/// File-backed manifest cache.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheStore {
    path: PathBuf,
}

impl CacheStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether the artifact file exists.
    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    /// Read the artifact. `Ok(None)` when there is no artifact.
    pub fn load(&self) -> ManifestResult<Option<Manifest>> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(ManifestError::CacheRead {
                    path: self.path.clone(),
                    source,
                })
            }
        };
        let artifact: Artifact =
            serde_json::from_str(&content).map_err(|source| ManifestError::CacheCorrupt {
                path: self.path.clone(),
                source,
            })?;
        if artifact.format_version != CACHE_FORMAT_VERSION {
            return Err(ManifestError::FormatVersion {
                path: self.path.clone(),
                found: artifact.format_version,
                expected: CACHE_FORMAT_VERSION,
            });
        }
        Ok(Some(artifact.records))
    }

    /// Write the artifact, creating parent directories.
    pub fn store(&self, manifest: &Manifest) -> ManifestResult<()> {
        let artifact = ArtifactRef {
            format_version: CACHE_FORMAT_VERSION,
            records: manifest,
        };
        let json = serde_json::to_string_pretty(&artifact).map_err(ManifestError::Serialize)?;
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|source| ManifestError::CacheWrite {
                path: self.path.clone(),
                source,
            })?;
        }
        std::fs::write(&self.path, json).map_err(|source| ManifestError::CacheWrite {
            path: self.path.clone(),
            source,
        })?;
        tracing::debug!(path = %self.path.display(), records = manifest.len(), "manifest cached");
        Ok(())
    }

    /// Remove the artifact. Returns whether a file was removed.
    pub fn clear(&self) -> ManifestResult<bool> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(source) => Err(ManifestError::CacheWrite {
                path: self.path.clone(),
                source,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sitegraph_core::{AccessAttribute, RouteAttribute, SeoAttribute, SitegraphConfig};
    use sitegraph_pipeline::{ComponentDescriptor, Pipeline, StaticSource};

    fn manifest() -> Manifest {
        let source = StaticSource::new(vec![
            ComponentDescriptor::new("app::HomePage").route(RouteAttribute::new("/", "public")),
            ComponentDescriptor::new("app::AdminPage")
                .route(RouteAttribute::new("/admin/{section?}", "public"))
                .access(AccessAttribute::permissions(["admin.*"])),
        ]);
        Pipeline::from_config(&SitegraphConfig::default())
            .run(&source)
            .manifest
    }

    #[test]
    fn missing_artifact_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = CacheStore::new(dir.path().join("manifest.json"));
        assert!(!store.exists());
        assert!(store.load().unwrap().is_none());
        assert!(!store.clear().unwrap());
    }

    #[test]
    fn store_then_load_is_lossless() {
        let dir = tempfile::tempdir().unwrap();
        let store = CacheStore::new(dir.path().join("nested/dir/manifest.json"));
        let manifest = manifest();
        store.store(&manifest).unwrap();
        assert!(store.exists());
        assert_eq!(store.load().unwrap(), Some(manifest));
        assert!(store.clear().unwrap());
        assert!(!store.exists());
    }

    #[test]
    fn floats_survive_the_artifact_exactly() {
        let dir = tempfile::tempdir().unwrap();
        let store = CacheStore::new(dir.path().join("manifest.json"));
        let source = StaticSource::new(vec![ComponentDescriptor::new("app::FaqPage")
            .route(RouteAttribute::new("/faq", "public"))
            .seo(SeoAttribute {
                priority: Some(0.9856906946328695),
                ..SeoAttribute::default()
            })
            .custom_meta("weight", serde_json::json!(0.1 + 0.2))]);
        let manifest = Pipeline::from_config(&SitegraphConfig::default())
            .run(&source)
            .manifest;
        store.store(&manifest).unwrap();

        let loaded = store.load().unwrap().unwrap();
        let faq = loaded.records().next().unwrap();
        assert_eq!(faq.seo.priority.to_bits(), 0.9856906946328695f64.to_bits());
        assert_eq!(loaded, manifest);
    }

    #[test]
    fn artifact_has_format_version() {
        let dir = tempfile::tempdir().unwrap();
        let store = CacheStore::new(dir.path().join("manifest.json"));
        store.store(&manifest()).unwrap();
        let raw: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(store.path()).unwrap()).unwrap();
        assert_eq!(raw["format_version"], 1);
        assert!(raw["records"]["app.home"].is_object());
    }

    #[test]
    fn corrupt_and_foreign_artifacts_are_errors() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("manifest.json");
        let store = CacheStore::new(&path);

        std::fs::write(&path, "{ not json").unwrap();
        assert!(matches!(store.load(), Err(ManifestError::CacheCorrupt { .. })));

        std::fs::write(&path, r#"{"format_version": 9, "records": {}}"#).unwrap();
        assert!(matches!(
            store.load(),
            Err(ManifestError::FormatVersion { found: 9, .. })
        ));
    }
}
