//! # Manifest Repository
//!
//! Loads the manifest once (from the cache artifact when present, otherwise by
//! running the pipeline) and answers queries over it.
//!
//! ## Concurrency
//!
//! The loaded manifest is held as an `Arc<ManifestSnapshot>` behind a
//! `parking_lot::RwLock`. Readers clone the `Arc` and release the lock
//! immediately, so a [`clear`](ManifestRepository::clear) or
//! [`rebuild`](ManifestRepository::rebuild) never disturbs a reader that
//! already holds a snapshot. Loads and rebuilds are serialized by a separate
//! mutex; concurrent first accesses converge on a single load.
//!
//! Each index inside a snapshot is built on first use behind a
//! `std::sync::OnceLock`.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::{Arc, OnceLock};

use parking_lot::{Mutex, RwLock};

use sitegraph_core::{uri, ComponentRecord, Manifest, SitegraphConfig};
use sitegraph_pipeline::{AttributeSource, DiscoveryReport, Pipeline};

use crate::cache::CacheStore;
use crate::error::ManifestResult;

// ---------------------------------------------------------------------------
// Snapshot
// ---------------------------------------------------------------------------

/// An immutable manifest plus its lazily built indices.
#[derive(Debug, Default)]
pub struct ManifestSnapshot {
    manifest: Manifest,
    excluded_zones: BTreeSet<String>,
    by_uri: OnceLock<HashMap<String, String>>,
    by_entity: OnceLock<HashMap<String, String>>,
    by_zone: OnceLock<BTreeMap<String, Vec<String>>>,
    public: OnceLock<Vec<String>>,
    navigation: OnceLock<Vec<String>>,
}

impl ManifestSnapshot {
    /// Wrap a manifest. `excluded_zones` are left out of
    /// [`public_routes`](Self::public_routes).
    pub fn new(manifest: Manifest, excluded_zones: BTreeSet<String>) -> Self {
        Self {
            manifest,
            excluded_zones,
            ..Self::default()
        }
    }

    pub fn manifest(&self) -> &Manifest {
        &self.manifest
    }

    pub fn len(&self) -> usize {
        self.manifest.len()
    }

    pub fn is_empty(&self) -> bool {
        self.manifest.is_empty()
    }

    fn resolve<'a>(&'a self, names: &'a [String]) -> impl Iterator<Item = &'a ComponentRecord> {
        names.iter().filter_map(|name| self.manifest.get(name))
    }

    /// Every record, ordered by route name.
    pub fn all(&self) -> impl Iterator<Item = &ComponentRecord> {
        self.manifest.records()
    }

    pub fn get(&self, route_name: &str) -> Option<&ComponentRecord> {
        self.manifest.get(route_name)
    }

    /// Record whose full URI equals the normalized `uri`.
    pub fn find_by_uri(&self, uri: &str) -> Option<&ComponentRecord> {
        let index = self.by_uri.get_or_init(|| {
            self.manifest
                .records()
                .map(|r| (r.route.full_uri.clone(), r.name().to_string()))
                .collect()
        });
        index
            .get(&uri::normalize(uri))
            .and_then(|name| self.manifest.get(name))
    }

    /// Record produced from the given entity.
    pub fn find_by_entity(&self, entity_id: &str) -> Option<&ComponentRecord> {
        let index = self.by_entity.get_or_init(|| {
            self.manifest
                .records()
                .map(|r| (r.component.entity_id.clone(), r.name().to_string()))
                .collect()
        });
        index.get(entity_id).and_then(|name| self.manifest.get(name))
    }

    /// Records of one zone, ordered by route name.
    pub fn by_zone<'a>(&'a self, zone: &str) -> impl Iterator<Item = &'a ComponentRecord> {
        let index = self.by_zone.get_or_init(|| {
            let mut index: BTreeMap<String, Vec<String>> = BTreeMap::new();
            for record in self.manifest.records() {
                index
                    .entry(record.route.zone.clone())
                    .or_default()
                    .push(record.name().to_string());
            }
            index
        });
        let names = index.get(zone).map(Vec::as_slice).unwrap_or_default();
        self.resolve(names)
    }

    /// Public, sitemap-eligible records outside the excluded zones.
    pub fn public_routes(&self) -> impl Iterator<Item = &ComponentRecord> {
        let names = self.public.get_or_init(|| {
            self.manifest
                .records()
                .filter(|r| {
                    r.is_public()
                        && r.seo.sitemap_eligible
                        && !self.excluded_zones.contains(&r.route.zone)
                })
                .map(|r| r.name().to_string())
                .collect()
        });
        self.resolve(names)
    }

    /// Visible navigation entries, ordered by sort order then discovery order.
    pub fn navigation_items(&self) -> impl Iterator<Item = &ComponentRecord> {
        let names = self.navigation.get_or_init(|| {
            let mut items: Vec<&ComponentRecord> =
                self.manifest.records().filter(|r| r.is_navigable()).collect();
            items.sort_by_key(|r| (r.navigation.sort, r.component.ordinal));
            items.into_iter().map(|r| r.name().to_string()).collect()
        });
        self.resolve(names)
    }

    /// Visible navigation entries of one zone.
    pub fn navigation_for_zone<'a>(
        &'a self,
        zone: &'a str,
    ) -> impl Iterator<Item = &'a ComponentRecord> {
        self.navigation_items().filter(move |r| r.route.zone == zone)
    }
}

// ---------------------------------------------------------------------------
// Repository
// ---------------------------------------------------------------------------

/// Result of [`ManifestRepository::rebuild`].
#[derive(Debug, Clone)]
pub enum RebuildOutcome {
    /// An artifact existed and `force` was not set.
    CacheKept { records: usize },
    /// The pipeline ran.
    Rebuilt(Arc<DiscoveryReport>),
}

/// Cache-or-compute access to the manifest.
pub struct ManifestRepository {
    pipeline: Pipeline,
    source: Arc<dyn AttributeSource>,
    cache: Option<CacheStore>,
    excluded_zones: BTreeSet<String>,
    snapshot: RwLock<Option<Arc<ManifestSnapshot>>>,
    last_report: RwLock<Option<Arc<DiscoveryReport>>>,
    load_lock: Mutex<()>,
}

impl std::fmt::Debug for ManifestRepository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ManifestRepository")
            .field("pipeline", &self.pipeline)
            .field("cache", &self.cache)
            .field("loaded", &self.snapshot.read().is_some())
            .finish()
    }
}

impl ManifestRepository {
    pub fn new(
        pipeline: Pipeline,
        source: Arc<dyn AttributeSource>,
        cache: Option<CacheStore>,
    ) -> Self {
        Self {
            pipeline,
            source,
            cache,
            excluded_zones: BTreeSet::new(),
            snapshot: RwLock::new(None),
            last_report: RwLock::new(None),
            load_lock: Mutex::new(()),
        }
    }

    /// Repository with the canonical pipeline, the configured cache (when
    /// enabled and a path is set) and the sitemap zone exclusions.
    pub fn from_config(config: &SitegraphConfig, source: Arc<dyn AttributeSource>) -> Self {
        let cache = if config.cache.enabled {
            config.cache.path.clone().map(CacheStore::new)
        } else {
            None
        };
        Self::new(Pipeline::from_config(config), source, cache)
            .with_excluded_zones(config.sitemap.excluded_zones.clone())
    }

    /// Zones left out of [`public_routes`](Self::public_routes).
    pub fn with_excluded_zones(mut self, zones: BTreeSet<String>) -> Self {
        self.excluded_zones = zones;
        self
    }

    pub fn cache(&self) -> Option<&CacheStore> {
        self.cache.as_ref()
    }

    /// The loaded manifest, loading it on first call.
    pub fn snapshot(&self) -> Arc<ManifestSnapshot> {
        if let Some(snapshot) = self.snapshot.read().as_ref() {
            return Arc::clone(snapshot);
        }
        let _guard = self.load_lock.lock();
        if let Some(snapshot) = self.snapshot.read().as_ref() {
            return Arc::clone(snapshot);
        }
        let manifest = match self.load_cached() {
            Some(manifest) => manifest,
            None => {
                let report = self.compute();
                if let Some(cache) = &self.cache {
                    if let Err(e) = cache.store(&report.manifest) {
                        tracing::warn!(error = %e, "failed to persist manifest cache");
                    }
                }
                report.manifest.clone()
            }
        };
        self.install(manifest)
    }

    fn load_cached(&self) -> Option<Manifest> {
        let cache = self.cache.as_ref()?;
        match cache.load() {
            Ok(Some(manifest)) => {
                tracing::debug!(
                    path = %cache.path().display(),
                    records = manifest.len(),
                    "manifest cache hit"
                );
                Some(manifest)
            }
            Ok(None) => {
                tracing::debug!(path = %cache.path().display(), "manifest cache miss");
                None
            }
            Err(e) => {
                tracing::warn!(error = %e, "ignoring unreadable manifest cache");
                None
            }
        }
    }

    fn compute(&self) -> Arc<DiscoveryReport> {
        let report = Arc::new(self.pipeline.run(self.source.as_ref()));
        *self.last_report.write() = Some(Arc::clone(&report));
        report
    }

    fn install(&self, manifest: Manifest) -> Arc<ManifestSnapshot> {
        let snapshot = Arc::new(ManifestSnapshot::new(manifest, self.excluded_zones.clone()));
        *self.snapshot.write() = Some(Arc::clone(&snapshot));
        snapshot
    }

    /// Recompute the manifest and persist it when caching is enabled.
    /// Without `force` an existing artifact is kept and loaded instead.
    pub fn rebuild(&self, force: bool) -> ManifestResult<RebuildOutcome> {
        let _guard = self.load_lock.lock();
        if !force {
            if let Some(manifest) = self.load_cached() {
                let records = manifest.len();
                self.install(manifest);
                return Ok(RebuildOutcome::CacheKept { records });
            }
        }
        let report = self.compute();
        if let Some(cache) = &self.cache {
            cache.store(&report.manifest)?;
        }
        self.install(report.manifest.clone());
        tracing::info!(records = report.manifest.len(), "manifest rebuilt");
        Ok(RebuildOutcome::Rebuilt(report))
    }

    /// Drop the in-memory manifest and remove the cache artifact. Returns
    /// whether an artifact was removed.
    pub fn clear(&self) -> ManifestResult<bool> {
        let _guard = self.load_lock.lock();
        *self.snapshot.write() = None;
        *self.last_report.write() = None;
        match &self.cache {
            Some(cache) => cache.clear(),
            None => Ok(false),
        }
    }

    /// Whether a cache artifact exists.
    pub fn is_cached(&self) -> bool {
        self.cache.as_ref().is_some_and(CacheStore::exists)
    }

    /// Report of the last pipeline run; `None` if the manifest came from the
    /// cache or has not been loaded.
    pub fn last_report(&self) -> Option<Arc<DiscoveryReport>> {
        self.last_report.read().clone()
    }

    // -- queries -------------------------------------------------------------

    pub fn all(&self) -> Vec<ComponentRecord> {
        self.snapshot().all().cloned().collect()
    }

    pub fn get(&self, route_name: &str) -> Option<ComponentRecord> {
        self.snapshot().get(route_name).cloned()
    }

    pub fn find_by_uri(&self, uri: &str) -> Option<ComponentRecord> {
        self.snapshot().find_by_uri(uri).cloned()
    }

    pub fn find_by_entity(&self, entity_id: &str) -> Option<ComponentRecord> {
        self.snapshot().find_by_entity(entity_id).cloned()
    }

    pub fn by_zone(&self, zone: &str) -> Vec<ComponentRecord> {
        self.snapshot().by_zone(zone).cloned().collect()
    }

    pub fn public_routes(&self) -> Vec<ComponentRecord> {
        self.snapshot().public_routes().cloned().collect()
    }

    pub fn navigation_items(&self) -> Vec<ComponentRecord> {
        self.snapshot().navigation_items().cloned().collect()
    }

    pub fn navigation_for_zone(&self, zone: &str) -> Vec<ComponentRecord> {
        self.snapshot().navigation_for_zone(zone).cloned().collect()
    }
}
