//! # Component Records and the Manifest
//!
//! A [`ComponentRecord`] is the fully-resolved description of one routable
//! component. The [`Manifest`] maps final route names to records.
//!
//! ## Invariants
//!
//! - Every record carries all four resolved specs (enforced by the type).
//! - `route.full_uri` is normalized: one leading slash, no trailing slash
//!   except the root.
//! - `middleware` contains no duplicate tags.
//! - `seo.sitemap_eligible` implies `access.is_public()`.
//!
//! [`Manifest::validate`] checks the invariants the type system cannot.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::access::ResolvedAccess;
use crate::navigation::ResolvedNavigation;
use crate::route::ResolvedRoute;
use crate::seo::ResolvedSeo;
use crate::uri;

/// Identity of the entity a record was derived from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComponentIdentity {
    /// Stable identifier from the attribute source.
    pub entity_id: String,
    /// Short type name (e.g. `UserDetailPage`).
    pub short_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_path: Option<String>,
    #[serde(default)]
    pub namespace_path: String,
    /// Position in discovery order.
    pub ordinal: usize,
}

/// Fully resolved component.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentRecord {
    pub component: ComponentIdentity,
    pub route: ResolvedRoute,
    pub navigation: ResolvedNavigation,
    pub access: ResolvedAccess,
    pub seo: ResolvedSeo,
    /// Deduplicated union of zone, route, access-derived and rate-limit tags.
    pub middleware: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_meta: Option<BTreeMap<String, serde_json::Value>>,
}

impl ComponentRecord {
    /// Final route name.
    pub fn name(&self) -> &str {
        &self.route.name
    }

    /// Whether the page needs no permission, role or login.
    pub fn is_public(&self) -> bool {
        self.access.is_public()
    }

    /// Whether the page should appear in menus.
    pub fn is_navigable(&self) -> bool {
        !self.navigation.hidden
    }
}

/// A broken manifest invariant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestViolation {
    pub route: String,
    pub detail: String,
}

impl std::fmt::Display for ManifestViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.route, self.detail)
    }
}

/// Route name → record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Manifest {
    records: BTreeMap<String, ComponentRecord>,
}

impl Manifest {
    /// Empty manifest.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a record under its route name, returning the record it replaced.
    pub fn insert(&mut self, record: ComponentRecord) -> Option<ComponentRecord> {
        self.records.insert(record.route.name.clone(), record)
    }

    pub fn get(&self, route_name: &str) -> Option<&ComponentRecord> {
        self.records.get(route_name)
    }

    pub fn contains(&self, route_name: &str) -> bool {
        self.records.contains_key(route_name)
    }

    /// Records ordered by route name.
    pub fn records(&self) -> impl Iterator<Item = &ComponentRecord> {
        self.records.values()
    }

    /// Route names in order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.records.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Check the invariants listed in the module docs.
    pub fn validate(&self) -> Vec<ManifestViolation> {
        let mut violations = Vec::new();
        for (key, record) in &self.records {
            let mut report = |detail: String| {
                violations.push(ManifestViolation {
                    route: key.clone(),
                    detail,
                });
            };
            if key != &record.route.name {
                report(format!("keyed under a different name than {:?}", record.route.name));
            }
            if uri::normalize(&record.route.full_uri) != record.route.full_uri {
                report(format!("full_uri {:?} is not normalized", record.route.full_uri));
            }
            let mut seen = BTreeSet::new();
            for tag in &record.middleware {
                if !seen.insert(tag.as_str()) {
                    report(format!("duplicate middleware tag {tag:?}"));
                }
            }
            if record.seo.sitemap_eligible && !record.access.is_public() {
                report("sitemap-eligible but not public".to_string());
            }
            if !(0.0..=1.0).contains(&record.seo.priority) {
                report(format!("sitemap priority {} outside [0, 1]", record.seo.priority));
            }
        }
        violations
    }
}

impl FromIterator<ComponentRecord> for Manifest {
    fn from_iter<T: IntoIterator<Item = ComponentRecord>>(iter: T) -> Self {
        let mut manifest = Self::new();
        for record in iter {
            manifest.insert(record);
        }
        manifest
    }
}

impl<'a> IntoIterator for &'a Manifest {
    type Item = &'a ComponentRecord;
    type IntoIter = std::collections::btree_map::Values<'a, String, ComponentRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.values()
    }
}
