//! # Attribute Sources
//!
//! An [`AttributeSource`] enumerates candidate entities and, per entity,
//! yields its structural facts plus zero or one raw attribute of each kind.
//! Components are described by plain data ([`ComponentDescriptor`]) rather
//! than discovered through runtime inspection.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use sitegraph_core::text::namespace_segments;
use sitegraph_core::{AccessAttribute, NavigationAttribute, RouteAttribute, SeoAttribute};

use crate::error::{PipelineError, PipelineResult};

/// Structural facts about an entity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityFacts {
    pub entity_id: String,
    pub short_name: String,
    pub namespace_path: String,
    pub source_path: Option<String>,
}

/// Raw per-kind attributes; each kind is optional.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawAttributes {
    pub route: Option<RouteAttribute>,
    pub navigation: Option<NavigationAttribute>,
    pub access: Option<AccessAttribute>,
    pub seo: Option<SeoAttribute>,
}

/// One entity as seen by the processors.
#[derive(Debug, Clone, PartialEq)]
pub struct DiscoveredEntity {
    pub facts: EntityFacts,
    pub attributes: RawAttributes,
    /// Present only for entities exposing custom metadata.
    pub custom_meta: Option<BTreeMap<String, serde_json::Value>>,
}

/// Serializable description of a routable component.
///
/// `short_name` defaults to the last segment of `id` and `namespace` to the
/// segments before it, so `app::screens::admin::UserListPage` needs nothing
/// else to be named.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ComponentDescriptor {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub short_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub route: Option<RouteAttribute>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub navigation: Option<NavigationAttribute>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access: Option<AccessAttribute>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seo: Option<SeoAttribute>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_meta: Option<BTreeMap<String, serde_json::Value>>,
}

impl ComponentDescriptor {
    /// Descriptor with only an id.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }

    pub fn route(mut self, route: RouteAttribute) -> Self {
        self.route = Some(route);
        self
    }

    pub fn navigation(mut self, navigation: NavigationAttribute) -> Self {
        self.navigation = Some(navigation);
        self
    }

    pub fn access(mut self, access: AccessAttribute) -> Self {
        self.access = Some(access);
        self
    }

    pub fn seo(mut self, seo: SeoAttribute) -> Self {
        self.seo = Some(seo);
        self
    }

    pub fn custom_meta(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.custom_meta
            .get_or_insert_with(BTreeMap::new)
            .insert(key.into(), value);
        self
    }
}

impl From<ComponentDescriptor> for DiscoveredEntity {
    fn from(descriptor: ComponentDescriptor) -> Self {
        let mut segments = namespace_segments(&descriptor.id);
        let last = segments.pop().unwrap_or_else(|| descriptor.id.clone());
        let short_name = descriptor.short_name.unwrap_or(last);
        let namespace_path = descriptor.namespace.unwrap_or_else(|| segments.join("::"));
        Self {
            facts: EntityFacts {
                entity_id: descriptor.id,
                short_name,
                namespace_path,
                source_path: descriptor.source_path,
            },
            attributes: RawAttributes {
                route: descriptor.route,
                navigation: descriptor.navigation,
                access: descriptor.access,
                seo: descriptor.seo,
            },
            custom_meta: descriptor.custom_meta,
        }
    }
}

/// Supplies candidate entities to the pipeline.
pub trait AttributeSource: Send + Sync {
    /// Ids of all candidate entities, in discovery order.
    fn entity_ids(&self) -> Vec<String>;

    /// Load one entity. Failures are per entity; the pipeline skips the
    /// entity and carries on.
    fn inspect(&self, entity_id: &str) -> PipelineResult<DiscoveredEntity>;
}

// ---------------------------------------------------------------------------
// StaticSource
// ---------------------------------------------------------------------------

/// In-memory list of descriptors.
#[derive(Debug, Clone, Default)]
pub struct StaticSource {
    descriptors: Vec<ComponentDescriptor>,
}

impl StaticSource {
    pub fn new(descriptors: Vec<ComponentDescriptor>) -> Self {
        Self { descriptors }
    }

    pub fn push(&mut self, descriptor: ComponentDescriptor) {
        self.descriptors.push(descriptor);
    }
}

impl AttributeSource for StaticSource {
    fn entity_ids(&self) -> Vec<String> {
        self.descriptors.iter().map(|d| d.id.clone()).collect()
    }

    fn inspect(&self, entity_id: &str) -> PipelineResult<DiscoveredEntity> {
        self.descriptors
            .iter()
            .find(|d| d.id == entity_id)
            .cloned()
            .map(DiscoveredEntity::from)
            .ok_or_else(|| PipelineError::Source {
                entity: entity_id.to_string(),
                reason: "not registered".to_string(),
            })
    }
}

// ---------------------------------------------------------------------------
// RegisteredComponents (inventory)
// ---------------------------------------------------------------------------

/// Static registration entry collected via `inventory`.
pub struct ComponentRegistration {
    /// Entity id; must be unique across the binary.
    pub id: &'static str,
    /// Builds the descriptor on demand.
    pub describe: fn() -> ComponentDescriptor,
}

impl ComponentRegistration {
    pub const fn new(id: &'static str, describe: fn() -> ComponentDescriptor) -> Self {
        Self { id, describe }
    }
}

inventory::collect!(ComponentRegistration);

/// Register a component descriptor at link time.
///
/// ```ignore
/// fn users() -> ComponentDescriptor {
///     ComponentDescriptor::new("app::screens::admin::UserListPage")
///         .route(RouteAttribute::new("/users", "admin"))
/// }
/// sitegraph_pipeline::register_component!("app::screens::admin::UserListPage", users);
/// ```
#[macro_export]
macro_rules! register_component {
    ($id:expr, $describe:path) => {
        $crate::inventory::submit! {
            $crate::source::ComponentRegistration::new($id, $describe)
        }
    };
}

/// Every component registered with [`register_component!`] in the binary.
///
/// Link order is not stable, so entities are enumerated sorted by id.
#[derive(Debug, Clone, Copy, Default)]
pub struct RegisteredComponents;

impl AttributeSource for RegisteredComponents {
    fn entity_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = inventory::iter::<ComponentRegistration>
            .into_iter()
            .map(|reg| reg.id.to_string())
            .collect();
        ids.sort();
        ids
    }

    fn inspect(&self, entity_id: &str) -> PipelineResult<DiscoveredEntity> {
        let registration = inventory::iter::<ComponentRegistration>
            .into_iter()
            .find(|reg| reg.id == entity_id)
            .ok_or_else(|| PipelineError::Source {
                entity: entity_id.to_string(),
                reason: "not registered".to_string(),
            })?;
        let descriptor = (registration.describe)();
        if descriptor.id != entity_id {
            return Err(PipelineError::Source {
                entity: entity_id.to_string(),
                reason: format!("descriptor reports id {:?}", descriptor.id),
            });
        }
        Ok(descriptor.into())
    }
}

// ---------------------------------------------------------------------------
// CatalogSource
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
struct CatalogDocument {
    #[serde(default)]
    components: Vec<serde_yaml::Value>,
}

/// Descriptors read from a YAML catalog:
///
/// ```yaml
/// components:
///   - id: app::screens::admin::UserListPage
///     route: { uri: /users, zone: admin }
///     navigation: { label: All Users, group: People, sort: 10 }
/// ```
///
/// The document is parsed eagerly but each entry is decoded on
/// [`inspect`](AttributeSource::inspect), so one malformed entry only skips
/// that entity.
#[derive(Debug, Clone)]
pub struct CatalogSource {
    path: PathBuf,
    entries: Vec<(String, serde_yaml::Value)>,
}

impl CatalogSource {
    /// Read a catalog file.
    pub fn load(path: &Path) -> PipelineResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| PipelineError::CatalogRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml_str(&content, path)
    }

    /// Parse catalog content; `origin` is used in error messages.
    pub fn from_yaml_str(content: &str, origin: &Path) -> PipelineResult<Self> {
        let document: CatalogDocument =
            serde_yaml::from_str(content).map_err(|source| PipelineError::CatalogParse {
                path: origin.to_path_buf(),
                source,
            })?;
        let entries = document
            .components
            .into_iter()
            .enumerate()
            .map(|(index, value)| {
                let id = value
                    .get("id")
                    .and_then(|v| v.as_str())
                    .map(str::to_string)
                    .unwrap_or_else(|| format!("#{index}"));
                (id, value)
            })
            .collect();
        Ok(Self {
            path: origin.to_path_buf(),
            entries,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl AttributeSource for CatalogSource {
    fn entity_ids(&self) -> Vec<String> {
        self.entries.iter().map(|(id, _)| id.clone()).collect()
    }

    fn inspect(&self, entity_id: &str) -> PipelineResult<DiscoveredEntity> {
        let (_, value) = self
            .entries
            .iter()
            .find(|(id, _)| id == entity_id)
            .ok_or_else(|| PipelineError::Source {
                entity: entity_id.to_string(),
                reason: format!("not present in {}", self.path.display()),
            })?;
        let descriptor: ComponentDescriptor =
            serde_yaml::from_value(value.clone()).map_err(|e| PipelineError::Source {
                entity: entity_id.to_string(),
                reason: e.to_string(),
            })?;
        Ok(descriptor.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn descriptor_derives_short_name_and_namespace() {
        let entity: DiscoveredEntity =
            ComponentDescriptor::new("app::screens::admin::UserListPage").into();
        assert_eq!(entity.facts.short_name, "UserListPage");
        assert_eq!(entity.facts.namespace_path, "app::screens::admin");
    }

    #[test]
    fn descriptor_overrides_win() {
        let mut descriptor = ComponentDescriptor::new("x");
        descriptor.short_name = Some("HomePage".to_string());
        descriptor.namespace = Some("App\\Screens".to_string());
        let entity: DiscoveredEntity = descriptor.into();
        assert_eq!(entity.facts.short_name, "HomePage");
        assert_eq!(entity.facts.namespace_path, "App\\Screens");
    }

    #[test]
    fn static_source_preserves_order() {
        let source = StaticSource::new(vec![
            ComponentDescriptor::new("b"),
            ComponentDescriptor::new("a"),
        ]);
        assert_eq!(source.entity_ids(), vec!["b", "a"]);
        assert!(source.inspect("a").is_ok());
        assert!(matches!(source.inspect("zzz"), Err(PipelineError::Source { .. })));
    }

    const CATALOG: &str = r#"
components:
  - id: app::screens::HomePage
    route: { uri: /, zone: public }
    navigation: { label: Home, sort: 1 }
  - id: app::screens::BrokenPage
    route: { uri: /broken }
    unexpected: true
  - route: { uri: /anonymous }
"#;

    #[test]
    fn catalog_decodes_entries_lazily() {
        let source = CatalogSource::from_yaml_str(CATALOG, Path::new("catalog.yaml")).unwrap();
        assert_eq!(source.len(), 3);
        assert_eq!(
            source.entity_ids(),
            vec!["app::screens::HomePage", "app::screens::BrokenPage", "#2"]
        );
        let home = source.inspect("app::screens::HomePage").unwrap();
        assert_eq!(home.attributes.route.unwrap().uri, "/");
        assert!(matches!(
            source.inspect("app::screens::BrokenPage"),
            Err(PipelineError::Source { .. })
        ));
        // Entry without an id fails descriptor decoding.
        assert!(source.inspect("#2").is_err());
    }

    #[test]
    fn catalog_duplicate_ids_keep_first_entry() {
        let catalog = r#"
components:
  - id: app::Dup
    route: { uri: /first, name: first }
  - id: app::Dup
    route: { uri: /second, name: second }
"#;
        let source = CatalogSource::from_yaml_str(catalog, Path::new("catalog.yaml")).unwrap();
        let report = crate::Pipeline::from_config(&sitegraph_core::SitegraphConfig::default())
            .run(&source);
        assert_eq!(report.scanned, 2);
        assert!(report.collisions.is_empty());
        assert_eq!(report.skipped.len(), 1);
        assert!(report.skipped[0].reason.contains("entry #1"));
        let names: Vec<&str> = report.manifest.names().collect();
        assert_eq!(names, vec!["first"]);
    }

    #[test]
    fn catalog_load_missing_file() {
        let err = CatalogSource::load(Path::new("/nonexistent/catalog.yaml")).unwrap_err();
        assert!(matches!(err, PipelineError::CatalogRead { .. }));
    }

    #[test]
    fn catalog_load_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("catalog.yaml");
        std::fs::write(&path, CATALOG).unwrap();
        let source = CatalogSource::load(&path).unwrap();
        assert_eq!(source.path(), path.as_path());
        assert!(!source.is_empty());
    }

    fn registered_dashboard() -> ComponentDescriptor {
        ComponentDescriptor::new("tests::registered::DashboardPage")
            .route(RouteAttribute::new("/dashboard", "public"))
    }

    crate::register_component!("tests::registered::DashboardPage", registered_dashboard);

    #[test]
    fn registered_components_are_collected() {
        let source = RegisteredComponents;
        let ids = source.entity_ids();
        assert!(ids.contains(&"tests::registered::DashboardPage".to_string()));
        let entity = source.inspect("tests::registered::DashboardPage").unwrap();
        assert_eq!(entity.facts.short_name, "DashboardPage");
    }
}
