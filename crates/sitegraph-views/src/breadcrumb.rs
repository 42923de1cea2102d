//! # Breadcrumbs
//!
//! A chain always starts with the home crumb and ends with the target, which
//! is the only active crumb.
//!
//! Ancestors come from the target's explicit navigation parent when it has
//! one (recursively, through the parent's own ancestors). Otherwise they are
//! inferred from the URI: every prefix of the target's non-parameter path
//! segments that is exactly some other record's full URI becomes an ancestor.
//!
//! Parent cycles are cut at the first revisited route, and the walk never
//! goes deeper than the number of records in the manifest.

use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use serde::Serialize;

use sitegraph_core::text::{is_wildcard, wildcard_matches};
use sitegraph_core::uri::{self, is_parameter_segment};
use sitegraph_core::{BreadcrumbConfig, ComponentRecord};
use sitegraph_manifest::ManifestSnapshot;

use crate::url::{record_url, RouteParams};

/// One crumb.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Breadcrumb {
    pub label: String,
    /// `None` when the route needs parameters that were not supplied.
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub route_name: Option<String>,
    pub active: bool,
}

/// Computes a label for a record, typically from request parameters
/// (`"Order #{id}"`, a product name looked up by slug, ...).
pub trait LabelResolver: Send + Sync {
    fn resolve(&self, record: &ComponentRecord, params: &RouteParams) -> Option<String>;
}

impl<F> LabelResolver for F
where
    F: Fn(&ComponentRecord, &RouteParams) -> Option<String> + Send + Sync,
{
    fn resolve(&self, record: &ComponentRecord, params: &RouteParams) -> Option<String> {
        self(record, params)
    }
}

/// Final override applied to every resolved label.
pub trait Translator: Send + Sync {
    fn translate(&self, label: &str) -> Option<String>;
}

impl Translator for HashMap<String, String> {
    fn translate(&self, label: &str) -> Option<String> {
        self.get(label).cloned()
    }
}

/// Replace `{name}` placeholders with parameter values.
pub fn substitute_label(label: &str, params: &RouteParams) -> String {
    params.iter().fold(label.to_string(), |acc, (name, value)| {
        acc.replace(&format!("{{{name}}}"), value)
    })
}

/// Builds breadcrumb chains over a manifest snapshot.
pub struct BreadcrumbResolver {
    snapshot: Arc<ManifestSnapshot>,
    config: BreadcrumbConfig,
    exact: HashMap<String, Box<dyn LabelResolver>>,
    patterns: Vec<(String, Box<dyn LabelResolver>)>,
    translator: Option<Box<dyn Translator>>,
}

impl std::fmt::Debug for BreadcrumbResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BreadcrumbResolver")
            .field("records", &self.snapshot.len())
            .field("config", &self.config)
            .field("exact_resolvers", &self.exact.len())
            .field("pattern_resolvers", &self.patterns.len())
            .field("translator", &self.translator.is_some())
            .finish()
    }
}

impl BreadcrumbResolver {
    pub fn new(snapshot: Arc<ManifestSnapshot>, config: BreadcrumbConfig) -> Self {
        Self {
            snapshot,
            config,
            exact: HashMap::new(),
            patterns: Vec::new(),
            translator: None,
        }
    }

    /// Register a label resolver for a route name or a wildcard pattern
    /// (`shop.products.*`). Exact registrations take precedence; patterns are
    /// tried in registration order.
    pub fn register_label_resolver(
        &mut self,
        route: impl Into<String>,
        resolver: impl LabelResolver + 'static,
    ) -> &mut Self {
        let route = route.into();
        if is_wildcard(&route) {
            self.patterns.push((route, Box::new(resolver)));
        } else {
            self.exact.insert(route, Box::new(resolver));
        }
        self
    }

    pub fn set_translator(&mut self, translator: impl Translator + 'static) -> &mut Self {
        self.translator = Some(Box::new(translator));
        self
    }

    /// Label for one record.
    pub fn label_for(&self, record: &ComponentRecord, params: &RouteParams) -> String {
        let name = record.name();
        let dynamic = self
            .exact
            .get(name)
            .and_then(|r| r.resolve(record, params))
            .or_else(|| {
                self.patterns
                    .iter()
                    .filter(|(pattern, _)| wildcard_matches(pattern, name))
                    .find_map(|(_, r)| r.resolve(record, params))
            });
        let label =
            dynamic.unwrap_or_else(|| substitute_label(&record.navigation.label, params));
        match &self.translator {
            Some(translator) => translator.translate(&label).unwrap_or(label),
            None => label,
        }
    }

    fn is_home(&self, record: &ComponentRecord) -> bool {
        match &self.config.home_route {
            Some(home) => record.name() == home,
            None => record.route.full_uri == uri::normalize(&self.config.home_url),
        }
    }

    fn home_crumb(&self) -> Breadcrumb {
        Breadcrumb {
            label: self.config.home_label.clone(),
            url: Some(self.config.home_url.clone()),
            route_name: self.config.home_route.clone(),
            active: false,
        }
    }

    /// Ancestors of `record` followed by `record` itself.
    fn chain<'s>(
        &'s self,
        record: &'s ComponentRecord,
        visited: &mut BTreeSet<String>,
        depth: usize,
    ) -> Vec<&'s ComponentRecord> {
        if depth > self.snapshot.len() || !visited.insert(record.name().to_string()) {
            tracing::debug!(route = %record.name(), "breadcrumb parent cycle truncated");
            return Vec::new();
        }
        let mut chain = match record.navigation.parent.as_deref() {
            Some(parent) => match self.snapshot.get(parent) {
                Some(parent) => self.chain(parent, visited, depth + 1),
                None => Vec::new(),
            },
            None => self.inferred_ancestors(record, visited),
        };
        chain.push(record);
        chain
    }

    fn inferred_ancestors<'s>(
        &'s self,
        record: &ComponentRecord,
        visited: &mut BTreeSet<String>,
    ) -> Vec<&'s ComponentRecord> {
        let segments: Vec<&str> = uri::segments(&record.route.full_uri)
            .filter(|s| !is_parameter_segment(s))
            .collect();
        let mut ancestors = Vec::new();
        for end in 1..=segments.len() {
            let prefix = format!("/{}", segments[..end].join("/"));
            if let Some(ancestor) = self.snapshot.find_by_uri(&prefix) {
                if ancestor.name() != record.name() && visited.insert(ancestor.name().to_string())
                {
                    ancestors.push(ancestor);
                }
            }
        }
        ancestors
    }

    /// Breadcrumbs for `target`. Unknown or absent targets yield only the
    /// home crumb.
    pub fn generate(&self, target: Option<&str>, params: &RouteParams) -> Vec<Breadcrumb> {
        let mut crumbs = vec![self.home_crumb()];
        if let Some(record) = target.and_then(|name| self.snapshot.get(name)) {
            let mut visited = BTreeSet::new();
            for record in self.chain(record, &mut visited, 0) {
                if self.is_home(record) {
                    continue;
                }
                crumbs.push(Breadcrumb {
                    label: self.label_for(record, params),
                    url: record_url(record, params),
                    route_name: Some(record.name().to_string()),
                    active: false,
                });
            }
        }
        if let Some(last) = crumbs.last_mut() {
            last.active = true;
        }
        crumbs
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::url::params;
    use sitegraph_core::{NavigationAttribute, RouteAttribute, SitegraphConfig, ZoneConfig};
    use sitegraph_pipeline::{ComponentDescriptor, Pipeline, StaticSource};

    fn snapshot(descriptors: Vec<ComponentDescriptor>) -> Arc<ManifestSnapshot> {
        let mut config = SitegraphConfig::default();
        config.zones.insert(
            "admin".to_string(),
            ZoneConfig {
                name: "admin".to_string(),
                uri_prefix: "/admin".to_string(),
                middleware: vec!["web".to_string()],
                ..ZoneConfig::default()
            },
        );
        let manifest = Pipeline::from_config(&config)
            .run(&StaticSource::new(descriptors))
            .manifest;
        Arc::new(ManifestSnapshot::new(manifest, BTreeSet::new()))
    }

    fn admin_pages() -> Vec<ComponentDescriptor> {
        vec![
            ComponentDescriptor::new("UserListPage")
                .route(RouteAttribute::new("/users", "admin").named("admin.users.index"))
                .navigation(NavigationAttribute::new("All Users", 1)),
            ComponentDescriptor::new("UserDetailPage")
                .route(RouteAttribute::new("/users/{user}", "admin").named("admin.users.show")),
        ]
    }

    fn summary(crumbs: &[Breadcrumb]) -> Vec<(&str, bool, bool)> {
        crumbs
            .iter()
            .map(|c| (c.label.as_str(), c.url.is_some(), c.active))
            .collect()
    }

    #[test]
    fn uri_inference_finds_sibling_index() {
        let resolver = BreadcrumbResolver::new(snapshot(admin_pages()), BreadcrumbConfig::default());
        let crumbs = resolver.generate(Some("admin.users.show"), &RouteParams::new());
        assert_eq!(
            summary(&crumbs),
            vec![
                ("Home", true, false),
                ("All Users", true, false),
                ("User Detail", false, true),
            ]
        );
        assert_eq!(crumbs[1].url.as_deref(), Some("/admin/users"));
    }

    #[test]
    fn unknown_target_is_home_only() {
        let resolver = BreadcrumbResolver::new(snapshot(admin_pages()), BreadcrumbConfig::default());
        let crumbs = resolver.generate(Some("nope"), &RouteParams::new());
        assert_eq!(summary(&crumbs), vec![("Home", true, true)]);
        assert_eq!(resolver.generate(None, &RouteParams::new()).len(), 1);
    }

    #[test]
    fn explicit_parent_and_label_substitution() {
        let mut pages = admin_pages();
        pages.push(
            ComponentDescriptor::new("OrderPage")
                .route(RouteAttribute::new("/orders/{order}", "public").named("orders.show"))
                .navigation(
                    NavigationAttribute::new("Order #{order}", 1).with_parent("admin.users.show"),
                ),
        );
        let resolver = BreadcrumbResolver::new(snapshot(pages), BreadcrumbConfig::default());
        let crumbs = resolver.generate(
            Some("orders.show"),
            &params([("order", "17"), ("user", "3")]),
        );
        let labels: Vec<&str> = crumbs.iter().map(|c| c.label.as_str()).collect();
        assert_eq!(labels, vec!["Home", "All Users", "User Detail", "Order #17"]);
        assert_eq!(crumbs[2].url.as_deref(), Some("/admin/users/3"));
        assert_eq!(crumbs[3].url.as_deref(), Some("/orders/17"));
        assert!(crumbs[3].active);
    }

    #[test]
    fn parent_cycles_are_truncated() {
        let pages = vec![
            ComponentDescriptor::new("APage")
                .route(RouteAttribute::new("/a", "public").named("a"))
                .navigation(NavigationAttribute::new("A", 1).with_parent("b")),
            ComponentDescriptor::new("BPage")
                .route(RouteAttribute::new("/b", "public").named("b"))
                .navigation(NavigationAttribute::new("B", 1).with_parent("a")),
        ];
        let resolver = BreadcrumbResolver::new(snapshot(pages), BreadcrumbConfig::default());
        let labels: Vec<String> = resolver
            .generate(Some("a"), &RouteParams::new())
            .into_iter()
            .map(|c| c.label)
            .collect();
        assert_eq!(labels, vec!["Home", "B", "A"]);
    }

    #[test]
    fn unknown_parent_ends_chain() {
        let pages = vec![ComponentDescriptor::new("XPage")
            .route(RouteAttribute::new("/x", "public").named("x"))
            .navigation(NavigationAttribute::new("X", 1).with_parent("ghost"))];
        let resolver = BreadcrumbResolver::new(snapshot(pages), BreadcrumbConfig::default());
        assert_eq!(resolver.generate(Some("x"), &RouteParams::new()).len(), 2);
    }

    #[test]
    fn resolvers_and_translation() {
        let mut resolver =
            BreadcrumbResolver::new(snapshot(admin_pages()), BreadcrumbConfig::default());
        resolver
            .register_label_resolver("admin.users.*", |_: &ComponentRecord, p: &RouteParams| {
                p.get("user").map(|u| format!("User {u}"))
            })
            .register_label_resolver("admin.users.index", |_: &ComponentRecord, _: &RouteParams| {
                Some("People".to_string())
            });
        let mut translations = HashMap::new();
        translations.insert("Home".to_string(), "Start".to_string());
        translations.insert("People".to_string(), "Personen".to_string());
        resolver.set_translator(translations);

        let crumbs = resolver.generate(Some("admin.users.show"), &params([("user", "ada")]));
        let labels: Vec<&str> = crumbs.iter().map(|c| c.label.as_str()).collect();
        // The home crumb is configured text and is not translated.
        assert_eq!(labels, vec!["Home", "Personen", "User ada"]);
    }

    #[test]
    fn home_route_is_not_duplicated() {
        let pages = vec![
            ComponentDescriptor::new("HomePage")
                .route(RouteAttribute::new("/", "public").named("home"))
                .navigation(NavigationAttribute::new("Welcome", 0)),
            ComponentDescriptor::new("AboutPage")
                .route(RouteAttribute::new("/about", "public").named("about"))
                .navigation(NavigationAttribute::new("About", 1).with_parent("home")),
        ];
        let config = BreadcrumbConfig {
            home_route: Some("home".to_string()),
            ..BreadcrumbConfig::default()
        };
        let resolver = BreadcrumbResolver::new(snapshot(pages), config);
        let crumbs = resolver.generate(Some("about"), &RouteParams::new());
        assert_eq!(summary(&crumbs), vec![("Home", true, false), ("About", true, true)]);
        assert_eq!(crumbs[0].route_name.as_deref(), Some("home"));

        let crumbs = resolver.generate(Some("home"), &RouteParams::new());
        assert_eq!(summary(&crumbs), vec![("Home", true, true)]);
    }

    #[test]
    fn placeholder_substitution() {
        let p = params([("id", "9")]);
        assert_eq!(substitute_label("Item {id} of {id}", &p), "Item 9 of 9");
        assert_eq!(substitute_label("Item {missing}", &p), "Item {missing}");
    }
}
