//! # Manifest Properties
//!
//! Property tests over generated component sets: the pipeline output obeys
//! the manifest invariants, survives a cache round trip unchanged, and is
//! identical across runs.

use std::collections::BTreeMap;

use proptest::prelude::*;

use sitegraph_core::{
    AccessAttribute, ManifestDigest, NavigationAttribute, RequireMode, RouteAttribute,
    SeoAttribute, SitegraphConfig, ZoneConfig,
};
use sitegraph_manifest::CacheStore;
use sitegraph_pipeline::{ComponentDescriptor, Pipeline, StaticSource};

/// Public default zone, an auth-tagged zone, and (by name only) an
/// unconfigured zone that resolves to the fallback.
fn config() -> SitegraphConfig {
    let mut config = SitegraphConfig::default();
    config.zones.insert(
        "admin".to_string(),
        ZoneConfig {
            name: "admin".to_string(),
            uri_prefix: "/admin".to_string(),
            middleware: vec!["web".to_string(), "auth".to_string()],
            default_permission: Some("admin.access".to_string()),
            rate_limit: Some("60,1".to_string()),
            ..ZoneConfig::default()
        },
    );
    config
}

const ZONES: [&str; 3] = ["public", "admin", "partners"];

fn access_strategy() -> impl Strategy<Value = Option<AccessAttribute>> {
    prop_oneof![
        Just(None::<AccessAttribute>),
        Just(Some(AccessAttribute::public())),
        Just(Some(AccessAttribute::permissions(["admin.*"]))),
        Just(Some(AccessAttribute {
            permissions: vec!["posts.edit".to_string(), "posts.view".to_string()],
            roles: vec!["editor".to_string()],
            require: RequireMode::All,
            ..AccessAttribute::default()
        })),
    ]
}

fn descriptor_strategy(index: usize) -> impl Strategy<Value = ComponentDescriptor> {
    (
        0..ZONES.len(),
        prop::collection::vec("[a-z]{1,6}", 1..3),
        any::<bool>(),
        prop::option::of((0i32..20, prop::option::of("[A-Z][a-z]{1,5}(\\.[A-Z][a-z]{1,5})?"))),
        access_strategy(),
        prop::option::of(0.0f64..=1.0),
        prop::collection::vec("[a-z]{1,5}", 0..3),
    )
        .prop_map(
            move |(zone, segments, with_param, nav, access, priority, middleware)| {
                let mut uri = format!("/{}", segments.join("/"));
                if with_param {
                    uri.push_str("/{item}/{slug?}");
                }
                let mut route = RouteAttribute::new(uri, ZONES[zone]);
                route.middleware = middleware;
                let mut descriptor =
                    ComponentDescriptor::new(format!("app::screens::Generated{index}Page"))
                        .route(route)
                        .seo(SeoAttribute {
                            priority,
                            ..SeoAttribute::default()
                        });
                if let Some((sort, group)) = nav {
                    let mut attr = NavigationAttribute::new(format!("Page {index}"), sort);
                    attr.group = group;
                    descriptor = descriptor.navigation(attr);
                }
                descriptor.access = access;
                descriptor
            },
        )
}

fn components_strategy() -> impl Strategy<Value = Vec<ComponentDescriptor>> {
    (1usize..12).prop_flat_map(|n| (0..n).map(descriptor_strategy).collect::<Vec<_>>())
}

proptest! {
    #[test]
    fn pipeline_output_satisfies_invariants(components in components_strategy()) {
        let report = Pipeline::from_config(&config()).run(&StaticSource::new(components));
        prop_assert!(report.skipped.is_empty());
        prop_assert!(report.manifest.validate().is_empty());

        for record in report.manifest.records() {
            if record.seo.sitemap_eligible {
                prop_assert!(record.access.is_public());
            }
            let throttle = record.middleware.iter().position(|t| t.starts_with("throttle:"));
            if let Some(position) = throttle {
                prop_assert_eq!(position, record.middleware.len() - 1);
            }
        }
    }

    #[test]
    fn cache_round_trip_preserves_manifest(components in components_strategy()) {
        let dir = tempfile::tempdir().unwrap();
        let store = CacheStore::new(dir.path().join("manifest.json"));
        let manifest = Pipeline::from_config(&config())
            .run(&StaticSource::new(components))
            .manifest;

        store.store(&manifest).unwrap();
        let loaded = store.load().unwrap().unwrap();
        prop_assert_eq!(&loaded, &manifest);
        prop_assert_eq!(ManifestDigest::of(&loaded).unwrap(), ManifestDigest::of(&manifest).unwrap());
    }

    #[test]
    fn discovery_is_idempotent(components in components_strategy()) {
        let pipeline = Pipeline::from_config(&config());
        let source = StaticSource::new(components);
        let first = serde_json::to_vec(&pipeline.run(&source).manifest).unwrap();
        let second = serde_json::to_vec(&pipeline.run(&source).manifest).unwrap();
        prop_assert_eq!(first, second);
    }
}

#[test]
fn every_zone_kind_survives_the_cache() {
    let dir = tempfile::tempdir().unwrap();
    let store = CacheStore::new(dir.path().join("nested/manifest.json"));
    let components = vec![
        ComponentDescriptor::new("app::screens::HomePage")
            .route(RouteAttribute::new("/", "public")),
        ComponentDescriptor::new("app::screens::admin::ReportsPage")
            .route(RouteAttribute::new("/reports", "admin"))
            .access(AccessAttribute::permissions(["reports.*"]))
            .custom_meta("feature", serde_json::json!({"beta": true})),
        ComponentDescriptor::new("app::screens::partners::PortalPage")
            .route(RouteAttribute::new("/portal", "partners")),
    ];
    let manifest = Pipeline::from_config(&config())
        .run(&StaticSource::new(components))
        .manifest;
    assert_eq!(manifest.len(), 3);

    store.store(&manifest).unwrap();
    let loaded = store.load().unwrap().unwrap();
    assert_eq!(loaded, manifest);

    let zones: BTreeMap<&str, bool> = loaded
        .records()
        .map(|r| (r.route.zone.as_str(), r.access.authenticated))
        .collect();
    assert_eq!(
        zones,
        BTreeMap::from([("admin", true), ("partners", false), ("public", false)])
    );
    let reports = loaded.records().find(|r| r.route.zone == "admin").unwrap();
    assert!(reports.access.has_wildcard);
    assert!(reports.custom_meta.is_some());
}
