//! URL generation. Failure is `None`, never an error: a missing route or a
//! missing required parameter simply yields no URL.

use std::collections::BTreeMap;

use sitegraph_core::{uri, ComponentRecord, Manifest};
use sitegraph_manifest::ManifestSnapshot;

/// Parameter values keyed by parameter name.
pub type RouteParams = BTreeMap<String, String>;

/// Resolves a route name and parameters to a URL path.
pub trait UrlGenerator {
    fn url_for(&self, route_name: &str, params: &RouteParams) -> Option<String>;
}

/// URL of a record, if every required parameter has a value.
pub fn record_url(record: &ComponentRecord, params: &RouteParams) -> Option<String> {
    uri::substitute(&record.route.full_uri, params)
}

impl UrlGenerator for Manifest {
    fn url_for(&self, route_name: &str, params: &RouteParams) -> Option<String> {
        self.get(route_name).and_then(|r| record_url(r, params))
    }
}

impl UrlGenerator for ManifestSnapshot {
    fn url_for(&self, route_name: &str, params: &RouteParams) -> Option<String> {
        self.manifest().url_for(route_name, params)
    }
}

/// Build a [`RouteParams`] map from pairs.
pub fn params<I, K, V>(pairs: I) -> RouteParams
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<String>,
{
    pairs
        .into_iter()
        .map(|(k, v)| (k.into(), v.into()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use sitegraph_core::{RouteAttribute, SitegraphConfig};
    use sitegraph_pipeline::{ComponentDescriptor, Pipeline, StaticSource};

    fn manifest() -> Manifest {
        let source = StaticSource::new(vec![ComponentDescriptor::new("PostPage")
            .route(RouteAttribute::new("/posts/{post}/{slug?}", "public").named("posts.show"))]);
        Pipeline::from_config(&SitegraphConfig::default())
            .run(&source)
            .manifest
    }

    #[test]
    fn url_generation() {
        let m = manifest();
        assert_eq!(
            m.url_for("posts.show", &params([("post", "7"), ("slug", "hello")])),
            Some("/posts/7/hello".to_string())
        );
        assert_eq!(
            m.url_for("posts.show", &params([("post", "7")])),
            Some("/posts/7".to_string())
        );
        assert_eq!(m.url_for("posts.show", &RouteParams::new()), None);
        assert_eq!(m.url_for("missing", &RouteParams::new()), None);
    }

    #[test]
    fn url_generation_rejects_empty_and_encodes_slashes() {
        let m = manifest();
        assert_eq!(m.url_for("posts.show", &params([("post", "")])), None);
        assert_eq!(
            m.url_for("posts.show", &params([("post", "a/b")])),
            Some("/posts/a%2Fb".to_string())
        );
    }
}
