//! # Route Metadata
//!
//! [`RouteAttribute`] is what a component declares; [`ResolvedRoute`] is what
//! the route processor derives from it: the full URI under the zone prefix,
//! the parameter names, and the final route name.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::zone::ZoneConfig;

/// Raw route declaration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteAttribute {
    /// URI pattern relative to the zone prefix (e.g. `/users/{user}`).
    pub uri: String,
    /// Explicit route name, used verbatim when present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Zone the component belongs to. Empty means the default zone.
    #[serde(default)]
    pub zone: String,
    /// Middleware tags specific to this route.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub middleware: Vec<String>,
    /// Regex constraints per parameter name.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub constraints: BTreeMap<String, String>,
    /// HTTP methods. Empty means `GET`.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub methods: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
}

impl RouteAttribute {
    /// Convenience constructor for a route in a zone.
    pub fn new(uri: impl Into<String>, zone: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            zone: zone.into(),
            ..Self::default()
        }
    }

    /// Set an explicit route name.
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

/// Fully resolved route.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedRoute {
    /// Final route name (the manifest key).
    pub name: String,
    /// Name the generator would have produced, kept for diagnostics.
    pub generated_name: String,
    /// Declared name, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub declared_name: Option<String>,
    /// Normalized pattern relative to the zone prefix.
    pub uri_pattern: String,
    /// Zone prefix + pattern, normalized.
    pub full_uri: String,
    pub zone: String,
    /// Snapshot of the zone configuration used during resolution.
    pub zone_config: ZoneConfig,
    #[serde(default)]
    pub extra_middleware: Vec<String>,
    #[serde(default)]
    pub constraints: BTreeMap<String, String>,
    pub methods: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
    /// Parameter names in order of appearance.
    pub parameter_names: Vec<String>,
    /// Whether any parameter is not optional.
    pub has_required_parameter: bool,
    /// Names of required parameters, in order.
    #[serde(default)]
    pub required_parameters: Vec<String>,
}

impl ResolvedRoute {
    /// Whether a URL can be built for this route from the given values.
    pub fn can_build_with(&self, values: &BTreeMap<String, String>) -> bool {
        self.required_parameters
            .iter()
            .all(|name| values.contains_key(name))
    }
}
