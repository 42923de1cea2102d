//! # Zone Registry
//!
//! A zone is a named partition of the application (`admin`, `public`, ...)
//! with its own URI prefix and default security and navigation policy.
//!
//! The [`ZoneRegistry`] is built once from [`SitegraphConfig`](crate::SitegraphConfig)
//! and passed explicitly to every processor. Looking up an unknown zone never
//! fails: [`ZoneRegistry::resolve`] falls back to a minimal zone with no
//! prefix, a single fallback middleware tag and no permission.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Navigation defaults inherited by every component of a zone.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavigationDefaults {
    /// Dot-separated group path for components that declare none.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
    /// Icon for components that declare none.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
}

/// Static configuration of one zone.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZoneConfig {
    /// Zone name (e.g. `admin`).
    pub name: String,
    /// URI prefix prepended to every route pattern of the zone.
    #[serde(default)]
    pub uri_prefix: String,
    /// Middleware tags applied to every route of the zone, in order.
    #[serde(default)]
    pub middleware: Vec<String>,
    /// Permission required when a component declares no access rule.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_permission: Option<String>,
    /// Role required when a component declares no access rule.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_role: Option<String>,
    /// Authentication guard for the zone.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub guard: Option<String>,
    /// Navigation defaults.
    #[serde(default)]
    pub navigation: NavigationDefaults,
    /// Rate limit, rendered as a `throttle:` tag (e.g. `60,1`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rate_limit: Option<String>,
}

impl ZoneConfig {
    /// Minimal zone used when a component names a zone that is not configured.
    pub fn fallback(name: &str, fallback_tag: &str) -> Self {
        Self {
            name: name.to_string(),
            uri_prefix: String::new(),
            middleware: vec![fallback_tag.to_string()],
            ..Self::default()
        }
    }

    /// Whether the zone's middleware includes the authentication tag, either
    /// exactly (`auth`) or parameterized (`auth:admin`).
    pub fn requires_authentication(&self, auth_tag: &str) -> bool {
        self.middleware.iter().any(|tag| is_auth_tag(tag, auth_tag))
    }
}

/// Whether `tag` is the authentication tag or a parameterized form of it.
pub fn is_auth_tag(tag: &str, auth_tag: &str) -> bool {
    tag == auth_tag
        || tag
            .strip_prefix(auth_tag)
            .is_some_and(|rest| rest.starts_with(':'))
}

/// All configured zones plus the designated default zone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ZoneRegistry {
    zones: BTreeMap<String, ZoneConfig>,
    default_zone: String,
    fallback_tag: String,
}

impl ZoneRegistry {
    /// Build a registry.
    pub fn new(
        zones: BTreeMap<String, ZoneConfig>,
        default_zone: impl Into<String>,
        fallback_tag: impl Into<String>,
    ) -> Self {
        Self {
            zones,
            default_zone: default_zone.into(),
            fallback_tag: fallback_tag.into(),
        }
    }

    /// Look up a configured zone.
    pub fn get(&self, name: &str) -> Option<&ZoneConfig> {
        self.zones.get(name)
    }

    /// Look up a zone, falling back to [`ZoneConfig::fallback`].
    pub fn resolve(&self, name: &str) -> ZoneConfig {
        match self.zones.get(name) {
            Some(zone) => zone.clone(),
            None => {
                tracing::debug!(zone = %name, "zone not configured; using fallback");
                ZoneConfig::fallback(name, &self.fallback_tag)
            }
        }
    }

    /// Name of the designated default zone.
    pub fn default_zone(&self) -> &str {
        &self.default_zone
    }

    /// Whether `name` is the designated default zone.
    pub fn is_default(&self, name: &str) -> bool {
        self.default_zone == name
    }

    /// Names of all configured zones, sorted.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.zones.keys().map(String::as_str)
    }

    /// Number of configured zones.
    pub fn len(&self) -> usize {
        self.zones.len()
    }

    /// Whether no zones are configured.
    pub fn is_empty(&self) -> bool {
        self.zones.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> ZoneRegistry {
        let mut zones = BTreeMap::new();
        zones.insert(
            "admin".to_string(),
            ZoneConfig {
                name: "admin".to_string(),
                uri_prefix: "/admin".to_string(),
                middleware: vec!["web".to_string(), "auth:admin".to_string()],
                default_permission: Some("admin.access".to_string()),
                ..ZoneConfig::default()
            },
        );
        ZoneRegistry::new(zones, "public", "web")
    }

    #[test]
    fn resolve_known_zone() {
        let zone = registry().resolve("admin");
        assert_eq!(zone.uri_prefix, "/admin");
        assert_eq!(zone.default_permission.as_deref(), Some("admin.access"));
    }

    #[test]
    fn resolve_unknown_zone_falls_back() {
        let zone = registry().resolve("partner");
        assert_eq!(zone.name, "partner");
        assert_eq!(zone.uri_prefix, "");
        assert_eq!(zone.middleware, vec!["web".to_string()]);
        assert!(zone.default_permission.is_none());
    }

    #[test]
    fn auth_tag_detection() {
        assert!(is_auth_tag("auth", "auth"));
        assert!(is_auth_tag("auth:admin", "auth"));
        assert!(!is_auth_tag("authorize", "auth"));
        assert!(!is_auth_tag("web", "auth"));
        assert!(registry().resolve("admin").requires_authentication("auth"));
    }

    #[test]
    fn default_zone_flag() {
        let reg = registry();
        assert!(reg.is_default("public"));
        assert!(!reg.is_default("admin"));
        assert_eq!(reg.len(), 1);
    }
}
