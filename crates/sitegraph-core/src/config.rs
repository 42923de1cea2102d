//! # Configuration
//!
//! Typed configuration loaded once at process start from a YAML file:
//!
//! ```yaml
//! default_zone: public
//! zones:
//!   public: { name: public, uri_prefix: "", middleware: [web] }
//!   admin:
//!     name: admin
//!     uri_prefix: /admin
//!     middleware: [web, "auth:admin"]
//!     default_permission: admin.access
//!     navigation: { group: Administration, icon: shield }
//!     rate_limit: "60,1"
//! naming: { strategy: namespace, namespace_root: "app::screens" }
//! cache: { enabled: true, path: var/sitegraph.json }
//! catalog: components.yaml
//! seo: { title_suffix: " | Acme" }
//! sitemap: { base_url: "https://acme.test", excluded_zones: [admin] }
//! ```
//!
//! Every section has defaults, so an empty document is a valid (if not very
//! useful) configuration.

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::seo::{SitemapFrequency, TwitterCard};
use crate::uri;
use crate::zone::{ZoneConfig, ZoneRegistry};

/// Deepest navigation nesting accepted by [`SitegraphConfig::validate`].
pub const MAX_NAVIGATION_DEPTH: usize = 8;

/// How route names are generated for components that do not declare one.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NamingStrategy {
    /// From the namespace path relative to `namespace_root` plus the short name.
    #[default]
    Namespace,
    /// From the URI pattern's path segments.
    Uri,
}

/// Route name generation settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NamingConfig {
    pub strategy: NamingStrategy,
    /// Namespace prefix removed before generating names (e.g. `app::screens`).
    pub namespace_root: String,
}

/// Middleware tag names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MiddlewareConfig {
    /// Authentication tag (`auth`, or `auth:<guard>` when parameterized).
    pub auth_tag: String,
    /// Single tag given to routes of an unconfigured zone.
    pub fallback_tag: String,
}

impl Default for MiddlewareConfig {
    fn default() -> Self {
        Self {
            auth_tag: "auth".to_string(),
            fallback_tag: "web".to_string(),
        }
    }
}

/// Manifest cache settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    pub enabled: bool,
    pub path: Option<PathBuf>,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            path: None,
        }
    }
}

/// Global SEO fallbacks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SeoConfig {
    /// Appended to every resolved title (e.g. ` | Acme`).
    pub title_suffix: Option<String>,
    /// Social image used when a component declares none.
    pub default_image: Option<String>,
    pub default_priority: f64,
    pub default_frequency: SitemapFrequency,
    /// Twitter card type when a component declares none. `None` picks
    /// `summary_large_image` if an image is known and `summary` otherwise.
    pub twitter_card: Option<TwitterCard>,
}

impl Default for SeoConfig {
    fn default() -> Self {
        Self {
            title_suffix: None,
            default_image: None,
            default_priority: 0.5,
            default_frequency: SitemapFrequency::Weekly,
            twitter_card: None,
        }
    }
}

/// Navigation tree settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NavigationConfig {
    /// Maximum group nesting; deeper groups are merged into their parent.
    pub max_depth: usize,
}

impl Default for NavigationConfig {
    fn default() -> Self {
        Self { max_depth: 3 }
    }
}

/// Breadcrumb settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BreadcrumbConfig {
    pub home_label: String,
    /// Route name of the home page, if it is itself a component.
    pub home_route: Option<String>,
    pub home_url: String,
}

impl Default for BreadcrumbConfig {
    fn default() -> Self {
        Self {
            home_label: "Home".to_string(),
            home_route: None,
            home_url: "/".to_string(),
        }
    }
}

/// Sitemap export settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SitemapConfig {
    /// Absolute base URL (scheme and host) prepended to every route.
    pub base_url: String,
    /// Zones never published, even when their routes are public.
    pub excluded_zones: BTreeSet<String>,
}

/// Root configuration document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SitegraphConfig {
    pub default_zone: String,
    pub zones: BTreeMap<String, ZoneConfig>,
    pub naming: NamingConfig,
    pub middleware: MiddlewareConfig,
    pub cache: CacheConfig,
    /// Path to the component catalog consumed by the CLI.
    pub catalog: Option<PathBuf>,
    pub seo: SeoConfig,
    pub navigation: NavigationConfig,
    pub breadcrumbs: BreadcrumbConfig,
    pub sitemap: SitemapConfig,
}

impl Default for SitegraphConfig {
    fn default() -> Self {
        let mut zones = BTreeMap::new();
        zones.insert(
            "public".to_string(),
            ZoneConfig {
                name: "public".to_string(),
                middleware: vec!["web".to_string()],
                ..ZoneConfig::default()
            },
        );
        Self {
            default_zone: "public".to_string(),
            zones,
            naming: NamingConfig::default(),
            middleware: MiddlewareConfig::default(),
            cache: CacheConfig::default(),
            catalog: None,
            seo: SeoConfig::default(),
            navigation: NavigationConfig::default(),
            breadcrumbs: BreadcrumbConfig::default(),
            sitemap: SitemapConfig::default(),
        }
    }
}

impl SitegraphConfig {
    /// Parse and validate a YAML document.
    pub fn from_yaml_str(yaml: &str, origin: &Path) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(yaml).map_err(|source| ConfigError::YamlParse {
            path: origin.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a YAML configuration file.
    ///
    /// Relative `cache.path` and `catalog` entries are resolved against the
    /// directory containing the file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::FileNotFound {
                path: path.to_path_buf(),
            });
        }
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config = Self::from_yaml_str(&content, path)?;
        let base = path.parent().unwrap_or(Path::new("."));
        config.cache.path = config.cache.path.map(|p| resolve_relative(base, p));
        config.catalog = config.catalog.map(|p| resolve_relative(base, p));
        tracing::debug!(
            path = %path.display(),
            zones = config.zones.len(),
            default_zone = %config.default_zone,
            "loaded configuration"
        );
        Ok(config)
    }

    /// Check cross-field consistency.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (key, zone) in &self.zones {
            if key != &zone.name {
                return Err(ConfigError::ZoneNameMismatch {
                    key: key.clone(),
                    name: zone.name.clone(),
                });
            }
            if zone.uri_prefix.contains('{') || zone.uri_prefix.contains(char::is_whitespace) {
                return Err(ConfigError::InvalidPrefix {
                    zone: key.clone(),
                    prefix: zone.uri_prefix.clone(),
                });
            }
        }
        if !self.zones.contains_key(&self.default_zone) {
            return Err(ConfigError::UnknownDefaultZone {
                zone: self.default_zone.clone(),
            });
        }
        if self.navigation.max_depth > MAX_NAVIGATION_DEPTH {
            return Err(ConfigError::OutOfRange {
                key: "navigation.max_depth",
                value: self.navigation.max_depth.to_string(),
                expected: "0..=8",
            });
        }
        if !(0.0..=1.0).contains(&self.seo.default_priority) {
            return Err(ConfigError::OutOfRange {
                key: "seo.default_priority",
                value: self.seo.default_priority.to_string(),
                expected: "0.0..=1.0",
            });
        }
        Ok(())
    }

    /// Build the zone registry handed to the processors.
    pub fn zone_registry(&self) -> ZoneRegistry {
        let zones = self
            .zones
            .iter()
            .map(|(name, zone)| {
                let mut zone = zone.clone();
                zone.uri_prefix = normalize_prefix(&zone.uri_prefix);
                (name.clone(), zone)
            })
            .collect();
        ZoneRegistry::new(zones, &self.default_zone, &self.middleware.fallback_tag)
    }

    /// Cache path, required by operations that touch the cache artifact.
    pub fn cache_path(&self) -> Result<&Path, ConfigError> {
        self.cache
            .path
            .as_deref()
            .ok_or(ConfigError::Missing { key: "cache.path" })
    }

    /// Catalog path, for operations that cannot fall back to registered components.
    pub fn catalog_path(&self) -> Result<&Path, ConfigError> {
        self.catalog
            .as_deref()
            .ok_or(ConfigError::Missing { key: "catalog" })
    }
}

fn normalize_prefix(prefix: &str) -> String {
    let normalized = uri::normalize(prefix);
    if normalized == "/" {
        String::new()
    } else {
        normalized
    }
}

fn resolve_relative(base: &Path, path: PathBuf) -> PathBuf {
    if path.is_absolute() {
        path
    } else {
        base.join(path)
    }
}
