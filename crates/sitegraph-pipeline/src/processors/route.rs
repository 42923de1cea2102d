//! # Route Processor
//!
//! Runs first. Resolves the zone, the full URI, the parameter names and the
//! final route name, and records the component identity.

use std::sync::Arc;

use sitegraph_core::text::{namespace_segments, slug, strip_suffix_word};
use sitegraph_core::uri::{self, is_parameter_segment};
use sitegraph_core::{
    ComponentIdentity, NamingConfig, NamingStrategy, ResolvedRoute, ZoneRegistry,
};

use super::ROUTE_PRIORITY;
use crate::error::{PipelineError, PipelineResult};
use crate::processor::{Processor, RecordDraft};
use crate::source::{DiscoveredEntity, EntityFacts};

/// Derives [`ResolvedRoute`] and [`ComponentIdentity`].
#[derive(Debug, Clone)]
pub struct RouteProcessor {
    zones: Arc<ZoneRegistry>,
    naming: NamingConfig,
}

impl RouteProcessor {
    pub fn new(zones: Arc<ZoneRegistry>, naming: NamingConfig) -> Self {
        Self { zones, naming }
    }

    /// Generate a route name for a component that declares none.
    ///
    /// Falls back to the entity id when the component's short name slugs to
    /// nothing.
    pub fn generate_name(&self, facts: &EntityFacts, zone: &str, pattern: &str) -> String {
        let parts = match self.naming.strategy {
            NamingStrategy::Namespace => self.namespace_parts(facts),
            NamingStrategy::Uri => Some(uri_parts(pattern)),
        };
        let Some(mut parts) = parts else {
            return facts.entity_id.clone();
        };
        if !self.zones.is_default(zone) {
            let zone_slug = slug(zone);
            if parts.first() != Some(&zone_slug) {
                parts.insert(0, zone_slug);
            }
        }
        parts.join(".")
    }

    fn namespace_parts(&self, facts: &EntityFacts) -> Option<Vec<String>> {
        let namespace = namespace_segments(&facts.namespace_path);
        let root = namespace_segments(&self.naming.namespace_root);
        let relative = if !root.is_empty() && namespace.starts_with(&root) {
            &namespace[root.len()..]
        } else {
            &namespace[..]
        };
        let leaf = slug(strip_suffix_word(&facts.short_name));
        if leaf.is_empty() {
            return None;
        }
        let mut parts: Vec<String> = relative
            .iter()
            .map(|s| slug(s))
            .filter(|s| !s.is_empty())
            .collect();
        parts.push(leaf);
        Some(parts)
    }
}

fn uri_parts(pattern: &str) -> Vec<String> {
    let segments: Vec<&str> = uri::segments(pattern).collect();
    let mut parts: Vec<String> = segments
        .iter()
        .filter(|s| !is_parameter_segment(s))
        .map(|s| slug(s))
        .filter(|s| !s.is_empty())
        .collect();
    if segments.last().is_some_and(|s| is_parameter_segment(s)) {
        parts.push("show".to_string());
    }
    if parts.is_empty() {
        parts.push("index".to_string());
    }
    parts
}

fn normalize_methods(methods: &[String]) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for method in methods {
        let method = method.trim().to_ascii_uppercase();
        if !method.is_empty() && !out.contains(&method) {
            out.push(method);
        }
    }
    if out.is_empty() {
        out.push("GET".to_string());
    }
    out
}

impl Processor for RouteProcessor {
    fn name(&self) -> &'static str {
        "route"
    }

    fn priority(&self) -> i32 {
        ROUTE_PRIORITY
    }

    fn should_process(&self, entity: &DiscoveredEntity) -> bool {
        entity.attributes.route.is_some()
    }

    fn required(&self) -> bool {
        true
    }

    fn process(&self, entity: &DiscoveredEntity, draft: &mut RecordDraft) -> PipelineResult<()> {
        let facts = &entity.facts;
        let attr = entity
            .attributes
            .route
            .as_ref()
            .ok_or_else(|| PipelineError::MissingFragment {
                entity: facts.entity_id.clone(),
                fragment: "route attribute",
            })?;

        let zone_name = if attr.zone.trim().is_empty() {
            self.zones.default_zone().to_string()
        } else {
            attr.zone.trim().to_string()
        };
        let zone = self.zones.resolve(&zone_name);
        if self.zones.get(&zone_name).is_none() {
            tracing::debug!(
                entity = %facts.entity_id,
                zone = %zone_name,
                "zone not configured, using fallback defaults"
            );
        }

        let pattern = uri::normalize(&attr.uri);
        let params = uri::parameters(&pattern).map_err(|source| PipelineError::InvalidRoute {
            entity: facts.entity_id.clone(),
            source,
        })?;
        let full_uri = uri::join(&zone.uri_prefix, &pattern);
        let generated_name = self.generate_name(facts, &zone_name, &pattern);
        let declared_name = attr
            .name
            .as_ref()
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty());
        let name = declared_name.clone().unwrap_or_else(|| generated_name.clone());

        draft.component = Some(ComponentIdentity {
            entity_id: facts.entity_id.clone(),
            short_name: facts.short_name.clone(),
            source_path: facts.source_path.clone(),
            namespace_path: facts.namespace_path.clone(),
            ordinal: draft.ordinal,
        });
        draft.route = Some(ResolvedRoute {
            name,
            generated_name,
            declared_name,
            uri_pattern: pattern,
            full_uri,
            zone: zone_name,
            zone_config: zone,
            extra_middleware: attr.middleware.clone(),
            constraints: attr.constraints.clone(),
            methods: normalize_methods(&attr.methods),
            domain: attr.domain.clone(),
            has_required_parameter: params.iter().any(|p| !p.optional),
            required_parameters: params
                .iter()
                .filter(|p| !p.optional)
                .map(|p| p.name.clone())
                .collect(),
            parameter_names: params.into_iter().map(|p| p.name).collect(),
        });
        draft.custom_meta = entity.custom_meta.clone();
        Ok(())
    }
}
