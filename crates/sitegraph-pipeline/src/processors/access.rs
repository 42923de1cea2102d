//! # Access Processor
//!
//! Resolves the access rule and builds the middleware stack.
//!
//! ## Middleware order
//!
//! ```text
//! zone tags -> route extra middleware -> access-derived tags -> throttle
//! ```
//!
//! Access-derived tags are, in order: the authentication tag (only when the
//! rule is authenticated and no authentication tag is present yet), then
//! permission tags, then role tags. With [`RequireMode::All`] every entry gets
//! its own tag (`can:users.view`, `role:admin`); with [`RequireMode::Any`] the
//! entries share one tag (`permission:a|b`, `role:a|b`). The stack keeps the
//! first occurrence of every tag.

use sitegraph_core::zone::is_auth_tag;
use sitegraph_core::{MiddlewareConfig, RequireMode, ResolvedAccess, ZoneConfig};

use super::ACCESS_PRIORITY;
use crate::error::PipelineResult;
use crate::processor::{Processor, RecordDraft};
use crate::source::DiscoveredEntity;

/// Derives [`ResolvedAccess`] and the record's middleware stack.
#[derive(Debug, Clone, Default)]
pub struct AccessProcessor {
    middleware: MiddlewareConfig,
}

impl AccessProcessor {
    pub fn new(middleware: MiddlewareConfig) -> Self {
        Self { middleware }
    }
}

/// Access rule for a component that declares none: the zone's defaults.
pub fn zone_default_access(zone: &ZoneConfig, middleware: &MiddlewareConfig) -> ResolvedAccess {
    let mut access = ResolvedAccess::new(
        zone.default_permission.clone(),
        zone.default_role.clone(),
        RequireMode::Any,
        zone.requires_authentication(&middleware.auth_tag),
    );
    access.guard = zone.guard.clone();
    access
}

/// Ordered, duplicate-free middleware stack for a route.
pub fn build_middleware_stack(
    zone: &ZoneConfig,
    extra: &[String],
    access: &ResolvedAccess,
    config: &MiddlewareConfig,
) -> Vec<String> {
    fn push(stack: &mut Vec<String>, tag: String) {
        let tag = tag.trim().to_string();
        if !tag.is_empty() && !stack.contains(&tag) {
            stack.push(tag);
        }
    }

    let mut stack: Vec<String> = Vec::new();

    for tag in zone.middleware.iter().chain(extra) {
        push(&mut stack, tag.clone());
    }

    if access.authenticated && !stack.iter().any(|t| is_auth_tag(t, &config.auth_tag)) {
        let tag = match &access.guard {
            Some(guard) => format!("{}:{guard}", config.auth_tag),
            None => config.auth_tag.clone(),
        };
        push(&mut stack, tag);
    }

    match access.require {
        RequireMode::All => {
            for permission in &access.permissions {
                push(&mut stack, format!("can:{permission}"));
            }
            for role in &access.roles {
                push(&mut stack, format!("role:{role}"));
            }
        }
        RequireMode::Any => {
            if !access.permissions.is_empty() {
                let joined = access.permissions.iter().cloned().collect::<Vec<_>>().join("|");
                push(&mut stack, format!("permission:{joined}"));
            }
            if !access.roles.is_empty() {
                let joined = access.roles.iter().cloned().collect::<Vec<_>>().join("|");
                push(&mut stack, format!("role:{joined}"));
            }
        }
    }

    if let Some(rate) = &zone.rate_limit {
        push(&mut stack, format!("throttle:{rate}"));
    }
    stack
}

impl Processor for AccessProcessor {
    fn name(&self) -> &'static str {
        "access"
    }

    fn priority(&self) -> i32 {
        ACCESS_PRIORITY
    }

    fn process(&self, entity: &DiscoveredEntity, draft: &mut RecordDraft) -> PipelineResult<()> {
        let route = draft.route()?;
        let zone = &route.zone_config;

        let access = match &entity.attributes.access {
            Some(attr) => {
                let mut access = ResolvedAccess::new(
                    attr.permissions.iter().cloned(),
                    attr.roles.iter().cloned(),
                    attr.require,
                    attr.authenticated,
                );
                access.guard = attr.guard.clone().or_else(|| zone.guard.clone());
                access.redirect = attr.redirect.clone();
                if let Some(status) = attr.denied_status {
                    access.denied_status = status;
                }
                access
            }
            None => zone_default_access(zone, &self.middleware),
        };

        let middleware =
            build_middleware_stack(zone, &route.extra_middleware, &access, &self.middleware);
        tracing::trace!(route = %route.name, ?middleware, "resolved middleware");
        draft.access = Some(access);
        draft.middleware = middleware;
        Ok(())
    }
}
