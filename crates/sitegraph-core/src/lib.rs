//! # sitegraph-core: Foundational Types
//!
//! This crate is the leaf of the sitegraph workspace. It defines the types
//! every other crate exchanges: the zone registry, the typed configuration,
//! the four metadata kinds (route, navigation, access, SEO) in their raw and
//! resolved forms, and the [`Manifest`] of fully-resolved [`ComponentRecord`]s.
//!
//! ## Key Design Principles
//!
//! 1. **Raw vs. resolved.** Each metadata kind has a raw attribute type (what a
//!    component declares, everything optional) and a resolved type (what the
//!    pipeline produces, nothing missing). A [`ComponentRecord`] can only be
//!    built from resolved parts.
//!
//! 2. **Explicit zone registry.** Zone defaults are looked up through a
//!    [`ZoneRegistry`] value handed to whoever needs it. There is no global
//!    configuration lookup.
//!
//! 3. **Deterministic manifests.** The manifest is a `BTreeMap` and every
//!    nested map is ordered, so serializing the same manifest twice yields the
//!    same bytes and the same [`ManifestDigest`].
//!
//! ## Crate Policy
//!
//! - No dependencies on other `sitegraph-*` crates.
//! - No `unsafe` code.
//! - No `.unwrap()` outside tests.

pub mod access;
pub mod config;
pub mod digest;
pub mod error;
pub mod navigation;
pub mod record;
pub mod route;
pub mod seo;
pub mod text;
pub mod uri;
pub mod zone;

// Re-export primary types for ergonomic imports.
pub use access::{AccessAttribute, RequireMode, ResolvedAccess};
pub use config::{
    BreadcrumbConfig, CacheConfig, MiddlewareConfig, NamingConfig, NamingStrategy,
    NavigationConfig, SeoConfig, SitegraphConfig, SitemapConfig,
};
pub use digest::ManifestDigest;
pub use error::{ConfigError, CoreError, CoreResult};
pub use navigation::{NavigationAttribute, ResolvedNavigation, AUTO_SORT_ORDER};
pub use record::{ComponentIdentity, ComponentRecord, Manifest, ManifestViolation};
pub use route::{ResolvedRoute, RouteAttribute};
pub use seo::{OpenGraph, ResolvedSeo, SeoAttribute, SitemapFrequency, TwitterCard};
pub use zone::{NavigationDefaults, ZoneConfig, ZoneRegistry};
