//! # sitegraph-views: Derived Views
//!
//! Everything rendered from the manifest at request time:
//!
//! - [`permission`]: the [`PermissionChecker`] contract, wildcard expansion
//!   and the access decision.
//! - [`url`]: URL generation from route names and parameters.
//! - [`tree`]: navigation trees grouped by dot path.
//! - [`breadcrumb`]: breadcrumb chains from parent links or URI structure.
//! - [`page_meta`]: request-scoped head metadata.
//!
//! None of these fail. Unresolvable URLs are `None`, unknown routes produce
//! empty or home-only output, and a failed capability check denies access.

pub mod breadcrumb;
pub mod page_meta;
pub mod permission;
pub mod tree;
pub mod url;

pub use breadcrumb::{Breadcrumb, BreadcrumbResolver, LabelResolver, Translator};
pub use page_meta::{PageMeta, PageMetaContext, PageMetaDefaults, PageMetaOverrides};
pub use permission::{can_access, expand_wildcards, Grants, PermissionChecker};
pub use tree::{NavGroup, NavItem, NavNode, NavigationTreeBuilder};
pub use url::{params, record_url, RouteParams, UrlGenerator};
