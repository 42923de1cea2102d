//! The four built-in processors, in run order.

pub mod access;
pub mod navigation;
pub mod route;
pub mod seo;

pub use access::{build_middleware_stack, AccessProcessor};
pub use navigation::NavigationProcessor;
pub use route::RouteProcessor;
pub use seo::SeoProcessor;

/// Priority of [`RouteProcessor`].
pub const ROUTE_PRIORITY: i32 = 10;
/// Priority of [`NavigationProcessor`].
pub const NAVIGATION_PRIORITY: i32 = 20;
/// Priority of [`AccessProcessor`].
pub const ACCESS_PRIORITY: i32 = 30;
/// Priority of [`SeoProcessor`].
pub const SEO_PRIORITY: i32 = 40;
