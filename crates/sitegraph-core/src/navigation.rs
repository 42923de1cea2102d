//! # Navigation Metadata
//!
//! Menu placement of a component: label, dot-separated group path, icon,
//! sort order, visibility, badge, and an optional explicit breadcrumb parent.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Sort order given to synthesized navigation entries so they sort last.
pub const AUTO_SORT_ORDER: i32 = 9999;

/// Raw navigation declaration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavigationAttribute {
    pub label: String,
    /// Dot-separated group path (`Settings.Security`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(default)]
    pub sort: i32,
    #[serde(default)]
    pub hidden: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub badge: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub badge_color: Option<String>,
    /// Route name of the breadcrumb parent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub meta: BTreeMap<String, String>,
}

impl NavigationAttribute {
    /// Visible entry with a label and sort order.
    pub fn new(label: impl Into<String>, sort: i32) -> Self {
        Self {
            label: label.into(),
            sort,
            ..Self::default()
        }
    }

    /// Place the entry under a group path.
    pub fn in_group(mut self, group: impl Into<String>) -> Self {
        self.group = Some(group.into());
        self
    }

    /// Declare an explicit breadcrumb parent.
    pub fn with_parent(mut self, parent: impl Into<String>) -> Self {
        self.parent = Some(parent.into());
        self
    }
}

/// Fully resolved navigation entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedNavigation {
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
    /// `group` split on `.`, empty when ungrouped.
    #[serde(default)]
    pub group_segments: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    pub sort: i32,
    pub hidden: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub badge: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub badge_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
    #[serde(default)]
    pub meta: BTreeMap<String, String>,
    /// Route name copied from the resolved route.
    pub route_name: String,
    /// Whether the route has any parameters.
    pub has_params: bool,
    /// True when no navigation attribute was declared.
    #[serde(default)]
    pub auto_generated: bool,
}

/// Split a dot-separated group path into trimmed, non-empty segments.
pub fn split_group(group: &str) -> Vec<String> {
    group
        .split('.')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
