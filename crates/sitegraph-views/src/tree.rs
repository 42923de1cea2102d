//! # Navigation Tree
//!
//! Groups the visible navigation entries of a zone by their dot-separated
//! group path.
//!
//! ## Rules
//!
//! - Entries without a group are top-level items.
//! - Groups are created on demand; a group's sort order is the minimum sort
//!   order of everything beneath it.
//! - Group paths deeper than `max_depth` are cut at that depth, so deeper
//!   entries land in the deepest allowed group. A `max_depth` of zero puts
//!   every entry at the top level.
//! - Siblings are ordered by sort order, then discovery order.
//! - An item is active when its route is the current route or a
//!   dot-separated ancestor of it (`admin.users` for `admin.users.show`). A
//!   group is active when any descendant is.

use std::collections::BTreeMap;

use serde::Serialize;

use sitegraph_core::{ComponentRecord, NavigationConfig, ZoneRegistry};
use sitegraph_manifest::ManifestSnapshot;

use crate::permission::{can_access, PermissionChecker};
use crate::url::{record_url, RouteParams};

/// A group or a leaf item.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum NavNode {
    Group(NavGroup),
    Item(NavItem),
}

impl NavNode {
    pub fn label(&self) -> &str {
        match self {
            NavNode::Group(g) => &g.label,
            NavNode::Item(i) => &i.label,
        }
    }

    pub fn sort(&self) -> i32 {
        match self {
            NavNode::Group(g) => g.sort,
            NavNode::Item(i) => i.sort,
        }
    }

    pub fn is_active(&self) -> bool {
        match self {
            NavNode::Group(g) => g.active,
            NavNode::Item(i) => i.active,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NavGroup {
    pub label: String,
    /// Dot-joined path from the top level (`Settings.Security`).
    pub path: String,
    pub sort: i32,
    pub active: bool,
    pub children: Vec<NavNode>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NavItem {
    pub label: String,
    pub route_name: String,
    /// `None` when a required parameter has no value.
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    pub sort: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub badge: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub badge_color: Option<String>,
    pub active: bool,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub meta: BTreeMap<String, String>,
}

// ---------------------------------------------------------------------------
// Builder
// ---------------------------------------------------------------------------

struct PendingGroup {
    label: String,
    path: String,
    sort: i32,
    ordinal: usize,
    groups: Vec<PendingGroup>,
    items: Vec<(NavItem, usize)>,
}

impl PendingGroup {
    fn new(label: String, path: String) -> Self {
        Self {
            label,
            path,
            sort: i32::MAX,
            ordinal: usize::MAX,
            groups: Vec::new(),
            items: Vec::new(),
        }
    }

    fn insert(&mut self, segments: &[String], item: NavItem, ordinal: usize) {
        self.sort = self.sort.min(item.sort);
        self.ordinal = self.ordinal.min(ordinal);
        let Some((head, rest)) = segments.split_first() else {
            self.items.push((item, ordinal));
            return;
        };
        let index = match self.groups.iter().position(|g| &g.label == head) {
            Some(index) => index,
            None => {
                let path = if self.path.is_empty() {
                    head.clone()
                } else {
                    format!("{}.{head}", self.path)
                };
                self.groups.push(PendingGroup::new(head.clone(), path));
                self.groups.len() - 1
            }
        };
        self.groups[index].insert(rest, item, ordinal);
    }

    fn into_children(self) -> Vec<NavNode> {
        let mut keyed: Vec<((i32, usize), NavNode)> = self
            .items
            .into_iter()
            .map(|(item, ordinal)| ((item.sort, ordinal), NavNode::Item(item)))
            .collect();
        for group in self.groups {
            let key = (group.sort, group.ordinal);
            let label = group.label.clone();
            let path = group.path.clone();
            let sort = group.sort;
            let children = group.into_children();
            let active = children.iter().any(NavNode::is_active);
            keyed.push((
                key,
                NavNode::Group(NavGroup {
                    label,
                    path,
                    sort,
                    active,
                    children,
                }),
            ));
        }
        keyed.sort_by_key(|(key, _)| *key);
        keyed.into_iter().map(|(_, node)| node).collect()
    }
}

/// Whether `route_name` is `current` or a dot-separated ancestor of it.
pub fn is_active_route(route_name: &str, current: Option<&str>) -> bool {
    match current {
        Some(current) => {
            current == route_name
                || current
                    .strip_prefix(route_name)
                    .is_some_and(|rest| rest.starts_with('.'))
        }
        None => false,
    }
}

/// Builds navigation trees from a manifest snapshot.
pub struct NavigationTreeBuilder<'a> {
    snapshot: &'a ManifestSnapshot,
    max_depth: usize,
    checker: Option<&'a dyn PermissionChecker>,
    current_route: Option<String>,
    params: RouteParams,
}

impl<'a> NavigationTreeBuilder<'a> {
    pub fn new(snapshot: &'a ManifestSnapshot, config: &NavigationConfig) -> Self {
        Self {
            snapshot,
            max_depth: config.max_depth,
            checker: None,
            current_route: None,
            params: RouteParams::new(),
        }
    }

    /// The actor whose capabilities filter the tree.
    pub fn with_checker(mut self, checker: &'a dyn PermissionChecker) -> Self {
        self.checker = Some(checker);
        self
    }

    /// Route of the page being rendered, for `active` flags.
    pub fn with_current_route(mut self, route_name: impl Into<String>) -> Self {
        self.current_route = Some(route_name.into());
        self
    }

    /// Parameter values used to build item URLs.
    pub fn with_params(mut self, params: RouteParams) -> Self {
        self.params = params;
        self
    }

    fn item(&self, record: &ComponentRecord) -> NavItem {
        let nav = &record.navigation;
        NavItem {
            label: nav.label.clone(),
            route_name: record.name().to_string(),
            url: record_url(record, &self.params),
            icon: nav.icon.clone(),
            sort: nav.sort,
            badge: nav.badge.clone(),
            badge_color: nav.badge_color.clone(),
            active: is_active_route(record.name(), self.current_route.as_deref()),
            meta: nav.meta.clone(),
        }
    }

    /// Tree for one zone. With `filter_by_capability`, entries the actor
    /// cannot access are left out.
    pub fn for_zone(&self, zone: &str, filter_by_capability: bool) -> Vec<NavNode> {
        let mut root = PendingGroup::new(String::new(), String::new());
        for record in self.snapshot.navigation_for_zone(zone) {
            if filter_by_capability && !can_access(&record.access, self.checker) {
                tracing::trace!(route = %record.name(), "navigation entry filtered out");
                continue;
            }
            let segments = &record.navigation.group_segments;
            let depth = segments.len().min(self.max_depth);
            root.insert(&segments[..depth], self.item(record), record.component.ordinal);
        }
        root.into_children()
    }

    /// One tree per configured zone.
    pub fn for_all_zones(
        &self,
        zones: &ZoneRegistry,
        filter_by_capability: bool,
    ) -> BTreeMap<String, Vec<NavNode>> {
        zones
            .names()
            .map(|zone| (zone.to_string(), self.for_zone(zone, filter_by_capability)))
            .collect()
    }
}
