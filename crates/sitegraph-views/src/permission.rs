//! # Access Decisions
//!
//! The permission evaluator belongs to the host application and is consumed
//! through [`PermissionChecker`]. Wildcard permissions (`admin.*`) are
//! expanded against the actor's granted permissions before the checker is
//! asked.
//!
//! No checker means no actor: only public rules pass.

use std::collections::BTreeSet;

use sitegraph_core::text::{is_wildcard, wildcard_matches};
use sitegraph_core::{RequireMode, ResolvedAccess};

/// Capabilities of the current actor.
pub trait PermissionChecker: Send + Sync {
    fn has_any_permission(&self, permissions: &[String]) -> bool;
    fn has_all_permissions(&self, permissions: &[String]) -> bool;
    fn has_any_role(&self, roles: &[String]) -> bool;
    fn has_all_roles(&self, roles: &[String]) -> bool;
    /// Every permission granted to the actor, used to expand wildcards.
    fn granted_permissions(&self) -> Vec<String>;
    /// Whether the actor is signed in.
    fn is_authenticated(&self) -> bool {
        true
    }
}

/// Expand wildcard patterns against the granted permissions. Patterns
/// without a wildcard are kept as they are.
pub fn expand_wildcards<'a>(
    patterns: impl IntoIterator<Item = &'a String>,
    granted: &[String],
) -> BTreeSet<String> {
    let mut expanded = BTreeSet::new();
    for pattern in patterns {
        if is_wildcard(pattern) {
            expanded.extend(
                granted
                    .iter()
                    .filter(|g| wildcard_matches(pattern, g))
                    .cloned(),
            );
        } else {
            expanded.insert(pattern.clone());
        }
    }
    expanded
}

fn permissions_pass(access: &ResolvedAccess, checker: &dyn PermissionChecker) -> bool {
    if access.permissions.is_empty() {
        return true;
    }
    let granted = if access.has_wildcard {
        checker.granted_permissions()
    } else {
        Vec::new()
    };
    let expanded: Vec<String> = expand_wildcards(&access.permissions, &granted)
        .into_iter()
        .collect();
    match access.require {
        RequireMode::Any => !expanded.is_empty() && checker.has_any_permission(&expanded),
        RequireMode::All => {
            let every_pattern_matched = access
                .permissions
                .iter()
                .filter(|p| is_wildcard(p))
                .all(|p| granted.iter().any(|g| wildcard_matches(p, g)));
            every_pattern_matched && checker.has_all_permissions(&expanded)
        }
    }
}

fn roles_pass(access: &ResolvedAccess, checker: &dyn PermissionChecker) -> bool {
    if access.roles.is_empty() {
        return true;
    }
    let roles: Vec<String> = access.roles.iter().cloned().collect();
    match access.require {
        RequireMode::Any => checker.has_any_role(&roles),
        RequireMode::All => checker.has_all_roles(&roles),
    }
}

/// Whether the actor described by `checker` may open a page with this rule.
pub fn can_access(access: &ResolvedAccess, checker: Option<&dyn PermissionChecker>) -> bool {
    if access.is_public() {
        return true;
    }
    let Some(checker) = checker else {
        return false;
    };
    if access.authenticated && !checker.is_authenticated() {
        return false;
    }
    permissions_pass(access, checker) && roles_pass(access, checker)
}

/// Fixed set of grants; the simplest [`PermissionChecker`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Grants {
    pub permissions: BTreeSet<String>,
    pub roles: BTreeSet<String>,
    pub authenticated: bool,
}

impl Grants {
    /// Signed-in actor with the given permissions and no roles.
    pub fn with_permissions<I, S>(permissions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            permissions: permissions.into_iter().map(Into::into).collect(),
            roles: BTreeSet::new(),
            authenticated: true,
        }
    }

    pub fn and_roles<I, S>(mut self, roles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.roles.extend(roles.into_iter().map(Into::into));
        self
    }
}

impl PermissionChecker for Grants {
    fn has_any_permission(&self, permissions: &[String]) -> bool {
        permissions.iter().any(|p| self.permissions.contains(p))
    }

    fn has_all_permissions(&self, permissions: &[String]) -> bool {
        permissions.iter().all(|p| self.permissions.contains(p))
    }

    fn has_any_role(&self, roles: &[String]) -> bool {
        roles.iter().any(|r| self.roles.contains(r))
    }

    fn has_all_roles(&self, roles: &[String]) -> bool {
        roles.iter().all(|r| self.roles.contains(r))
    }

    fn granted_permissions(&self) -> Vec<String> {
        self.permissions.iter().cloned().collect()
    }

    fn is_authenticated(&self) -> bool {
        self.authenticated
    }
}
