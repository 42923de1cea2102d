//! # Access Metadata
//!
//! Access rules are sets of permissions and roles combined with a
//! [`RequireMode`]. Permissions may carry a trailing wildcard (`admin.*`),
//! which is expanded against the actor's grants at check time.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::text::is_wildcard;

/// Default HTTP status returned when access is denied.
pub const DEFAULT_DENIED_STATUS: u16 = 403;

/// Whether every listed permission/role is required, or any one of them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequireMode {
    All,
    #[default]
    Any,
}

/// Raw access declaration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessAttribute {
    #[serde(default)]
    pub permissions: Vec<String>,
    #[serde(default)]
    pub roles: Vec<String>,
    #[serde(default)]
    pub require: RequireMode,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub guard: Option<String>,
    #[serde(default)]
    pub authenticated: bool,
    /// Route to redirect to when access is denied.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub redirect: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub denied_status: Option<u16>,
}

impl AccessAttribute {
    /// Explicitly public page: no permission, no role, no authentication.
    pub fn public() -> Self {
        Self::default()
    }

    /// Require any of the given permissions.
    pub fn permissions<I, S>(permissions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            permissions: permissions.into_iter().map(Into::into).collect(),
            authenticated: true,
            ..Self::default()
        }
    }
}

/// Fully resolved access rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedAccess {
    pub permissions: BTreeSet<String>,
    pub roles: BTreeSet<String>,
    pub require: RequireMode,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub guard: Option<String>,
    pub authenticated: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub redirect: Option<String>,
    pub denied_status: u16,
    /// Whether any permission is a wildcard pattern.
    pub has_wildcard: bool,
}

impl ResolvedAccess {
    /// Build a resolved rule, normalizing lists into sets.
    pub fn new(
        permissions: impl IntoIterator<Item = String>,
        roles: impl IntoIterator<Item = String>,
        require: RequireMode,
        authenticated: bool,
    ) -> Self {
        let permissions: BTreeSet<String> = permissions
            .into_iter()
            .map(|p| p.trim().to_string())
            .filter(|p| !p.is_empty())
            .collect();
        let roles: BTreeSet<String> = roles
            .into_iter()
            .map(|r| r.trim().to_string())
            .filter(|r| !r.is_empty())
            .collect();
        let has_wildcard = permissions.iter().any(|p| is_wildcard(p));
        Self {
            permissions,
            roles,
            require,
            guard: None,
            authenticated,
            redirect: None,
            denied_status: DEFAULT_DENIED_STATUS,
            has_wildcard,
        }
    }

    /// No permission, no role, no authentication.
    pub fn is_public(&self) -> bool {
        self.permissions.is_empty() && self.roles.is_empty() && !self.authenticated
    }
}
