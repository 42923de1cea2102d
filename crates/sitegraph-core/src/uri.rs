//! # URI Patterns
//!
//! Normalization and parameter extraction for route URI patterns such as
//! `/products/{id}/{slug?}`.
//!
//! A normalized URI starts with exactly one `/`, contains no empty segments,
//! and has no trailing slash unless it is the root `/`.

use crate::error::{CoreError, CoreResult};

/// A single `{name}` or `{name?}` token in a URI pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UriParameter {
    /// Parameter name without braces or `?`.
    pub name: String,
    /// Whether the token was written `{name?}`.
    pub optional: bool,
}

/// Normalize a URI or URI pattern.
pub fn normalize(uri: &str) -> String {
    let segments: Vec<&str> = uri.split('/').filter(|s| !s.is_empty()).collect();
    if segments.is_empty() {
        "/".to_string()
    } else {
        format!("/{}", segments.join("/"))
    }
}

/// Join a zone prefix and a route pattern into a normalized full URI.
pub fn join(prefix: &str, pattern: &str) -> String {
    normalize(&format!("{prefix}/{pattern}"))
}

/// Split a URI into its non-empty path segments.
pub fn segments(uri: &str) -> impl Iterator<Item = &str> {
    uri.split('/').filter(|s| !s.is_empty())
}

/// Whether a path segment is a parameter token.
pub fn is_parameter_segment(segment: &str) -> bool {
    segment.contains('{')
}

/// Scan a pattern for parameter tokens, in order of appearance.
///
/// Rejects unterminated braces, nested braces and empty names.
pub fn parameters(pattern: &str) -> CoreResult<Vec<UriParameter>> {
    let mut params = Vec::new();
    let mut rest = pattern;
    while let Some(open) = rest.find('{') {
        let after = &rest[open + 1..];
        let close = after.find('}').ok_or_else(|| CoreError::InvalidUri {
            pattern: pattern.to_string(),
            reason: "unterminated parameter".to_string(),
        })?;
        let token = &after[..close];
        if token.contains('{') {
            return Err(CoreError::InvalidUri {
                pattern: pattern.to_string(),
                reason: "nested parameter".to_string(),
            });
        }
        let (name, optional) = match token.strip_suffix('?') {
            Some(name) => (name, true),
            None => (token, false),
        };
        if name.is_empty() || !name.chars().all(|c| c.is_alphanumeric() || c == '_') {
            return Err(CoreError::InvalidUri {
                pattern: pattern.to_string(),
                reason: format!("invalid parameter name {name:?}"),
            });
        }
        params.push(UriParameter {
            name: name.to_string(),
            optional,
        });
        rest = &after[close + 1..];
    }
    if rest.contains('}') {
        return Err(CoreError::InvalidUri {
            pattern: pattern.to_string(),
            reason: "unbalanced closing brace".to_string(),
        });
    }
    Ok(params)
}

/// Substitute parameter values into a pattern.
///
/// Returns `None` when a required parameter has no value or an empty one.
/// Optional parameters without a value drop their segment. Values are
/// percent-encoded, so a `/` inside a value never adds a path segment.
pub fn substitute(
    pattern: &str,
    values: &std::collections::BTreeMap<String, String>,
) -> Option<String> {
    let mut out = Vec::new();
    for segment in segments(pattern) {
        if !is_parameter_segment(segment) {
            out.push(segment.to_string());
            continue;
        }
        let params = parameters(segment).ok()?;
        let mut rendered = segment.to_string();
        let mut drop_segment = false;
        for param in params {
            let token = if param.optional {
                format!("{{{}?}}", param.name)
            } else {
                format!("{{{}}}", param.name)
            };
            match values.get(&param.name).filter(|v| !v.is_empty()) {
                Some(value) => rendered = rendered.replace(&token, &urlencoding::encode(value)),
                None if param.optional => {
                    rendered = rendered.replace(&token, "");
                    if rendered.is_empty() {
                        drop_segment = true;
                    }
                }
                None => return None,
            }
        }
        if !drop_segment {
            out.push(rendered);
        }
    }
    Some(normalize(&out.join("/")))
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use proptest::prelude::*;

    #[test]
    fn normalize_collapses_slashes() {
        assert_eq!(normalize("//admin///users/"), "/admin/users");
        assert_eq!(normalize(""), "/");
        assert_eq!(normalize("/"), "/");
        assert_eq!(normalize("users"), "/users");
    }

    #[test]
    fn join_prefix_and_pattern() {
        assert_eq!(join("/admin", "/users"), "/admin/users");
        assert_eq!(join("admin/", "users/{user}"), "/admin/users/{user}");
        assert_eq!(join("", "/"), "/");
        assert_eq!(join("/", ""), "/");
    }

    #[test]
    fn parameters_in_order_with_optional_flag() {
        let params = parameters("/products/{id}/{slug?}").unwrap();
        let names: Vec<_> = params.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["id", "slug"]);
        assert!(!params[0].optional);
        assert!(params[1].optional);
    }

    #[test]
    fn parameters_rejects_malformed_tokens() {
        assert!(parameters("/a/{b").is_err());
        assert!(parameters("/a/{}").is_err());
        assert!(parameters("/a/{b{c}}").is_err());
        assert!(parameters("/a/b}").is_err());
    }

    #[test]
    fn substitute_fills_required_and_drops_missing_optional() {
        let mut values = BTreeMap::new();
        values.insert("id".to_string(), "42".to_string());
        assert_eq!(
            substitute("/products/{id}/{slug?}", &values).as_deref(),
            Some("/products/42")
        );
        values.insert("slug".to_string(), "red-shoe".to_string());
        assert_eq!(
            substitute("/products/{id}/{slug?}", &values).as_deref(),
            Some("/products/42/red-shoe")
        );
    }

    #[test]
    fn substitute_missing_required_is_none() {
        assert!(substitute("/users/{user}", &BTreeMap::new()).is_none());
    }

    #[test]
    fn substitute_empty_required_is_none() {
        let values = BTreeMap::from([("user".to_string(), String::new())]);
        assert!(substitute("/users/{user}", &values).is_none());
    }

    #[test]
    fn substitute_empty_optional_drops_segment() {
        let values = BTreeMap::from([
            ("id".to_string(), "7".to_string()),
            ("slug".to_string(), String::new()),
        ]);
        assert_eq!(
            substitute("/products/{id}/{slug?}", &values).as_deref(),
            Some("/products/7")
        );
    }

    #[test]
    fn substitute_encodes_values() {
        let values = BTreeMap::from([("user".to_string(), "a/b c".to_string())]);
        assert_eq!(
            substitute("/users/{user}", &values).as_deref(),
            Some("/users/a%2Fb%20c")
        );
    }

    proptest! {
        /// Normalized URIs start with one slash and never end with one (except root).
        #[test]
        fn normalize_shape(raw in "[a-z/]{0,24}") {
            let n = normalize(&raw);
            prop_assert!(n.starts_with('/'));
            prop_assert!(!n.starts_with("//"));
            prop_assert!(n == "/" || !n.ends_with('/'));
        }

        /// Normalization is idempotent.
        #[test]
        fn normalize_idempotent(raw in "[a-z{}?/]{0,24}") {
            let once = normalize(&raw);
            prop_assert_eq!(normalize(&once), once);
        }
    }
}
