//! Name and label helpers shared by the processors and the view builders.

use heck::{ToKebabCase, ToTitleCase};

/// Suffix words stripped from component short names before deriving labels
/// and generated route names.
pub const COMMON_SUFFIXES: &[&str] = &["Page", "Screen", "Component", "View", "Controller"];

/// Strip one trailing suffix word from a short name.
///
/// The name is left unchanged if stripping would leave it empty.
pub fn strip_suffix_word(short_name: &str) -> &str {
    for suffix in COMMON_SUFFIXES {
        if let Some(stem) = short_name.strip_suffix(suffix) {
            if !stem.is_empty() {
                return stem;
            }
        }
    }
    short_name
}

/// Human label for a component: `UserDetailPage` becomes `User Detail`.
pub fn label_from_short_name(short_name: &str) -> String {
    strip_suffix_word(short_name).to_title_case()
}

/// Kebab-case slug: `UserList` becomes `user-list`.
pub fn slug(value: &str) -> String {
    value.to_kebab_case()
}

/// Split a namespace path on any of `::`, `\`, `/` or `.`.
pub fn namespace_segments(path: &str) -> Vec<String> {
    path.replace("::", "/")
        .split(['\\', '/', '.'])
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Match a name against a pattern with an optional trailing `*` wildcard.
///
/// `admin.*` matches `admin.users.view` but not `admin` itself; a pattern
/// without `*` must match exactly; `*` alone matches everything.
pub fn wildcard_matches(pattern: &str, name: &str) -> bool {
    match pattern.strip_suffix('*') {
        Some("") => true,
        Some(prefix) => name.len() > prefix.len() && name.starts_with(prefix),
        None => pattern == name,
    }
}

/// Whether a pattern contains a wildcard token.
pub fn is_wildcard(pattern: &str) -> bool {
    pattern.contains('*')
}
