//! Path-exemption matching.
//!
//! Exemption rules are literal paths, optionally ending in `*` for a prefix
//! match. Both rules and request paths are slash-tolerant: one trailing `/`
//! is stripped before comparison, so `/status` and `/status/` are the same
//! path. Matching is a plain suffix-glob, not a general glob: `*` anywhere
//! but the end is literal.

/// How a request path relates to the configured exemption rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathClass {
    /// There is no path or no rule list to check against; authentication is
    /// not enforced at all. Distinct from `Exempt`.
    Open,
    /// The path matched an exemption rule; skip authentication.
    Exempt,
    /// The path requires credentials.
    Protected,
}

/// Classify a request path against a list of exemption rules.
///
/// Any single matching rule exempts the path, so the outcome is invariant
/// under reordering of `rules`.
pub fn classify(path: Option<&str>, rules: &[String]) -> PathClass {
    let Some(path) = path else {
        return PathClass::Open;
    };
    if rules.is_empty() {
        return PathClass::Open;
    }
    if rules.iter().any(|rule| rule_matches(rule, path)) {
        PathClass::Exempt
    } else {
        PathClass::Protected
    }
}

/// Whether `path` matches any of the exemption rules.
pub fn is_exempt(path: &str, rules: &[String]) -> bool {
    classify(Some(path), rules) == PathClass::Exempt
}

fn rule_matches(rule: &str, path: &str) -> bool {
    let path = strip_trailing_slash(path);
    let rule = strip_trailing_slash(rule);
    match rule.strip_suffix('*') {
        Some(prefix) => path.starts_with(prefix),
        None => path == rule,
    }
}

fn strip_trailing_slash(s: &str) -> &str {
    s.strip_suffix('/').unwrap_or(s)
}
