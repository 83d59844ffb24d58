//! Cache key construction.
//!
//! A stored key has two parts joined by [`ROUTE_SEPARATOR`]: the matched
//! route template, then an identity key of the form
//! `role-principalId[-param...][-query]`. The route comes first so that
//! invalidation can address every entry of a route by prefix; the role and
//! principal id are always present so two principals never share an entry.

use jobportal_core::{Principal, GUEST};

/// Separates the route template from the identity key.
pub const ROUTE_SEPARATOR: char = '|';

/// Builds the identity part of a cache key.
///
/// Empty `principal_id` or `role` fall back to `"guest"`. `query` is
/// canonicalized with [`canonical_query`] before use.
#[must_use]
pub fn identity_key(principal_id: &str, role: &str, route_params: &[String], query: &str) -> String {
    let principal_id = non_empty_or_guest(principal_id);
    let role = non_empty_or_guest(role);

    let mut key = format!("{role}-{principal_id}");
    if !route_params.is_empty() {
        key.push('-');
        key.push_str(&route_params.join("-"));
    }

    let query = canonical_query(query);
    if !query.is_empty() {
        key.push('-');
        key.push_str(&query);
    }
    key
}

/// Builds the identity part of a cache key for `principal`.
#[must_use]
pub fn principal_key(principal: &Principal, route_params: &[String], query: &str) -> String {
    identity_key(&principal.id, principal.role.as_str(), route_params, query)
}

/// Joins a route template and an identity key into a stored key.
#[must_use]
pub fn entry_key(route: &str, identity: &str) -> String {
    format!("{route}{ROUTE_SEPARATOR}{identity}")
}

/// Prefix addressing every entry of `route` owned by `principal`.
#[must_use]
pub fn principal_prefix(route: &str, principal: &Principal) -> String {
    format!(
        "{route}{ROUTE_SEPARATOR}{}-{}",
        principal.role.as_str(),
        principal.id
    )
}

/// Normalizes a raw query string.
///
/// Drops a leading `?` and empty pairs, then sorts the pairs so parameter
/// order does not split the cache. Values are kept as sent; two requests
/// that differ in any value get different keys.
#[must_use]
pub fn canonical_query(raw: &str) -> String {
    let raw = raw.strip_prefix('?').unwrap_or(raw);
    let mut pairs: Vec<&str> = raw.split('&').filter(|pair| !pair.is_empty()).collect();
    pairs.sort_unstable();
    pairs.join("&")
}

fn non_empty_or_guest(value: &str) -> &str {
    if value.trim().is_empty() {
        GUEST
    } else {
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jobportal_core::Role;

    fn params(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| (*v).to_string()).collect()
    }

    #[test]
    fn test_identity_key_format() {
        assert_eq!(identity_key("guest", "guest", &[], ""), "guest-guest");
        assert_eq!(
            identity_key("U1", "recruiter", &params(&["j1"]), ""),
            "recruiter-U1-j1"
        );
        assert_eq!(
            identity_key("U1", "student", &params(&["j1", "a2"]), "page=2"),
            "student-U1-j1-a2-page=2"
        );
        assert_eq!(identity_key("U1", "student", &[], "?q=rust"), "student-U1-q=rust");
    }

    #[test]
    fn test_identity_key_is_deterministic() {
        let a = identity_key("U1", "student", &params(&["7"]), "a=1&b=2");
        let b = identity_key("U1", "student", &params(&["7"]), "a=1&b=2");
        assert_eq!(a, b);
    }

    #[test]
    fn test_different_principals_get_different_keys() {
        let a = identity_key("U1", "student", &[], "q=rust");
        let b = identity_key("U2", "student", &[], "q=rust");
        assert_ne!(a, b);

        let admin = identity_key("U1", "admin", &[], "q=rust");
        assert_ne!(a, admin);
    }

    #[test]
    fn test_different_query_values_get_different_keys() {
        let a = identity_key("guest", "guest", &[], "keyword=rust");
        let b = identity_key("guest", "guest", &[], "keyword=go");
        assert_ne!(a, b);
    }

    #[test]
    fn test_missing_identity_falls_back_to_guest() {
        assert_eq!(identity_key("", "", &[], ""), "guest-guest");
        assert_eq!(principal_key(&Principal::guest(), &[], ""), "guest-guest");
    }

    #[test]
    fn test_canonical_query_sorts_pairs() {
        assert_eq!(canonical_query("b=2&a=1"), canonical_query("a=1&b=2"));
        assert_eq!(canonical_query("?a=1&&b=2&"), "a=1&b=2");
        assert_eq!(canonical_query(""), "");
    }

    #[test]
    fn test_entry_key_and_principal_prefix() {
        let principal = Principal::new("U1", Role::Student);
        let key = entry_key("/api/v1/user/profile", &principal_key(&principal, &[], ""));
        assert_eq!(key, "/api/v1/user/profile|student-U1");
        assert!(key.starts_with(&principal_prefix("/api/v1/user/profile", &principal)));

        let other = Principal::new("U2", Role::Student);
        assert!(!key.starts_with(&principal_prefix("/api/v1/user/profile", &other)));
    }
}
