//! Route resolution.
//!
//! # Responsibilities
//! - Map logical route names to request paths
//! - Apply the version prefix to ordinary routes
//!
//! # Design Decisions
//! - Special routes are exact-match only, no wildcards or prefixes
//! - Resolution is pure and shared by every verb

use std::collections::BTreeMap;

/// Special-route table plus the version prefix convention.
#[derive(Debug, Clone)]
pub struct RouteTable {
    version_prefix: String,
    special: BTreeMap<String, String>,
}

impl RouteTable {
    pub fn new(version_prefix: impl Into<String>, special: BTreeMap<String, String>) -> Self {
        Self {
            version_prefix: version_prefix.into(),
            special,
        }
    }

    /// Resolve a logical route to the path sent on the wire.
    pub fn resolve(&self, route: &str) -> String {
        match self.special.get(route) {
            Some(path) => path.clone(),
            None => format!("{}{}", self.version_prefix, route),
        }
    }

    /// True if `route` bypasses the version prefix.
    pub fn is_special(&self, route: &str) -> bool {
        self.special.contains_key(route)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> RouteTable {
        let mut special = BTreeMap::new();
        special.insert("_csrf-cookie".to_string(), "/csrf-cookie".to_string());
        RouteTable::new("/v3", special)
    }

    #[test]
    fn test_ordinary_routes_get_prefix() {
        let routes = table();
        for route in ["/users", "/courses/12/lessons", "", "/_csrf-cookie", "_csrf-cookie/x"] {
            assert_eq!(routes.resolve(route), format!("/v3{route}"));
        }
    }

    #[test]
    fn test_special_route_is_literal() {
        let routes = table();
        assert!(routes.is_special("_csrf-cookie"));
        assert_eq!(routes.resolve("_csrf-cookie"), "/csrf-cookie");
        assert!(!routes.is_special("_CSRF-COOKIE"));
    }
}
