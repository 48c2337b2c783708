//! Route table and pre-transition navigation guard.
//!
//! Routes are static: defined once at startup, immutable afterwards. The
//! guard runs before every transition and is the only component that
//! expires sessions.

pub mod guard;

pub use guard::{Decision, NavigationGuard};

/// A navigable page. `requires_auth` defaults to false.
#[derive(Debug, Clone)]
pub struct Route {
    pub path: &'static str,
    pub name: &'static str,
    pub requires_auth: bool,
}

impl Route {
    const fn new(path: &'static str, name: &'static str) -> Self {
        Self {
            path,
            name,
            requires_auth: false,
        }
    }

    const fn protected(path: &'static str, name: &'static str) -> Self {
        Self {
            path,
            name,
            requires_auth: true,
        }
    }
}

/// Name of the route that rejected transitions redirect to
const LOGIN_ROUTE_NAME: &str = "Login";

/// Ordered, immutable list of routes. The login entry is the fixed
/// redirect target for rejected transitions.
pub struct RouteTable {
    routes: Vec<Route>,
    login_index: usize,
}

impl RouteTable {
    pub fn new() -> Self {
        let routes = vec![
            Route::new("/", LOGIN_ROUTE_NAME),
            Route::protected("/query", "QueryForm"),
            Route::new("/register", "Register"),
            Route::new("/forgot-password", "ForgotPassword"),
        ];
        // Resolved by name so reordering the table cannot silently change
        // the redirect target.
        let login_index = routes
            .iter()
            .position(|r| r.name == LOGIN_ROUTE_NAME)
            .expect("route table must contain the login route");

        Self {
            routes,
            login_index,
        }
    }

    pub fn find(&self, path: &str) -> Option<&Route> {
        self.routes.iter().find(|r| r.path == path)
    }

    /// The login route, located by name at construction.
    pub fn login_route(&self) -> &Route {
        &self.routes[self.login_index]
    }
}

impl Default for RouteTable {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_route_table_lookup() {
        let table = RouteTable::new();
        assert_eq!(table.find("/query").unwrap().name, "QueryForm");
        assert!(table.find("/nope").is_none());
    }

    #[test]
    fn test_only_query_form_requires_auth() {
        let table = RouteTable::new();
        assert!(table.find("/query").unwrap().requires_auth);
        for path in ["/", "/register", "/forgot-password"] {
            assert!(!table.find(path).unwrap().requires_auth, "{path}");
        }
    }

    #[test]
    fn test_login_route_is_root() {
        assert_eq!(RouteTable::new().login_route().path, "/");
    }

    #[test]
    fn test_login_route_resolved_by_name() {
        let table = RouteTable::new();
        let login = table.login_route();
        assert_eq!(login.name, "Login");
        assert!(!login.requires_auth);
    }
}
