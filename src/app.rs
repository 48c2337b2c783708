//! Application state: the current page, the session store, and the API
//! client, wired so that every page transition runs through the navigation
//! guard and every request through the authenticator.

use anyhow::{Context, Result};
use chrono::Utc;
use tracing::info;

use crate::api::{ApiClient, QueryResponse, ServerMessage};
use crate::auth::{FileStorage, SessionStore, Storage};
use crate::config::Config;
use crate::router::{Decision, NavigationGuard, Route, RouteTable};

pub struct App<S: Storage> {
    routes: RouteTable,
    guard: NavigationGuard,
    store: SessionStore<S>,
    client: ApiClient,
    current_path: String,
}

impl App<FileStorage> {
    /// Build the app with the session record persisted on disk.
    pub fn new(config: &Config) -> Result<Self> {
        let storage = FileStorage::open(Config::session_path()?)?;
        Self::with_storage(config, storage)
    }
}

impl<S: Storage> App<S> {
    pub fn with_storage(config: &Config, storage: S) -> Result<Self> {
        let routes = RouteTable::new();
        let guard = NavigationGuard::new(&routes);
        let current_path = routes.login_route().path.to_string();

        Ok(Self {
            routes,
            guard,
            store: SessionStore::new(storage),
            client: ApiClient::new(&config.base_url)?,
            current_path,
        })
    }

    pub fn current_route(&self) -> &Route {
        self.routes
            .find(&self.current_path)
            .unwrap_or_else(|| self.routes.login_route())
    }

    /// Run the guard for `path` and move there, or to the login page if the
    /// transition is rejected. Unknown paths are an error.
    pub fn navigate(&mut self, path: &str) -> Result<()> {
        let route = self
            .routes
            .find(path)
            .with_context(|| format!("Unknown route: {}", path))?;

        let now_ms = Utc::now().timestamp_millis();
        match self.guard.evaluate(route, &mut self.store, now_ms)? {
            Decision::Proceed => {
                self.current_path = path.to_string();
            }
            Decision::Redirect { to } => {
                info!(from = path, to = %to, "Navigation redirected");
                self.current_path = to;
            }
        }
        Ok(())
    }

    /// Log in and persist the resulting session record.
    pub async fn login(&mut self, username: &str, password: &str) -> Result<()> {
        let record = self.client.login(username, password).await?;
        if let (Some(info), Some(login_time)) = (record.user_info.as_ref(), record.login_time) {
            self.store.save(info, login_time)?;
        }
        info!(username, "Logged in");
        Ok(())
    }

    /// Drop the session record. Safe to call when already logged out.
    pub fn logout(&mut self) -> Result<()> {
        self.store.clear()?;
        info!("Logged out");
        Ok(())
    }

    pub async fn run_query(&self, sentence: &str) -> Result<QueryResponse> {
        self.client.query(sentence, &self.store.load()).await
    }

    pub async fn register(
        &self,
        username: &str,
        password: &str,
        email: &str,
    ) -> Result<ServerMessage> {
        self.client.register(username, password, email).await
    }

    pub async fn forgot_password(&self, username: &str) -> Result<ServerMessage> {
        self.client.forgot_password(username).await
    }

    pub async fn send_suggestion(&self, content: &str) -> Result<ServerMessage> {
        self.client.suggestion(content, &self.store.load()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{MemoryStorage, UserInfo};

    fn test_app() -> App<MemoryStorage> {
        App::with_storage(&Config::default(), MemoryStorage::new()).unwrap()
    }

    #[test]
    fn test_starts_on_login_page() {
        assert_eq!(test_app().current_route().path, "/");
    }

    #[test]
    fn test_protected_navigation_without_session_bounces_to_login() {
        let mut app = test_app();
        app.navigate("/query").unwrap();
        assert_eq!(app.current_route().path, "/");
    }

    #[test]
    fn test_protected_navigation_with_session_proceeds() {
        let mut app = test_app();
        let info = UserInfo {
            token: "abc".to_string(),
            claims: serde_json::Map::new(),
        };
        app.store.save(&info, Utc::now().timestamp_millis()).unwrap();

        app.navigate("/query").unwrap();
        assert_eq!(app.current_route().path, "/query");
    }

    #[test]
    fn test_logout_then_navigate_bounces() {
        let mut app = test_app();
        let info = UserInfo {
            token: "abc".to_string(),
            claims: serde_json::Map::new(),
        };
        app.store.save(&info, Utc::now().timestamp_millis()).unwrap();
        app.logout().unwrap();

        app.navigate("/query").unwrap();
        assert_eq!(app.current_route().path, "/");
    }

    #[test]
    fn test_unknown_route_is_an_error() {
        let mut app = test_app();
        assert!(app.navigate("/admin").is_err());
    }

    #[test]
    fn test_public_pages_reachable_without_session() {
        let mut app = test_app();
        app.navigate("/register").unwrap();
        assert_eq!(app.current_route().path, "/register");
        app.navigate("/forgot-password").unwrap();
        assert_eq!(app.current_route().path, "/forgot-password");
    }
}
