use anyhow::Result;
use serde::{Deserialize, Serialize};
use tracing::warn;

use super::storage::Storage;

/// Storage key for the serialized user info object
const USER_INFO_KEY: &str = "userInfo";

/// Storage key for the login timestamp (epoch millis, stringified)
const LOGIN_TIME_KEY: &str = "loginTime";

/// Maximum session age in milliseconds (1 hour).
/// Past this, the session is stale and the user must log in again.
pub const SESSION_TTL_MS: i64 = 60 * 60 * 1000;

/// Identity claims returned by the login endpoint.
///
/// Only the bearer token is required; any other claims the server sends
/// are carried along untouched.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserInfo {
    pub token: String,
    #[serde(flatten)]
    pub claims: serde_json::Map<String, serde_json::Value>,
}

/// Snapshot of the persisted session state.
///
/// The two fields are stored under separate keys, so a partial record is
/// possible. Expiry only applies when `login_time` is present; `user_info`
/// without a timestamp never expires.
#[derive(Debug, Clone, Default)]
pub struct SessionRecord {
    pub user_info: Option<UserInfo>,
    pub login_time: Option<i64>,
}

impl SessionRecord {
    /// Whether the session is older than [`SESSION_TTL_MS`] at `now_ms`.
    /// A record without a login timestamp is never considered expired.
    pub fn is_expired(&self, now_ms: i64) -> bool {
        matches!(self.login_time, Some(t) if now_ms - t > SESSION_TTL_MS)
    }

    /// Get the bearer token if identity claims are present
    pub fn token(&self) -> Option<&str> {
        self.user_info.as_ref().map(|u| u.token.as_str())
    }
}

/// Reads and clears the session record through an injected storage backend.
///
/// Only the login flow writes the record (via `save`); the navigation guard
/// and the request authenticator read it, and the guard clears it on expiry.
pub struct SessionStore<S: Storage> {
    storage: S,
}

impl<S: Storage> SessionStore<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    /// Load the current session record.
    ///
    /// A `userInfo` value that fails to parse is treated as absent, so a
    /// mangled record routes the user back to login rather than erroring.
    pub fn load(&self) -> SessionRecord {
        let user_info = self.storage.get(USER_INFO_KEY).and_then(|raw| {
            match serde_json::from_str::<UserInfo>(&raw) {
                Ok(info) => Some(info),
                Err(e) => {
                    warn!(error = %e, "Ignoring unparseable userInfo record");
                    None
                }
            }
        });

        let login_time = self.storage.get(LOGIN_TIME_KEY).and_then(|raw| {
            match raw.parse::<i64>() {
                Ok(t) => Some(t),
                Err(e) => {
                    warn!(error = %e, "Ignoring unparseable loginTime record");
                    None
                }
            }
        });

        SessionRecord {
            user_info,
            login_time,
        }
    }

    /// Persist a fresh record. Both keys are written together.
    pub fn save(&mut self, user_info: &UserInfo, login_time_ms: i64) -> Result<()> {
        let raw = serde_json::to_string(user_info)?;
        self.storage.set(USER_INFO_KEY, &raw)?;
        self.storage.set(LOGIN_TIME_KEY, &login_time_ms.to_string())?;
        Ok(())
    }

    /// Remove both keys. Clearing an already-absent record is a no-op.
    pub fn clear(&mut self) -> Result<()> {
        self.storage.remove(USER_INFO_KEY)?;
        self.storage.remove(LOGIN_TIME_KEY)?;
        Ok(())
    }
}
