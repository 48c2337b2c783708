use anyhow::Result;
use tracing::{debug, info};

use crate::auth::{SessionStore, Storage};

use super::{Route, RouteTable};

/// Outcome of evaluating a route transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    Proceed,
    Redirect { to: String },
}

/// Pre-transition check gating access to protected routes.
///
/// Evaluation is a pure local-state check: no network, fail-closed. The one
/// side effect is expiring stale sessions, which happens regardless of
/// whether the target route needs auth, so a stale record never outlives
/// the next navigation.
pub struct NavigationGuard {
    login_path: String,
}

impl NavigationGuard {
    pub fn new(table: &RouteTable) -> Self {
        Self {
            login_path: table.login_route().path.to_string(),
        }
    }

    /// Decide whether the transition to `route` may proceed at `now_ms`.
    ///
    /// Evaluating twice with the same clock yields the same decision;
    /// clearing an already-cleared record is a no-op.
    pub fn evaluate<S: Storage>(
        &self,
        route: &Route,
        store: &mut SessionStore<S>,
        now_ms: i64,
    ) -> Result<Decision> {
        let record = store.load();
        let expired = record.is_expired(now_ms);

        if expired {
            info!(route = route.path, "Session expired, clearing record");
            store.clear()?;
        }

        if route.requires_auth && (record.user_info.is_none() || expired) {
            debug!(route = route.path, "Redirecting unauthenticated navigation");
            return Ok(Decision::Redirect {
                to: self.login_path.clone(),
            });
        }

        Ok(Decision::Proceed)
    }
}
