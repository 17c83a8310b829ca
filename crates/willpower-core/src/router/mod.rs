//! Navigation: the route table, the access guard, and the `Router` that
//! ties them to a session.

pub mod guard;
pub mod routes;

use std::sync::Arc;

use thiserror::Error;
use tracing::debug;

use crate::auth::SessionStore;

pub use guard::{evaluate, NavigationDecision};
pub use routes::{resolve, Destination, Route, RouteName, DEFAULT_ROUTE, LOGIN_ROUTE, ROUTES};

#[derive(Error, Debug, PartialEq, Eq)]
pub enum RouterError {
    #[error("No route matches {0}")]
    NotFound(String),
}

/// Outcome of a guarded navigation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Navigation {
    pub decision: NavigationDecision,
    /// Where the user ends up: the requested destination or the redirect target
    pub destination: Destination,
}

impl Navigation {
    pub fn was_redirected(&self) -> bool {
        self.decision != NavigationDecision::Allow
    }
}

/// Guards navigations with the authentication state of an injected session.
#[derive(Clone)]
pub struct Router {
    session: Arc<SessionStore>,
}

impl Router {
    pub fn new(session: Arc<SessionStore>) -> Self {
        Self { session }
    }

    pub fn session(&self) -> &Arc<SessionStore> {
        &self.session
    }

    /// Resolve `path` and run the guard on it.
    pub fn navigate(&self, path: &str) -> Result<Navigation, RouterError> {
        let destination = resolve(path).ok_or_else(|| RouterError::NotFound(path.to_string()))?;
        Ok(self.navigate_to(destination))
    }

    /// Run the guard on an already resolved destination.
    pub fn navigate_to(&self, destination: Destination) -> Navigation {
        let decision = evaluate(&destination, self.session.is_authenticated());
        let destination = match decision {
            NavigationDecision::Allow => destination,
            NavigationDecision::RedirectToLogin => Destination::named(LOGIN_ROUTE),
            NavigationDecision::RedirectToDefault => Destination::named(DEFAULT_ROUTE),
        };
        debug!(?decision, to = %destination, "Navigation");
        Navigation {
            decision,
            destination,
        }
    }
}
