//! Route access guard.
//!
//! Evaluated before every navigation. Pure and synchronous: the only input
//! besides the destination is whether the session is authenticated.

use super::routes::Destination;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationDecision {
    Allow,
    RedirectToLogin,
    RedirectToDefault,
}

/// Decide what happens to a navigation towards `destination`.
///
/// Protected destinations send unauthenticated users to login; the login and
/// register screens send authenticated users to the dashboard. The requested
/// destination is not remembered across the redirect.
pub fn evaluate(destination: &Destination, is_authenticated: bool) -> NavigationDecision {
    if destination.requires_auth && !is_authenticated {
        NavigationDecision::RedirectToLogin
    } else if destination.name.is_entry() && is_authenticated {
        NavigationDecision::RedirectToDefault
    } else {
        NavigationDecision::Allow
    }
}
