//! Willpower Forge core library.
//!
//! Session lifecycle, route access guard, and the REST API client shared by
//! the Willpower Forge front-ends.

pub mod api;
pub mod auth;
pub mod config;
pub mod models;
pub mod router;

pub use api::{ApiClient, ApiError};
pub use auth::{AuthError, SessionStore, TokenStore};
pub use config::Config;
pub use router::{NavigationDecision, Router};
