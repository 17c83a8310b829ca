//! Authentication module for managing the user session.
//!
//! This module provides:
//! - `SessionStore`: the credential/identity owner with login, register and logout
//! - `TokenStore`: persistent key-value storage for the bearer token, with
//!   file, OS keychain and in-memory backends
//!
//! The token is persisted under a single fixed key and restored when the
//! store is constructed; the identity is only known after a fresh login.

pub mod credentials;
pub mod error;
pub mod session;
pub mod storage;

pub use credentials::KeyringTokenStore;
pub use error::AuthError;
pub use session::{SessionState, SessionStore};
pub use storage::{FileTokenStore, MemoryTokenStore, TokenStore, TOKEN_KEY};
