use std::sync::{Mutex as StdMutex, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::api::ApiClient;
use crate::models::{Credentials, Identity, Registration};

use super::{AuthError, TokenStore, TOKEN_KEY};

/// In-memory view of the session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionState {
    /// Bearer token; empty means logged out
    pub credential: String,
    /// Set by a successful login in this process, never restored from disk
    pub identity: Option<Identity>,
}

impl SessionState {
    pub fn is_authenticated(&self) -> bool {
        !self.credential.is_empty()
    }
}

/// Owns the credential and identity of the current user.
///
/// Construct one per process and share it (`Arc<SessionStore>`) with the
/// router and whatever issues API calls. The credential is mirrored into the
/// token storage on every change, so the next process starts logged in.
pub struct SessionStore {
    api: ApiClient,
    storage: Box<dyn TokenStore>,
    state: RwLock<SessionState>,
    // Serializes logins so responses apply in call order
    login_gate: Mutex<()>,
    // Keeps storage writes in the same order as the in-memory swaps
    persist_gate: StdMutex<()>,
}

impl SessionStore {
    /// Create a store seeded from any previously persisted credential.
    pub fn new(api: ApiClient, storage: Box<dyn TokenStore>) -> Self {
        let credential = match storage.get(TOKEN_KEY) {
            Ok(Some(token)) => token,
            Ok(None) => String::new(),
            Err(e) => {
                warn!(error = %e, "Failed to read persisted token, starting logged out");
                String::new()
            }
        };
        debug!(restored = !credential.is_empty(), "Session store created");

        Self {
            api,
            storage,
            state: RwLock::new(SessionState {
                credential,
                identity: None,
            }),
            login_gate: Mutex::new(()),
            persist_gate: StdMutex::new(()),
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, SessionState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, SessionState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    // =========================================================================
    // Queries
    // =========================================================================

    pub fn is_authenticated(&self) -> bool {
        self.read().is_authenticated()
    }

    pub fn credential(&self) -> String {
        self.read().credential.clone()
    }

    pub fn identity(&self) -> Option<Identity> {
        self.read().identity.clone()
    }

    pub fn snapshot(&self) -> SessionState {
        self.read().clone()
    }

    /// The API client decorated with the current credential.
    ///
    /// The token is copied when this is called. Fetch a fresh client for each
    /// operation; one kept across `logout` still sends the old credential.
    pub fn authorized_client(&self) -> ApiClient {
        self.api.with_token(&self.read().credential)
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    /// Replace the credential and mirror it into storage.
    ///
    /// A non-empty token is written under [`TOKEN_KEY`]; an empty one removes
    /// the entry. Storage failures are logged; the in-memory value is always
    /// updated.
    pub fn set_credential(&self, token: &str) {
        self.replace_credential(token, None);
    }

    /// Storage I/O happens before the state lock is taken.
    fn replace_credential(&self, token: &str, identity: Option<Identity>) {
        let _persist = self.persist_gate.lock().unwrap_or_else(PoisonError::into_inner);

        if token.is_empty() {
            if let Err(e) = self.storage.remove(TOKEN_KEY) {
                warn!(error = %e, "Failed to remove persisted token");
            }
        } else if let Err(e) = self.storage.set(TOKEN_KEY, token) {
            warn!(error = %e, "Failed to persist token");
        }

        let mut state = self.write();
        state.credential = token.to_string();
        if token.is_empty() {
            state.identity = None;
        } else if identity.is_some() {
            state.identity = identity;
        }
    }

    /// Create an account. Does not log in.
    pub async fn register(&self, payload: &Registration) -> Result<(), AuthError> {
        let api = self.authorized_client();
        match api.register(payload).await {
            Ok(()) => {
                info!(username = %payload.username, "Registration successful");
                Ok(())
            }
            Err(e) => {
                warn!(username = %payload.username, error = %e, "Registration failed");
                Err(e.into())
            }
        }
    }

    /// Authenticate and, on success, store the token and identity.
    /// On failure the session is left exactly as it was.
    pub async fn login(&self, credentials: &Credentials) -> Result<(), AuthError> {
        let _gate = self.login_gate.lock().await;

        let api = self.authorized_client();
        let data = match api.login(credentials).await {
            Ok(data) => data,
            Err(e) => {
                warn!(username = %credentials.username, error = %e, "Login failed");
                return Err(e.into());
            }
        };

        self.replace_credential(
            &data.token,
            Some(Identity {
                id: data.user_id,
                username: credentials.username.clone(),
            }),
        );
        info!(username = %credentials.username, user_id = data.user_id, "Login successful");
        Ok(())
    }

    /// Drop the session locally. No network call.
    pub fn logout(&self) {
        let was_authenticated = self.is_authenticated();
        self.replace_credential("", None);
        if was_authenticated {
            info!("Logged out");
        }
    }
}
