//! Authenticated session state shared by every component.
//!
//! [`SessionStore`] holds the bearer token and the identity of the logged-in
//! user. It mirrors both into a [`SessionStorage`] backend under the keys
//! `token` and `usuario` so the session survives restarts.
//!
//! The store is a cheap `Clone` handle. Build it once with
//! [`SessionStore::restore`] and pass clones to the request pipeline, the
//! route guards, and the checkout composer; they all observe the same state.

mod storage;

use std::sync::Arc;

use parking_lot::RwLock;
use pizzeria_core::{Identity, UserId};
use secrecy::{ExposeSecret, SecretString};

pub use storage::{FileStorage, MemoryStorage, SessionStorage, StorageError};

/// Storage key of the bearer token.
pub const TOKEN_KEY: &str = "token";

/// Storage key of the JSON-encoded identity.
pub const IDENTITY_KEY: &str = "usuario";

#[derive(Default)]
struct SessionState {
    token: Option<SecretString>,
    identity: Option<Identity>,
}

struct SessionStoreInner {
    state: RwLock<SessionState>,
    storage: Arc<dyn SessionStorage>,
}

/// Shared handle to the current session.
#[derive(Clone)]
pub struct SessionStore {
    inner: Arc<SessionStoreInner>,
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.inner.state.read();
        f.debug_struct("SessionStore")
            .field("token", &state.token.as_ref().map(|_| "[REDACTED]"))
            .field("identity", &state.identity)
            .finish_non_exhaustive()
    }
}

impl SessionStore {
    /// Rebuild the session from persisted state. Makes no network call.
    ///
    /// A missing or blank token means no session. An identity that no longer
    /// parses is dropped and the token is kept.
    #[must_use]
    pub fn restore(storage: Arc<dyn SessionStorage>) -> Self {
        let token = storage
            .get(TOKEN_KEY)
            .filter(|t| !t.trim().is_empty())
            .map(SecretString::from);

        let identity = token.as_ref().and_then(|_| {
            let raw = storage.get(IDENTITY_KEY)?;
            serde_json::from_str::<Option<Identity>>(&raw)
                .inspect_err(|e| {
                    tracing::warn!(error = %e, "Discarding unreadable persisted identity");
                })
                .ok()
                .flatten()
        });

        tracing::debug!(
            authenticated = token.is_some(),
            has_identity = identity.is_some(),
            "Session restored"
        );

        Self {
            inner: Arc::new(SessionStoreInner {
                state: RwLock::new(SessionState { token, identity }),
                storage,
            }),
        }
    }

    /// An empty session that persists nothing beyond the process.
    #[must_use]
    pub fn in_memory() -> Self {
        Self::restore(Arc::new(MemoryStorage::new()))
    }

    /// Start a session with `token`. The identity is replaced only when one
    /// is given. A blank token is ignored, matching [`SessionStore::restore`].
    pub fn login(&self, token: &str, identity: Option<Identity>) {
        if token.trim().is_empty() {
            tracing::warn!("Ignoring login with a blank token");
            return;
        }

        {
            let mut state = self.inner.state.write();
            state.token = Some(SecretString::from(token));
            if let Some(identity) = &identity {
                state.identity = Some(identity.clone());
            }
        }

        self.persist(TOKEN_KEY, token);
        if let Some(identity) = identity {
            match serde_json::to_string(&identity) {
                Ok(raw) => self.persist(IDENTITY_KEY, &raw),
                Err(e) => tracing::warn!(error = %e, "Failed to encode identity"),
            }
        }

        tracing::info!(user_id = ?self.user_id(), "Session started");
    }

    /// End the session and erase the persisted copy. Safe to call repeatedly.
    pub fn logout(&self) {
        let had_session = {
            let mut state = self.inner.state.write();
            let had_session = state.token.is_some();
            *state = SessionState::default();
            had_session
        };

        for key in [TOKEN_KEY, IDENTITY_KEY] {
            if let Err(e) = self.inner.storage.remove(key) {
                tracing::warn!(key, error = %e, "Failed to erase persisted session");
            }
        }

        if had_session {
            tracing::info!("Session ended");
        }
    }

    /// Whether a token is held.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.inner.state.read().token.is_some()
    }

    /// Current bearer token.
    #[must_use]
    pub fn token(&self) -> Option<SecretString> {
        self.inner.state.read().token.clone()
    }

    /// `Authorization` header value for the current token.
    #[must_use]
    pub fn bearer(&self) -> Option<String> {
        self.inner
            .state
            .read()
            .token
            .as_ref()
            .map(|t| format!("Bearer {}", t.expose_secret()))
    }

    /// Identity of the logged-in user, if the backend supplied one.
    #[must_use]
    pub fn identity(&self) -> Option<Identity> {
        self.inner.state.read().identity.clone()
    }

    /// Id of the logged-in user.
    #[must_use]
    pub fn user_id(&self) -> Option<UserId> {
        self.inner.state.read().identity.as_ref().and_then(|u| u.id)
    }

    /// Whether the logged-in user passes the administrator heuristic.
    #[must_use]
    pub fn is_administrator(&self) -> bool {
        let state = self.inner.state.read();
        state.token.is_some() && state.identity.as_ref().is_some_and(Identity::is_administrator)
    }

    fn persist(&self, key: &str, value: &str) {
        if let Err(e) = self.inner.storage.set(key, value) {
            tracing::warn!(key, error = %e, "Failed to persist session");
        }
    }
}
