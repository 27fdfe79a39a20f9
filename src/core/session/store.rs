//! Session store
//!
//! Owns the credential pair and its persistence. Authentication status is
//! always computed from the pair, never kept on the side.

use std::sync::{Arc, Weak};

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use super::signal::{SessionSignal, SubscriptionId};
use super::storage::{ACCESS_TOKEN_KEY, REFRESH_TOKEN_KEY, TokenStorage};

/// Bearer credential pair returned by the login endpoint.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    #[serde(rename = "access")]
    pub access_token: String,
    #[serde(rename = "refresh")]
    pub refresh_token: String,
}

impl Credentials {
    pub fn new(access_token: impl Into<String>, refresh_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            refresh_token: refresh_token.into(),
        }
    }

    /// Both tokens are non-empty.
    pub fn is_complete(&self) -> bool {
        !self.access_token.is_empty() && !self.refresh_token.is_empty()
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("access_token", &"<redacted>")
            .field("refresh_token", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display)]
pub enum SessionStatus {
    #[display("anonymous")]
    Anonymous,
    #[display("authenticated")]
    Authenticated,
}

pub struct SessionStore {
    storage: Box<dyn TokenStorage>,
    credentials: RwLock<Option<Credentials>>,
    subscription: RwLock<Option<(SessionSignal, SubscriptionId)>>,
}

impl SessionStore {
    /// Build a store from whatever `storage` already holds, and clear it
    /// whenever `signal` fires.
    pub fn init(storage: impl TokenStorage + 'static, signal: &SessionSignal) -> Arc<Self> {
        let store = Arc::new(Self::detached(storage));

        let weak: Weak<Self> = Arc::downgrade(&store);
        let id = signal.subscribe(move || {
            if let Some(store) = weak.upgrade() {
                tracing::info!("Session expired, clearing credentials");
                store.clear();
            }
        });
        *store.subscription.write() = Some((signal.clone(), id));

        store
    }

    /// A store not attached to any signal.
    pub fn detached(storage: impl TokenStorage + 'static) -> Self {
        let credentials = load_credentials(&storage);
        tracing::debug!(
            restored = credentials.is_some(),
            "Session store initialized"
        );

        Self {
            storage: Box::new(storage),
            credentials: RwLock::new(credentials),
            subscription: RwLock::new(None),
        }
    }

    /// Store and persist a new pair. A pair with an empty token is no
    /// session, so it clears instead.
    pub fn set_credentials(&self, credentials: Credentials) {
        // Held across the storage calls so memory and storage change together.
        let mut current = self.credentials.write();

        if !credentials.is_complete() {
            tracing::warn!("Ignoring credential pair with an empty token");
            self.clear_locked(&mut current);
            return;
        }

        if let Err(e) = self
            .storage
            .save(ACCESS_TOKEN_KEY, &credentials.access_token)
            .and_then(|_| {
                self.storage
                    .save(REFRESH_TOKEN_KEY, &credentials.refresh_token)
            })
        {
            tracing::warn!("Failed to persist credentials: {}", e);
        }

        *current = Some(credentials);
        tracing::info!("Session authenticated");
    }

    /// Forget the credential pair. Calling it again is a no-op.
    pub fn clear(&self) {
        let mut current = self.credentials.write();
        self.clear_locked(&mut current);
    }

    fn clear_locked(&self, current: &mut Option<Credentials>) {
        for key in [ACCESS_TOKEN_KEY, REFRESH_TOKEN_KEY] {
            if let Err(e) = self.storage.remove(key) {
                tracing::warn!(key, "Failed to remove persisted token: {}", e);
            }
        }

        if current.take().is_some() {
            tracing::info!("Session cleared");
        }
    }

    pub fn credentials(&self) -> Option<Credentials> {
        self.credentials.read().clone()
    }

    pub fn access_token(&self) -> Option<String> {
        self.credentials
            .read()
            .as_ref()
            .map(|c| c.access_token.clone())
    }

    pub fn is_authenticated(&self) -> bool {
        self.credentials.read().is_some()
    }

    pub fn status(&self) -> SessionStatus {
        if self.is_authenticated() {
            SessionStatus::Authenticated
        } else {
            SessionStatus::Anonymous
        }
    }

    /// Read-only view handed to the API gateway.
    pub fn reader(self: &Arc<Self>) -> SessionReader {
        SessionReader {
            store: Arc::clone(self),
        }
    }
}

impl Drop for SessionStore {
    fn drop(&mut self) {
        if let Some((signal, id)) = self.subscription.get_mut().take() {
            signal.unsubscribe(id);
        }
    }
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore")
            .field("status", &self.status())
            .finish()
    }
}

/// Read access to a [`SessionStore`]; cannot change the credential pair.
#[derive(Debug, Clone)]
pub struct SessionReader {
    store: Arc<SessionStore>,
}

impl SessionReader {
    pub fn access_token(&self) -> Option<String> {
        self.store.access_token()
    }

    pub fn is_authenticated(&self) -> bool {
        self.store.is_authenticated()
    }
}

/// Both keys must be present; a half-written pair counts as no session.
fn load_credentials(storage: &dyn TokenStorage) -> Option<Credentials> {
    let credentials = Credentials::new(
        storage.load(ACCESS_TOKEN_KEY)?,
        storage.load(REFRESH_TOKEN_KEY)?,
    );
    credentials.is_complete().then_some(credentials)
}
