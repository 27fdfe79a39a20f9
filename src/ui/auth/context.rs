//! Auth context bridging the session store into the component tree
//!
//! The store stays the only owner of the credential pair. The context keeps a
//! revision counter that is bumped whenever the session may have changed
//! (expiry signal, login, logout), so reactive readers re-run and read the
//! store again.

use std::future::Future;
use std::sync::Arc;

use leptos::prelude::*;

use crate::core::api::ApiError;
use crate::core::session::{SessionSignal, SessionStatus, SessionStore};

/// Auth context providing authentication state and actions
#[derive(Clone)]
pub struct AuthContext {
    session: Arc<SessionStore>,
    revision: RwSignal<u64>,
    /// Loading state for auth operations
    pub loading: RwSignal<bool>,
    /// Error message from last operation
    pub error: RwSignal<Option<String>>,
}

impl AuthContext {
    /// Check if user is authenticated
    pub fn is_authenticated(&self) -> bool {
        self.revision.track();
        self.session.is_authenticated()
    }

    pub fn status(&self) -> SessionStatus {
        self.revision.track();
        self.session.status()
    }

    /// Uses untracked access since this is typically called outside reactive contexts
    pub fn access_token(&self) -> Option<String> {
        self.session.access_token()
    }

    /// Tell readers the session may have changed.
    pub fn notify_changed(&self) {
        // The expiry signal can outlive the owner that created this context.
        let _ = self.revision.try_update(|r| *r += 1);
    }

    /// Run an auth action (login, register) with loading and error tracking.
    pub async fn track<R>(
        &self,
        action: impl Future<Output = Result<R, ApiError>>,
    ) -> Result<R, ApiError> {
        self.loading.set(true);
        self.error.set(None);

        let result = action.await;

        self.loading.set(false);
        if let Err(ref e) = result {
            self.error.set(Some(e.message().to_string()));
        }
        self.notify_changed();

        result
    }

    pub fn logout(&self) {
        crate::core::auth::logout(&self.session);
        self.notify_changed();
    }

    /// Clear error message
    pub fn clear_error(&self) {
        self.error.set(None);
    }
}

/// Provide auth context to the component tree
pub fn provide_auth_context(session: Arc<SessionStore>, signal: &SessionSignal) -> AuthContext {
    let ctx = AuthContext {
        session,
        revision: RwSignal::new(0),
        loading: RwSignal::new(false),
        error: RwSignal::new(None::<String>),
    };

    let subscriber = ctx.clone();
    let id = signal.subscribe(move || subscriber.notify_changed());
    let signal = signal.clone();
    on_cleanup(move || {
        signal.unsubscribe(id);
    });

    provide_context(ctx.clone());
    ctx
}

/// Get auth context from the component tree
pub fn use_auth_context() -> AuthContext {
    expect_context::<AuthContext>()
}
