//! Client facade
//!
//! Wires one signal, one session store and one gateway together so callers
//! get a ready-to-use client from a config, a transport and a storage backend.

use std::sync::Arc;

use crate::core::api::{ApiError, ApiGateway, Transport};
use crate::core::auth;
use crate::core::config::Config;
use crate::core::session::{Credentials, SessionSignal, SessionStatus, SessionStore, TokenStorage};

pub struct CheckupClient<T> {
    signal: SessionSignal,
    session: Arc<SessionStore>,
    gateway: ApiGateway<T>,
}

impl<T: Transport> CheckupClient<T> {
    pub fn new(config: &Config, transport: T, storage: impl TokenStorage + 'static) -> Self {
        let signal = SessionSignal::new();
        let session = SessionStore::init(storage, &signal);
        let gateway = ApiGateway::new(
            config.api_base.clone(),
            transport,
            session.reader(),
            signal.clone(),
        );

        tracing::debug!(
            api_base = %config.api_base,
            status = %session.status(),
            "Client ready"
        );

        Self {
            signal,
            session,
            gateway,
        }
    }

    pub async fn login(&self, username: &str, password: &str) -> Result<Credentials, ApiError> {
        auth::login(&self.gateway, &self.session, username, password).await
    }

    pub async fn register(
        &self,
        username: &str,
        password: &str,
        email: Option<&str>,
    ) -> Result<Credentials, ApiError> {
        auth::register(&self.gateway, &self.session, username, password, email).await
    }

    pub fn logout(&self) {
        auth::logout(&self.session);
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.is_authenticated()
    }

    pub fn status(&self) -> SessionStatus {
        self.session.status()
    }

    pub fn gateway(&self) -> &ApiGateway<T> {
        &self.gateway
    }

    pub fn session(&self) -> &Arc<SessionStore> {
        &self.session
    }

    pub fn signal(&self) -> &SessionSignal {
        &self.signal
    }
}

#[cfg(feature = "native")]
impl CheckupClient<crate::core::api::ReqwestTransport> {
    /// reqwest transport with the session persisted to `config.session_file`.
    pub fn native(config: &Config) -> Result<Self, ApiError> {
        let transport = crate::core::api::ReqwestTransport::new(config.request_timeout())?;
        let storage = crate::core::session::FileStorage::new(config.session_file.clone());
        Ok(Self::new(config, transport, storage))
    }
}

#[cfg(feature = "hydrate")]
impl CheckupClient<crate::core::api::BrowserTransport> {
    /// `fetch` transport with the session persisted to `localStorage`.
    pub fn browser() -> Self {
        console_error_panic_hook::set_once();
        Self::new(
            &Config::build_default(),
            crate::core::api::BrowserTransport,
            crate::core::session::BrowserStorage,
        )
    }
}
