//! Session state for the client
//!
//! - [`SessionStore`] owns the credential pair and its persistence
//! - [`SessionSignal`] announces session expiry to whoever listens
//! - [`TokenStorage`] backends decide where the pair is persisted

mod signal;
mod storage;
mod store;

pub use signal::{SESSION_EXPIRED_EVENT, SessionSignal, SubscriptionId};
#[cfg(feature = "hydrate")]
pub use storage::BrowserStorage;
#[cfg(feature = "native")]
pub use storage::FileStorage;
pub use storage::{
    ACCESS_TOKEN_KEY, MemoryStorage, REFRESH_TOKEN_KEY, StorageError, TokenStorage,
};
pub use store::{Credentials, SessionReader, SessionStatus, SessionStore};
