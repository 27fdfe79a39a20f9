//! Authentication UI module
//!
//! Exposes the session to components and guards routes that need a
//! signed-in user.

mod context;
mod guard;

pub use context::{AuthContext, provide_auth_context, use_auth_context};
pub use guard::{LOGIN_PATH, RequireAuth};
