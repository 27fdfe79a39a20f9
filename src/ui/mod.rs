pub mod auth;

pub use auth::{AuthContext, RequireAuth, provide_auth_context, use_auth_context};
