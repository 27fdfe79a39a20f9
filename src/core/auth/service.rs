//! Login, registration and logout
//!
//! Thin wrappers over the gateway. Input is checked locally first, so an
//! obviously incomplete form never reaches the network.

use serde::Serialize;

use crate::core::api::{ApiError, ApiGateway, RequestOptions, Transport};
use crate::core::session::{Credentials, SessionStore};

/// Minimum password length accepted at registration
pub const MIN_PASSWORD_LENGTH: usize = 8;

pub const MISSING_FIELDS_MESSAGE: &str = "Username and password are required.";
pub const PASSWORD_TOO_SHORT_MESSAGE: &str = "Password must be at least 8 characters.";

/// Login request
#[derive(Debug, Serialize)]
struct LoginRequest<'a> {
    username: &'a str,
    password: &'a str,
}

/// Register request
#[derive(Debug, Serialize)]
struct RegisterRequest<'a> {
    username: &'a str,
    password: &'a str,
    email: &'a str,
}

/// Trim the username and make sure neither field is empty.
fn required_fields<'a>(username: &'a str, password: &'a str) -> Result<&'a str, ApiError> {
    let username = username.trim();
    if username.is_empty() || password.is_empty() {
        return Err(ApiError::api(MISSING_FIELDS_MESSAGE));
    }
    Ok(username)
}

/// Exchange a username and password for a credential pair and store it.
pub async fn login<T: Transport>(
    gateway: &ApiGateway<T>,
    session: &SessionStore,
    username: &str,
    password: &str,
) -> Result<Credentials, ApiError> {
    let username = required_fields(username, password)?;

    let options = RequestOptions::post().json(&LoginRequest { username, password })?;
    let credentials: Credentials = gateway.request_json("/auth/login", options).await?;

    session.set_credentials(credentials.clone());
    tracing::info!(username, "Logged in");

    Ok(credentials)
}

/// Create an account, then sign in with the same credentials.
///
/// Registration alone does not open a session. This assumes the backend lets
/// a new account log in straight away (no email verification step).
pub async fn register<T: Transport>(
    gateway: &ApiGateway<T>,
    session: &SessionStore,
    username: &str,
    password: &str,
    email: Option<&str>,
) -> Result<Credentials, ApiError> {
    let username = required_fields(username, password)?;
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(ApiError::api(PASSWORD_TOO_SHORT_MESSAGE));
    }

    let request = RegisterRequest {
        username,
        password,
        email: email.map(str::trim).unwrap_or_default(),
    };
    let options = RequestOptions::post().json(&request)?;
    gateway
        .request::<serde_json::Value>("/auth/register", options)
        .await?;
    tracing::info!(username, "Registered");

    login(gateway, session, username, password).await
}

/// Drop the local session. The backend is not contacted.
pub fn logout(session: &SessionStore) {
    session.clear();
    tracing::info!("Logged out");
}
