//! API gateway
//!
//! The only path from the client to the backend. Attaches the bearer token,
//! turns every failure into an [`ApiError`] and announces session expiry.

use std::collections::BTreeMap;

use serde::Serialize;
use serde::de::DeserializeOwned;

use super::error::{ApiError, error_message};
use super::transport::{HttpRequest, HttpResponse, Method, Transport};
use crate::core::session::{SessionReader, SessionSignal};

const STATUS_UNAUTHORIZED: u16 = 401;
const STATUS_NO_CONTENT: u16 = 204;

/// Per-call overrides. Everything defaults to a plain GET.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestOptions {
    pub method: Method,
    pub body: Option<String>,
    pub headers: Vec<(String, String)>,
}

impl RequestOptions {
    pub fn new(method: Method) -> Self {
        Self {
            method,
            ..Self::default()
        }
    }

    pub fn get() -> Self {
        Self::new(Method::Get)
    }

    pub fn post() -> Self {
        Self::new(Method::Post)
    }

    pub fn put() -> Self {
        Self::new(Method::Put)
    }

    pub fn patch() -> Self {
        Self::new(Method::Patch)
    }

    pub fn delete() -> Self {
        Self::new(Method::Delete)
    }

    /// Use an already serialized payload.
    pub fn body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Serialize `value` as the JSON payload.
    pub fn json<B: Serialize + ?Sized>(self, value: &B) -> Result<Self, ApiError> {
        let body = serde_json::to_string(value)
            .map_err(|e| ApiError::api(format!("Failed to encode request: {}", e)))?;
        Ok(self.body(body))
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }
}

pub struct ApiGateway<T> {
    base: String,
    transport: T,
    session: SessionReader,
    signal: SessionSignal,
}

impl<T: Transport> ApiGateway<T> {
    pub fn new(
        base: impl Into<String>,
        transport: T,
        session: SessionReader,
        signal: SessionSignal,
    ) -> Self {
        let base = base.into().trim_end_matches('/').to_string();
        Self {
            base,
            transport,
            session,
            signal,
        }
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Send a request and decode the JSON body.
    ///
    /// Resolves to `None` for `204 No Content`, without touching the body.
    pub async fn request<R: DeserializeOwned>(
        &self,
        path: &str,
        options: RequestOptions,
    ) -> Result<Option<R>, ApiError> {
        let request = self.build_request(path, options);
        let method = request.method;

        tracing::debug!(%method, path, "API request");

        let response = self.transport.send(request).await.map_err(|e| {
            tracing::warn!(%method, path, "API request failed: {}", e);
            ApiError::from(e)
        })?;

        tracing::debug!(%method, path, status = response.status, "API response");

        self.handle_response(path, response)
    }

    /// Like [`request`](Self::request), for endpoints that always return a body.
    pub async fn request_json<R: DeserializeOwned>(
        &self,
        path: &str,
        options: RequestOptions,
    ) -> Result<R, ApiError> {
        self.request(path, options)
            .await?
            .ok_or_else(|| ApiError::api("Empty response from server"))
    }

    fn build_request(&self, path: &str, options: RequestOptions) -> HttpRequest {
        let mut headers = BTreeMap::new();
        headers.insert("content-type".to_string(), "application/json".to_string());

        for (name, value) in options.headers {
            headers.insert(name.to_ascii_lowercase(), value);
        }

        // Set last: the live credential beats any caller-supplied header.
        if let Some(token) = self.session.access_token() {
            headers.insert("authorization".to_string(), format!("Bearer {}", token));
        }

        HttpRequest {
            method: options.method,
            url: self.url(path),
            headers,
            body: options.body,
        }
    }

    fn url(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.base, path)
        } else {
            format!("{}/{}", self.base, path)
        }
    }

    fn handle_response<R: DeserializeOwned>(
        &self,
        path: &str,
        response: HttpResponse,
    ) -> Result<Option<R>, ApiError> {
        if response.status == STATUS_UNAUTHORIZED {
            tracing::warn!(path, "Backend rejected credentials");
            self.signal.emit();
            return Err(ApiError::SessionExpired);
        }

        if !response.is_success() {
            let body = serde_json::from_str::<serde_json::Value>(&response.body).ok();
            let message = error_message(body.as_ref(), response.status, &response.status_text);
            tracing::debug!(path, status = response.status, "API error: {}", message);
            return Err(ApiError::Api { message });
        }

        if response.status == STATUS_NO_CONTENT {
            return Ok(None);
        }

        serde_json::from_str(&response.body)
            .map(Some)
            .map_err(|e| ApiError::api(format!("Invalid response from server: {}", e)))
    }
}

impl<T> std::fmt::Debug for ApiGateway<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiGateway")
            .field("base", &self.base)
            .field("authenticated", &self.session.is_authenticated())
            .finish()
    }
}
