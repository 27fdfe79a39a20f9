//! HTTP transports
//!
//! The gateway speaks to the network through [`Transport`], which deals in
//! plain requests and buffered responses. `reqwest` backs native builds,
//! `gloo-net` backs the browser build.

use std::collections::BTreeMap;
use std::future::Future;
use std::sync::Arc;

use super::error::TransportError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, derive_more::Display)]
pub enum Method {
    #[default]
    #[display("GET")]
    Get,
    #[display("POST")]
    Post,
    #[display("PUT")]
    Put,
    #[display("PATCH")]
    Patch,
    #[display("DELETE")]
    Delete,
}

/// A fully built outgoing request. Header names are lowercase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: Method,
    pub url: String,
    pub headers: BTreeMap<String, String>,
    pub body: Option<String>,
}

impl HttpRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }
}

/// A response with its body already read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub status_text: String,
    pub body: String,
}

impl HttpResponse {
    pub fn new(status: u16, status_text: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            status,
            status_text: status_text.into(),
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

pub trait Transport {
    fn send(
        &self,
        request: HttpRequest,
    ) -> impl Future<Output = Result<HttpResponse, TransportError>>;
}

impl<T: Transport> Transport for Arc<T> {
    fn send(
        &self,
        request: HttpRequest,
    ) -> impl Future<Output = Result<HttpResponse, TransportError>> {
        (**self).send(request)
    }
}

#[cfg(feature = "native")]
pub use native::ReqwestTransport;

#[cfg(feature = "native")]
mod native {
    use std::time::Duration;

    use super::{HttpRequest, HttpResponse, Method, Transport};
    use crate::core::api::error::TransportError;

    #[derive(Debug, Clone)]
    pub struct ReqwestTransport {
        client: reqwest::Client,
    }

    impl ReqwestTransport {
        pub fn new(timeout: Duration) -> Result<Self, TransportError> {
            let client = reqwest::Client::builder()
                .timeout(timeout)
                .build()
                .map_err(|e| TransportError::InvalidRequest(e.to_string()))?;
            Ok(Self { client })
        }

        pub fn with_client(client: reqwest::Client) -> Self {
            Self { client }
        }
    }

    fn to_reqwest(method: Method) -> reqwest::Method {
        match method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Put => reqwest::Method::PUT,
            Method::Patch => reqwest::Method::PATCH,
            Method::Delete => reqwest::Method::DELETE,
        }
    }

    impl Transport for ReqwestTransport {
        async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
            let mut builder = self
                .client
                .request(to_reqwest(request.method), &request.url);
            for (name, value) in &request.headers {
                builder = builder.header(name.as_str(), value.as_str());
            }
            if let Some(body) = request.body {
                builder = builder.body(body);
            }

            let response = builder
                .send()
                .await
                .map_err(|e| TransportError::Network(e.to_string()))?;

            let status = response.status();
            let body = response
                .text()
                .await
                .map_err(|e| TransportError::Network(e.to_string()))?;

            Ok(HttpResponse {
                status: status.as_u16(),
                status_text: status.canonical_reason().unwrap_or_default().to_string(),
                body,
            })
        }
    }
}

#[cfg(feature = "hydrate")]
pub use browser::BrowserTransport;

#[cfg(feature = "hydrate")]
mod browser {
    use gloo_net::http::RequestBuilder;

    use super::{HttpRequest, HttpResponse, Method, Transport};
    use crate::core::api::error::TransportError;

    /// `fetch` through `gloo-net`.
    #[derive(Debug, Default, Clone, Copy)]
    pub struct BrowserTransport;

    fn to_gloo(method: Method) -> gloo_net::http::Method {
        match method {
            Method::Get => gloo_net::http::Method::GET,
            Method::Post => gloo_net::http::Method::POST,
            Method::Put => gloo_net::http::Method::PUT,
            Method::Patch => gloo_net::http::Method::PATCH,
            Method::Delete => gloo_net::http::Method::DELETE,
        }
    }

    impl Transport for BrowserTransport {
        async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
            let mut builder = RequestBuilder::new(&request.url).method(to_gloo(request.method));
            for (name, value) in &request.headers {
                builder = builder.header(name, value);
            }

            let prepared = match request.body {
                Some(body) => builder.body(body),
                None => builder.build(),
            }
            .map_err(|e| TransportError::InvalidRequest(e.to_string()))?;

            let response = prepared
                .send()
                .await
                .map_err(|e| TransportError::Network(e.to_string()))?;

            let status = response.status();
            let status_text = response.status_text();
            let body = response
                .text()
                .await
                .map_err(|e| TransportError::Network(e.to_string()))?;

            Ok(HttpResponse {
                status,
                status_text,
                body,
            })
        }
    }
}

#[cfg(test)]
pub(crate) mod mock {
    use std::collections::VecDeque;

    use parking_lot::Mutex;

    use super::{HttpRequest, HttpResponse, Transport};
    use crate::core::api::error::TransportError;

    /// Replays scripted responses and records every request it sees.
    #[derive(Debug, Default)]
    pub struct MockTransport {
        responses: Mutex<VecDeque<Result<HttpResponse, TransportError>>>,
        requests: Mutex<Vec<HttpRequest>>,
    }

    impl MockTransport {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn respond(&self, status: u16, status_text: &str, body: &str) -> &Self {
            self.responses
                .lock()
                .push_back(Ok(HttpResponse::new(status, status_text, body)));
            self
        }

        pub fn respond_json(&self, status: u16, body: serde_json::Value) -> &Self {
            self.respond(status, "", &body.to_string())
        }

        pub fn fail(&self, error: TransportError) -> &Self {
            self.responses.lock().push_back(Err(error));
            self
        }

        pub fn requests(&self) -> Vec<HttpRequest> {
            self.requests.lock().clone()
        }

        pub fn last_request(&self) -> HttpRequest {
            self.requests
                .lock()
                .last()
                .cloned()
                .expect("no request was sent")
        }

        pub fn request_count(&self) -> usize {
            self.requests.lock().len()
        }
    }

    impl Transport for MockTransport {
        async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
            self.requests.lock().push(request);
            self.responses.lock().pop_front().unwrap_or_else(|| {
                Err(TransportError::Network("no scripted response".to_string()))
            })
        }
    }
}
