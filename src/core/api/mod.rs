//! Backend access
//!
//! [`ApiGateway`] is the single choke point for backend calls; transports and
//! error normalization live alongside it.

mod error;
mod gateway;
mod transport;

pub use error::{
    ApiError, EXTRACTORS, Extractor, SESSION_EXPIRED_MESSAGE, TransportError, error_message,
};
pub use gateway::{ApiGateway, RequestOptions};
#[cfg(feature = "hydrate")]
pub use transport::BrowserTransport;
#[cfg(feature = "native")]
pub use transport::ReqwestTransport;
pub use transport::{HttpRequest, HttpResponse, Method, Transport};

#[cfg(test)]
pub(crate) use transport::mock::MockTransport;
