//! Client core: session state, backend access and the checkup catalog

pub mod api;
pub mod auth;
pub mod client;
pub mod config;
mod endpoints;
pub mod models;
pub mod questions;
pub mod session;

pub use api::{ApiError, ApiGateway, RequestOptions, Transport};
pub use client::CheckupClient;
pub use config::Config;
pub use session::{Credentials, SessionSignal, SessionStatus, SessionStore};
