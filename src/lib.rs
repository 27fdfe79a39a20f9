//! Stacktrail - client core for the cyber checkup service
//!
//! Session handling, the API gateway every page goes through, typed backend
//! endpoints and the checkup questionnaire, usable from the browser (Leptos,
//! `hydrate` feature) or natively (`native` feature).

pub mod core;
pub mod ui;

pub use crate::core::{
    ApiError, ApiGateway, CheckupClient, Config, Credentials, RequestOptions, SessionSignal,
    SessionStatus, SessionStore, Transport,
};
