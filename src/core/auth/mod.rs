//! Client-side authentication flows
//!
//! - Login with username and password, storing the returned credential pair
//! - Registration followed by an immediate login
//! - Local logout

pub mod service;

pub use service::{
    MIN_PASSWORD_LENGTH, MISSING_FIELDS_MESSAGE, PASSWORD_TOO_SHORT_MESSAGE, login, logout,
    register,
};
