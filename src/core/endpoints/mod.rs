//! Typed backend endpoints, added as methods on [`ApiGateway`](crate::core::api::ApiGateway)
//!
//! Each wrapper only builds a path and payload; scoring, reports and ticket
//! creation all happen on the backend.

mod assessments;
mod integrations;
mod orgs;
