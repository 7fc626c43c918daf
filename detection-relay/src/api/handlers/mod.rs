//! HTTP request handlers for the forwarding endpoints.
//!
//! Each handler deserializes the inbound JSON, applies the little validation there is, and
//! relays the request through the shared [`crate::upstream::UpstreamClient`]. The upstream
//! status and body are returned untouched.
//!
//! # Handler Modules
//!
//! - [`detect`]: `POST /api/detect/{type}` for weapon and violence detection
//! - [`text`]: `POST /api/text/analyze` for keyword analysis
//!
//! # Error Handling
//!
//! Handlers return [`crate::errors::Error`], which renders as `{"error": "..."}` with an
//! appropriate status code.

pub mod detect;
pub mod text;
