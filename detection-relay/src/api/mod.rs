//! API layer for HTTP request handling and data models.
//!
//! - **[`handlers`]**: Axum route handlers for the forwarding endpoints
//! - **[`models`]**: Request data structures accepted from callers
//!
//! # API Structure
//!
//! All forwarding routes live under `/api`:
//!
//! - **Detection** (`POST /api/detect/{type}`): weapon or violence detection on a camera frame
//! - **Text** (`POST /api/text/analyze`): suspicious keyword analysis
//!
//! OpenAPI documentation is served at `/docs` when the server is running.

pub mod handlers;
pub mod models;
