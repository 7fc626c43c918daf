use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error as ThisError;

#[derive(ThisError, Debug)]
pub enum Error {
    /// Detection type path segment is not one of the supported detectors
    #[error("Invalid detection type '{value}'")]
    InvalidDetectionType { value: String },

    /// Upstream did not answer within the configured timeout
    #[error("Upstream request to {url} timed out")]
    UpstreamTimeout { url: String },

    /// Upstream could not be reached, or the connection failed mid-response
    #[error("Upstream request to {url} failed: {source}")]
    UpstreamUnavailable {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// Generic internal service error
    #[error("Failed to {operation}")]
    Internal { operation: String },

    /// Unexpected error with full context chain
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl Error {
    /// Classify a reqwest transport failure for the given upstream URL.
    pub fn from_transport(url: impl Into<String>, err: reqwest::Error) -> Self {
        let url = url.into();
        if err.is_timeout() {
            Error::UpstreamTimeout { url }
        } else {
            Error::UpstreamUnavailable { url, source: err }
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            Error::InvalidDetectionType { .. } => StatusCode::BAD_REQUEST,
            Error::UpstreamTimeout { .. } => StatusCode::GATEWAY_TIMEOUT,
            Error::UpstreamUnavailable { .. } => StatusCode::BAD_GATEWAY,
            Error::Internal { .. } | Error::Other(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Returns a user-safe error message, without leaking upstream addresses or transport details
    pub fn user_message(&self) -> String {
        match self {
            Error::InvalidDetectionType { .. } => "Invalid type".to_string(),
            Error::UpstreamTimeout { .. } => "Upstream service timed out".to_string(),
            Error::UpstreamUnavailable { .. } => "Upstream service unavailable".to_string(),
            Error::Internal { .. } | Error::Other(_) => "Internal server error".to_string(),
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match &self {
            Error::Internal { .. } | Error::Other(_) => {
                tracing::error!("Internal service error: {:#}", self);
            }
            Error::UpstreamTimeout { .. } | Error::UpstreamUnavailable { .. } => {
                tracing::warn!("Upstream error: {}", self);
            }
            Error::InvalidDetectionType { .. } => {
                tracing::debug!("Client error: {}", self);
            }
        }

        let body = json!({ "error": self.user_message() });
        (self.status_code(), Json(body)).into_response()
    }
}

/// Convert from String errors (e.g., from external functions)
impl From<String> for Error {
    fn from(msg: String) -> Self {
        Error::Internal { operation: msg }
    }
}

/// Type alias for service operation results
pub type Result<T> = std::result::Result<T, Error>;
