//! HTTP client for the AI inference service.
//!
//! [`UpstreamClient`] owns a pooled `reqwest::Client` built once at startup and cloned into every
//! handler. It posts JSON to a fixed path under the configured base URL and hands back the
//! upstream answer as an [`UpstreamResponse`]: status code, content type and raw body bytes,
//! never re-parsed, so the caller sees exactly what the inference service produced.
//!
//! Non-2xx statuses are ordinary responses here. Only transport failures (connection refused,
//! timeout, broken body stream) become [`Error`]s.

use axum::{
    body::Body,
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use bytes::Bytes;
use serde::Serialize;
use url::Url;

use crate::api::models::{
    detection::{DetectionRequest, DetectionType},
    text::TextRequest,
};
use crate::config::UpstreamConfig;
use crate::errors::{Error, Result};

/// Opaque upstream answer, relayed to the caller unchanged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpstreamResponse {
    pub status: StatusCode,
    /// `Content-Type` sent by the upstream, if any
    pub content_type: Option<HeaderValue>,
    pub body: Bytes,
}

impl IntoResponse for UpstreamResponse {
    fn into_response(self) -> Response {
        let content_type = self
            .content_type
            .unwrap_or_else(|| HeaderValue::from_static("application/json"));

        let mut response = Response::new(Body::from(self.body));
        *response.status_mut() = self.status;
        response.headers_mut().insert(header::CONTENT_TYPE, content_type);
        response
    }
}

/// Client for the inference service.
#[derive(Clone, Debug)]
pub struct UpstreamClient {
    client: reqwest::Client,
    base_url: Url,
}

impl UpstreamClient {
    /// Build a client with the connect and request timeouts from `config`.
    pub fn new(config: &UpstreamConfig) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .build()
            .map_err(|e| anyhow::anyhow!("Failed to build upstream HTTP client: {}", e))?;

        Ok(Self {
            client,
            base_url: config.url.clone(),
        })
    }

    /// Full URL for `path` under the base URL. A base path prefix is kept.
    pub fn url_for(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.as_str().trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    /// Run the detector named by `kind` against an image.
    pub async fn detect(&self, kind: DetectionType, request: &DetectionRequest) -> Result<UpstreamResponse> {
        self.forward(&format!("/detect/{}", kind.as_str()), request).await
    }

    /// Run keyword analysis on a piece of text.
    pub async fn analyze_text(&self, request: &TextRequest) -> Result<UpstreamResponse> {
        self.forward("/text/analyze", request).await
    }

    /// POST `body` as JSON to `path` and capture the response verbatim.
    #[tracing::instrument(skip(self, body))]
    pub async fn forward<T>(&self, path: &str, body: &T) -> Result<UpstreamResponse>
    where
        T: Serialize + ?Sized,
    {
        let url = self.url_for(path);

        tracing::debug!(url = %url, "Forwarding request upstream");

        let response = self.client.post(&url).json(body).send().await.map_err(|e| {
            tracing::error!(url = %url, error = %e, "Upstream request failed");
            Error::from_transport(&url, e)
        })?;

        let status = response.status();
        let content_type = response.headers().get(header::CONTENT_TYPE).cloned();
        let body = response.bytes().await.map_err(|e| {
            tracing::error!(url = %url, status = status.as_u16(), error = %e, "Failed to read upstream response body");
            Error::from_transport(&url, e)
        })?;

        tracing::info!(
            url = %url,
            status = status.as_u16(),
            response_len = body.len(),
            "Upstream request completed"
        );

        Ok(UpstreamResponse {
            status,
            content_type,
            body,
        })
    }
}
