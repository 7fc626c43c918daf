//! HTTP handler for text analysis.

use axum::{Json, extract::State};

use crate::{AppState, api::models::text::TextRequest, errors::Error, upstream::UpstreamResponse};

#[utoipa::path(
    post,
    path = "/text/analyze",
    tag = "text",
    summary = "Analyze text",
    description = "Forwards text to the inference service for suspicious keyword analysis.

The upstream status code and body are returned unchanged.",
    request_body = TextRequest,
    responses(
        (status = 200, description = "Analysis result, relayed from the inference service", body = crate::openapi::TextAnalysis),
        (status = 502, description = "Inference service unreachable", body = crate::openapi::ErrorResponse),
        (status = 504, description = "Inference service timed out", body = crate::openapi::ErrorResponse),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn analyze_text(State(state): State<AppState>, Json(request): Json<TextRequest>) -> Result<UpstreamResponse, Error> {
    state.upstream.analyze_text(&request).await
}
