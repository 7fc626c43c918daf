//! HTTP handler for image detection.

use axum::{
    Json,
    extract::{Path, State},
};

use crate::{
    AppState,
    api::models::detection::{DetectionRequest, DetectionType},
    errors::Error,
    upstream::UpstreamResponse,
};

#[utoipa::path(
    post,
    path = "/detect/{type}",
    tag = "detection",
    summary = "Run a detector",
    description = "Forwards a captured frame to the inference service detector named by `type`.

The upstream status code and body are returned unchanged.",
    request_body = DetectionRequest,
    params(
        ("type" = DetectionType, Path, description = "Detector to run: `weapon` or `violence`"),
    ),
    responses(
        (status = 200, description = "Detector result, relayed from the inference service", body = crate::openapi::DetectionResult),
        (status = 400, description = "Unknown detection type", body = crate::openapi::ErrorResponse),
        (status = 502, description = "Inference service unreachable", body = crate::openapi::ErrorResponse),
        (status = 504, description = "Inference service timed out", body = crate::openapi::ErrorResponse),
    )
)]
#[tracing::instrument(skip_all, fields(detection_type = %detection_type))]
pub async fn detect(
    State(state): State<AppState>,
    Path(detection_type): Path<String>,
    Json(request): Json<DetectionRequest>,
) -> Result<UpstreamResponse, Error> {
    let kind: DetectionType = detection_type.parse()?;
    state.upstream.detect(kind, &request).await
}
