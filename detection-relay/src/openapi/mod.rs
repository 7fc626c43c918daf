//! OpenAPI documentation for the relay's `/api/*` surface.
//!
//! The document is served at `/api-docs/openapi.json` and rendered with Scalar at `/docs`.

mod extra_types;

use utoipa::OpenApi;

use crate::api;
pub use extra_types::{DetectionResult, ErrorResponse, TextAnalysis};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Detection Relay",
        description = "Forwards weapon/violence detection and text analysis requests to the AI inference service."
    ),
    servers(
        (url = "/api", description = "Detection relay API")
    ),
    paths(
        api::handlers::detect::detect,
        api::handlers::text::analyze_text,
    ),
    components(
        schemas(
            api::models::detection::DetectionRequest,
            api::models::detection::DetectionType,
            api::models::text::TextRequest,
            extra_types::DetectionResult,
            extra_types::TextAnalysis,
            extra_types::ErrorResponse,
        )
    ),
    tags(
        (name = "detection", description = "Image detectors. Each call sends one camera frame to the inference service."),
        (name = "text", description = "Keyword analysis of social media text."),
    )
)]
pub struct ApiDoc;
