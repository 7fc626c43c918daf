use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Request payload for text analysis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct TextRequest {
    /// Text to scan, e.g. a social media post
    pub text: String,
}
