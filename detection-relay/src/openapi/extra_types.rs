//! Inference service response models.
//!
//! The relay never parses upstream bodies. These types only document what the inference
//! service is known to return, so that the OpenAPI reference shows something useful.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Result of a weapon or violence detector.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
#[schema(example = json!({
    "detected": true,
    "score": 72.41,
    "riskDelta": 30,
    "message": "Weapon-like threat detected"
}))]
pub struct DetectionResult {
    /// Whether the score crossed the detector's threshold.
    pub detected: bool,
    /// Detector confidence, 0 to 100.
    pub score: f64,
    /// Amount the dashboard should add to its running risk score.
    pub risk_delta: i64,
    /// Human-readable alert text.
    pub message: String,
}

/// Result of keyword analysis on a piece of text.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
#[schema(example = json!({
    "hits": ["white powder", "buy now"],
    "score": 30,
    "riskDelta": 30,
    "summary": "Detected 2 suspicious keywords: white powder, buy now"
}))]
pub struct TextAnalysis {
    /// Suspicious keywords found in the text.
    pub hits: Vec<String>,
    /// Keyword score, 0 to 100.
    pub score: i64,
    /// Amount the dashboard should add to its running risk score.
    pub risk_delta: i64,
    pub summary: String,
}

/// Error produced by the relay itself (never by the inference service).
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[schema(example = json!({ "error": "Invalid type" }))]
pub struct ErrorResponse {
    pub error: String,
}
