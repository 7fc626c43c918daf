use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};
use utoipa::ToSchema;

use crate::errors::Error;

/// Request payload for image detection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DetectionRequest {
    /// Captured frame as a data URL, e.g. `data:image/jpeg;base64,...`
    pub image_data_url: String,
}

/// Which detector the inference service should run.
///
/// Parsing is exact and case-sensitive: `Weapon` or `weapon ` are rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ToSchema)]
#[schema(rename_all = "lowercase")]
pub enum DetectionType {
    Weapon,
    Violence,
}

impl DetectionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DetectionType::Weapon => "weapon",
            DetectionType::Violence => "violence",
        }
    }
}

impl fmt::Display for DetectionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DetectionType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "weapon" => Ok(DetectionType::Weapon),
            "violence" => Ok(DetectionType::Violence),
            other => Err(Error::InvalidDetectionType { value: other.to_string() }),
        }
    }
}
