// Client-facing response envelopes
// Author: kelexine (https://github.com/kelexine)

use super::inference::InferenceResult;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Error text for a request without an `image` part.
pub const NO_IMAGE_MESSAGE: &str = "No image uploaded.";

/// Error text for an upload over `server.max_body_bytes`.
pub const TOO_LARGE_MESSAGE: &str = "Image too large.";

/// Generic message attached to every 500 response.
pub const INTERNAL_ERROR_MESSAGE: &str = "Internal Server Error — check function logs.";

/// Body of a successful `/analyze` call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyzeResponse {
    pub success: bool,
    pub result: AnalysisResult,
}

/// Normalized view of one workflow run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub output_detected_disease: String,
    pub output_treatment_recommendation: String,
    /// The upstream body exactly as parsed.
    pub full_response: Map<String, Value>,
}

/// Body of a failed `/analyze` call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub error: String,
}

impl AnalyzeResponse {
    pub fn new(result: AnalysisResult) -> Self {
        Self {
            success: true,
            result,
        }
    }
}

impl From<InferenceResult> for AnalysisResult {
    fn from(inference: InferenceResult) -> Self {
        let output_detected_disease = inference.detected_disease().to_string();
        let output_treatment_recommendation = inference.treatment_recommendation().to_string();

        Self {
            output_detected_disease,
            output_treatment_recommendation,
            full_response: inference.into_fields(),
        }
    }
}

impl ErrorResponse {
    /// 400 body: no message, fixed error text.
    pub fn no_image() -> Self {
        Self {
            success: false,
            message: None,
            error: NO_IMAGE_MESSAGE.to_string(),
        }
    }

    /// 413 body for a streamed upload that ran past the size limit.
    pub fn too_large() -> Self {
        Self {
            success: false,
            message: None,
            error: TOO_LARGE_MESSAGE.to_string(),
        }
    }

    /// 500 body: generic message plus the failure's own text.
    pub fn internal(error: impl Into<String>) -> Self {
        Self {
            success: false,
            message: Some(INTERNAL_ERROR_MESSAGE.to_string()),
            error: error.into(),
        }
    }
}
