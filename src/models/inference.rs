// Upstream inference response model
// Author: kelexine (https://github.com/kelexine)

use crate::error::{RelayError, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Fallback when neither disease field is present.
pub const DEFAULT_DISEASE: &str = "Unknown Disease";

/// Fallback when neither recommendation field is present.
pub const DEFAULT_RECOMMENDATION: &str = "No recommendation available.";

const DISEASE_KEYS: [&str; 2] = ["output_detected_disease", "disease"];
const RECOMMENDATION_KEYS: [&str; 2] = ["output_treatment_recommendation", "recommendation"];

/// Parsed body of a workflow run.
///
/// The workflow output has no fixed schema. Two fields are read by name with
/// fallbacks; everything else is kept verbatim so it can be handed back to
/// the caller untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InferenceResult {
    fields: Map<String, Value>,
}

impl InferenceResult {
    /// Parse a raw response body. Anything other than a JSON object is rejected.
    ///
    /// The first deployment answered a non-object body with 200, the default
    /// strings and the raw value as `full_response`. Here it becomes
    /// [`RelayError::InvalidResponse`], which the caller sees as a 500.
    pub fn from_slice(body: &[u8]) -> Result<Self> {
        match serde_json::from_slice::<Value>(body)? {
            Value::Object(fields) => Ok(Self { fields }),
            other => Err(RelayError::InvalidResponse(format!(
                "expected a JSON object, got {}",
                json_kind(&other)
            ))),
        }
    }

    /// Disease label: `output_detected_disease`, then `disease`, then [`DEFAULT_DISEASE`].
    pub fn detected_disease(&self) -> &str {
        self.first_present(&DISEASE_KEYS).unwrap_or(DEFAULT_DISEASE)
    }

    /// Treatment text: `output_treatment_recommendation`, then `recommendation`,
    /// then [`DEFAULT_RECOMMENDATION`].
    pub fn treatment_recommendation(&self) -> &str {
        self.first_present(&RECOMMENDATION_KEYS)
            .unwrap_or(DEFAULT_RECOMMENDATION)
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    pub fn into_fields(self) -> Map<String, Value> {
        self.fields
    }

    /// A key counts only when it holds a non-empty string.
    fn first_present(&self, keys: &[&str]) -> Option<&str> {
        keys.iter()
            .filter_map(|key| self.fields.get(*key).and_then(Value::as_str))
            .find(|value| !value.is_empty())
    }
}

impl From<Map<String, Value>> for InferenceResult {
    fn from(fields: Map<String, Value>) -> Self {
        Self { fields }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
