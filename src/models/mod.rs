//! Data models for the relay.
//!
//! - `inference`: the body returned by the upstream vision workflow, read as
//!   a partial schema over an opaque JSON object.
//! - `response`: the stable envelopes returned to callers of `/analyze`.

// Author: kelexine (https://github.com/kelexine)

pub mod inference;
pub mod response;

pub use inference::InferenceResult;
pub use response::{AnalysisResult, AnalyzeResponse, ErrorResponse};
