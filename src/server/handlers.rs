// HTTP request handlers
// Author: kelexine (https://github.com/kelexine)

use super::routes::AppState;
use crate::error::{RelayError, Result};
use crate::metrics;
use crate::models::{AnalyzeResponse, InferenceResult};
use crate::staging::{StagedImage, Stager};
use axum::extract::multipart::{Multipart, MultipartError, MultipartRejection};
use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Instant;
use tracing::{debug, error, info, warn};

/// Multipart part that carries the image.
pub const IMAGE_FIELD: &str = "image";

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: HealthStatus,
    pub checks: HashMap<String, HealthCheck>,
    pub timestamp: String,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Unhealthy,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthCheck {
    pub status: String,
    pub message: String,
}

pub async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    let mut checks = HashMap::new();
    let mut overall_status = HealthStatus::Healthy;

    // Check configuration (never includes the key)
    let config_check = HealthCheck {
        status: "ok".to_string(),
        message: format!(
            "Workflow endpoint: {} (timeout {}s)",
            state.inference_client.workflow_url(),
            state.config.inference.timeout_seconds
        ),
    };
    checks.insert("configuration".to_string(), config_check);

    // Check that uploads can be staged
    let staging_check = match state.stager.check_writable() {
        Ok(()) => HealthCheck {
            status: "ok".to_string(),
            message: format!("Staging directory: {}", state.stager.directory().display()),
        },
        Err(message) => {
            overall_status = HealthStatus::Unhealthy;
            HealthCheck {
                status: "error".to_string(),
                message,
            }
        }
    };
    checks.insert("staging".to_string(), staging_check);

    Json(HealthResponse {
        status: overall_status,
        checks,
        timestamp: chrono::Utc::now().to_rfc3339(),
    })
}

/// Handler for `/metrics` (Prometheus text format)
pub async fn metrics_handler() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        metrics::gather_metrics(),
    )
}

/// Handler for `POST /analyze`.
///
/// Stages the `image` part, runs the inference workflow on it and returns the
/// normalized result. The staged file is gone by the time this returns,
/// whichever way the request ends.
pub async fn analyze_handler(
    State(state): State<AppState>,
    multipart: std::result::Result<Multipart, MultipartRejection>,
) -> Result<Json<AnalyzeResponse>> {
    let start = Instant::now();
    let outcome = analyze(&state, multipart).await;

    let status = match &outcome {
        Ok(_) => 200,
        Err(e) => e.status_code().as_u16(),
    };
    metrics::record_request("/analyze", status, start.elapsed().as_secs_f64());

    outcome.map(Json)
}

async fn analyze(
    state: &AppState,
    multipart: std::result::Result<Multipart, MultipartRejection>,
) -> Result<AnalyzeResponse> {
    let limit = state.config.server.max_body_bytes;
    let mut multipart = multipart.map_err(|e| {
        warn!("Rejected upload: {}", e);
        upload_error(e.status(), e.body_text(), limit)
    })?;

    let image = match stage_image(&state.stager, &mut multipart, limit).await? {
        Some(image) => image,
        None => {
            warn!("Request has no '{}' part, nothing to analyze", IMAGE_FIELD);
            return Err(RelayError::NoImage);
        }
    };
    metrics::record_upload_size(image.size());

    let outcome = state.inference_client.run_workflow(&image).await;
    release(image);

    let inference: InferenceResult = outcome.map_err(|e| {
        error!("Image analysis error: {}", e);
        e
    })?;

    let response = AnalyzeResponse::new(inference.into());
    info!(
        "Inference response received: disease='{}'",
        response.result.output_detected_disease
    );
    Ok(response)
}

/// Stream the first `image` part to disk. Other parts are skipped.
///
/// Returns `None` when there is no such part or it is empty.
async fn stage_image(
    stager: &Stager,
    multipart: &mut Multipart,
    limit: usize,
) -> Result<Option<StagedImage>> {
    let invalid_upload = |e: MultipartError| {
        warn!("Malformed multipart body: {}", e);
        upload_error(e.status(), e.body_text(), limit)
    };

    while let Some(mut field) = multipart.next_field().await.map_err(invalid_upload)? {
        if field.name() != Some(IMAGE_FIELD) {
            debug!("Skipping multipart field {:?}", field.name());
            continue;
        }

        let mut writer = stager.create(
            field.content_type().map(str::to_string),
            field.file_name().map(str::to_string),
        )?;
        while let Some(chunk) = field.chunk().await.map_err(invalid_upload)? {
            writer.write(&chunk).await?;
        }
        let staged = writer.finish().await?;

        debug!(
            "Staged '{}' ({} bytes) at {}",
            staged.file_name().unwrap_or("<unnamed>"),
            staged.size(),
            staged.path().display()
        );

        if staged.is_empty() {
            release(staged);
            return Ok(None);
        }
        return Ok(Some(staged));
    }

    Ok(None)
}

/// Delete a staged upload. A failure here never changes the response.
fn release(image: StagedImage) {
    let path = image.path().to_path_buf();
    if let Err(e) = image.close() {
        metrics::record_cleanup_failure();
        warn!("Failed to remove staged upload {}: {}", path.display(), e);
    }
}

/// A body cut off by the size limit is a 413, anything else a 400.
fn upload_error(status: StatusCode, detail: String, limit: usize) -> RelayError {
    if status == StatusCode::PAYLOAD_TOO_LARGE {
        RelayError::PayloadTooLarge { limit }
    } else {
        RelayError::InvalidUpload(detail)
    }
}
