// Inference workflow client
// Author: kelexine (https://github.com/kelexine)

use crate::config::AppConfig;
use crate::error::{RelayError, Result};
use crate::metrics;
use crate::models::InferenceResult;
use crate::staging::StagedImage;
use crate::utils::logging::sanitize;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Body, Client};
use std::time::{Duration, Instant};
use tracing::{debug, error, info, warn};

/// Client for the hosted vision workflow.
///
/// One POST per analyzed image: the staged bytes are streamed as the raw
/// request body and the JSON object that comes back is returned as-is.
/// Failures are final; nothing here retries.
pub struct InferenceClient {
    http_client: Client,
    workflow_url: String,
    /// Secrets scrubbed from upstream bodies before they reach the logs.
    redact: Vec<String>,
}

impl InferenceClient {
    /// Build the HTTP client and resolve the workflow URL.
    ///
    /// The API key is installed once as a sensitive default header so it
    /// never shows up in request debug output.
    pub fn new(config: &AppConfig) -> Result<Self> {
        let inference = &config.inference;

        let mut auth = HeaderValue::from_str(inference.api_key.expose())
            .map_err(|e| RelayError::Config(format!("API key is not a valid header value: {}", e)))?;
        auth.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, auth);

        let http_client = Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(inference.timeout_seconds))
            .connect_timeout(Duration::from_secs(inference.connect_timeout_seconds))
            .pool_max_idle_per_host(config.performance.connection_pool_size)
            .pool_idle_timeout(Duration::from_secs(90))
            .tcp_keepalive(Some(Duration::from_secs(60)))
            .use_rustls_tls()
            .build()
            .map_err(|e| RelayError::Internal(format!("Failed to create HTTP client: {}", e)))?;

        let workflow_url = workflow_url(
            &inference.api_base_url,
            &inference.workspace,
            &inference.workflow_id,
        );
        debug!("Inference workflow endpoint: {}", workflow_url);

        let redact = if config.logging.sanitize_tokens {
            vec![inference.api_key.expose().to_string()]
        } else {
            Vec::new()
        };

        Ok(Self {
            http_client,
            workflow_url,
            redact,
        })
    }

    /// Endpoint every image is posted to.
    pub fn workflow_url(&self) -> &str {
        &self.workflow_url
    }

    /// Run the workflow on one staged image.
    pub async fn run_workflow(&self, image: &StagedImage) -> Result<InferenceResult> {
        let file = image.open()?;

        info!(
            "Uploading image to inference workflow ({} bytes, {})",
            image.size(),
            image.content_type().unwrap_or("unknown type")
        );

        let start = Instant::now();
        let response = self
            .http_client
            .post(&self.workflow_url)
            .header(CONTENT_TYPE, "application/octet-stream")
            .body(Body::from(file))
            .send()
            .await
            .map_err(|e| {
                metrics::record_inference_call("transport_error", start.elapsed().as_secs_f64());
                error!("Inference request could not be sent: {}", e);
                RelayError::Http(e)
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = match response.text().await {
                Ok(text) => text,
                Err(e) => {
                    warn!("Failed to read inference error body: {}", e);
                    String::new()
                }
            };
            metrics::record_inference_call("upstream_error", start.elapsed().as_secs_f64());
            error!(
                "Inference API error: HTTP {} - Response body: {}",
                status,
                self.scrub(&error_text)
            );
            return Err(RelayError::Upstream {
                status: status.as_u16(),
                body: error_text,
            });
        }

        let body = response.bytes().await.map_err(|e| {
            metrics::record_inference_call("transport_error", start.elapsed().as_secs_f64());
            error!("Failed to read inference response body: {}", e);
            RelayError::Http(e)
        })?;
        metrics::record_inference_call("success", start.elapsed().as_secs_f64());

        let result = InferenceResult::from_slice(&body).map_err(|e| {
            error!("Failed to parse inference response: {}", e);
            error!(
                "Response body (first 500 chars): {}",
                self.scrub(&String::from_utf8_lossy(&body).chars().take(500).collect::<String>())
            );
            e
        })?;

        debug!(
            "Inference response received in {:?} with {} top-level fields",
            start.elapsed(),
            result.fields().len()
        );
        Ok(result)
    }

    fn scrub(&self, text: &str) -> String {
        sanitize(text, &self.redact)
    }
}

/// `{base}/{workspace}/workflows/{workflow}` with both path segments escaped.
fn workflow_url(base: &str, workspace: &str, workflow_id: &str) -> String {
    format!(
        "{}/{}/workflows/{}",
        base.trim_end_matches('/'),
        urlencoding::encode(workspace),
        urlencoding::encode(workflow_id)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ApiKey;

    #[test]
    fn test_workflow_url() {
        assert_eq!(
            workflow_url("https://serverless.roboflow.com", "croply-ai", "leaf-health"),
            "https://serverless.roboflow.com/croply-ai/workflows/leaf-health"
        );
    }

    #[test]
    fn test_workflow_url_trims_and_escapes() {
        assert_eq!(
            workflow_url("http://localhost:9001/", "my space", "flow/2"),
            "http://localhost:9001/my%20space/workflows/flow%2F2"
        );
    }

    #[test]
    fn test_client_rejects_unprintable_key() {
        let mut config = AppConfig::default();
        config.inference.api_key = ApiKey::new("bad\nkey");
        assert!(matches!(
            InferenceClient::new(&config),
            Err(RelayError::Config(_))
        ));
    }
}
