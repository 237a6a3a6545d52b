// Shared helpers for relay integration tests
// Author: kelexine (https://github.com/kelexine)

#![allow(dead_code)]

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use croply_relay::config::{ApiKey, AppConfig};
use croply_relay::server::create_router;
use http_body_util::BodyExt;
use serde_json::Value;
use std::path::Path;
use tower::ServiceExt;

pub const BOUNDARY: &str = "croply-test-boundary";
pub const WORKFLOW_PATH: &str = "/croply-ai/workflows/leaf-health";
pub const API_KEY: &str = "test-api-key";

/// One multipart part: field name, optional file name, raw bytes.
pub struct Part<'a> {
    pub name: &'a str,
    pub file_name: Option<&'a str>,
    pub data: &'a [u8],
}

impl<'a> Part<'a> {
    pub fn image(data: &'a [u8]) -> Self {
        Self {
            name: "image",
            file_name: Some("leaf.jpg"),
            data,
        }
    }

    pub fn text(name: &'a str, value: &'a str) -> Self {
        Self {
            name,
            file_name: None,
            data: value.as_bytes(),
        }
    }
}

pub fn test_config(api_base_url: &str, staging_dir: &Path) -> AppConfig {
    let mut config = AppConfig::default();
    config.inference.api_base_url = api_base_url.to_string();
    config.inference.workspace = "croply-ai".to_string();
    config.inference.workflow_id = "leaf-health".to_string();
    config.inference.api_key = ApiKey::new(API_KEY);
    config.inference.timeout_seconds = 5;
    config.staging.directory = staging_dir.to_string_lossy().to_string();
    config
}

pub fn router(config: AppConfig) -> Router {
    create_router(config).expect("router should build")
}

pub fn multipart_body(parts: &[Part<'_>]) -> Vec<u8> {
    let mut body = Vec::new();
    for part in parts {
        body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
        match part.file_name {
            Some(file_name) => {
                body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n",
                        part.name, file_name
                    )
                    .as_bytes(),
                );
                body.extend_from_slice(b"Content-Type: image/jpeg\r\n");
            }
            None => {
                body.extend_from_slice(
                    format!("Content-Disposition: form-data; name=\"{}\"\r\n", part.name)
                        .as_bytes(),
                );
            }
        }
        body.extend_from_slice(b"\r\n");
        body.extend_from_slice(part.data);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());
    body
}

pub fn analyze_request(parts: &[Part<'_>]) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/analyze")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .body(Body::from(multipart_body(parts)))
        .unwrap()
}

pub async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

pub fn staged_files(dir: &Path) -> usize {
    std::fs::read_dir(dir).unwrap().count()
}
