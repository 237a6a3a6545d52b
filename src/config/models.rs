//! Configuration data structures for the croply-relay service.
//!
//! This module defines the schema for the application settings, including
//! server parameters, the upstream inference workflow and its credential,
//! and where uploads are staged while a request is in flight.
//!
//! Author: kelexine (<https://github.com/kelexine>)

use serde::{Deserialize, Serialize};
use zeroize::Zeroize;

/// The root configuration object for the application.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    /// HTTP server settings (host, port, limits).
    #[serde(default)]
    pub server: ServerConfig,

    /// Upstream inference workflow settings.
    #[serde(default)]
    pub inference: InferenceConfig,

    /// Temporary upload storage.
    #[serde(default)]
    pub staging: StagingConfig,

    /// Logging and observability settings.
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Performance and resource management settings.
    #[serde(default)]
    pub performance: PerformanceConfig,
}

/// Settings for the built-in HTTP server.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// The IP address or hostname the server should bind to.
    /// Default: `127.0.0.1`
    #[serde(default = "default_host")]
    pub host: String,

    /// The port number the server should listen on.
    /// Default: `8080`
    #[serde(default = "default_port")]
    pub port: u16,

    /// Largest accepted request body in bytes.
    /// Default: `20 MiB`
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,

    /// Requests served at once; `0` removes the cap.
    /// The cap applies per route; every route gets its own slots.
    /// Default: `10`
    #[serde(default = "default_max_concurrent_requests")]
    pub max_concurrent_requests: usize,
}

/// Settings for the upstream inference workflow.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InferenceConfig {
    /// Base URL of the inference host.
    /// Default: `https://serverless.roboflow.com`
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    /// Workspace that owns the workflow.
    #[serde(default)]
    pub workspace: String,

    /// Workflow to run for every uploaded image.
    #[serde(default)]
    pub workflow_id: String,

    /// Credential sent verbatim in the `Authorization` header.
    #[serde(default)]
    pub api_key: ApiKey,

    /// Total request timeout in seconds.
    /// Default: `120`
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,

    /// TCP/TLS connect timeout in seconds.
    /// Default: `10`
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_seconds: u64,
}

/// Where uploads live between receipt and forwarding.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StagingConfig {
    /// Directory for per-request temporary files.
    /// Default: the OS temp directory.
    #[serde(default = "default_staging_directory")]
    pub directory: String,
}

/// Settings for application logging and output format.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Minimum log level (`trace`, `debug`, `info`, `warn`, `error`).
    /// Default: `info`
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Output format for logs (`pretty`, `json`, `compact`).
    /// Default: `pretty`
    #[serde(default = "default_log_format")]
    pub format: String,

    /// Whether to mask the API key and auth headers in logged upstream bodies.
    /// Default: `true`
    #[serde(default = "default_true")]
    pub sanitize_tokens: bool,
}

/// Settings for tuning application performance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PerformanceConfig {
    /// Maximum number of idle connections per host in the HTTP pool.
    /// Default: `32`
    #[serde(default = "default_pool_size")]
    pub connection_pool_size: usize,

    /// Whether to gzip JSON responses when the client accepts it.
    /// Default: `true`
    #[serde(default = "default_true")]
    pub enable_compression: bool,
}

/// Inference API key. Never printed, wiped from memory on drop.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize, Zeroize)]
#[serde(transparent)]
#[zeroize(drop)]
pub struct ApiKey(String);

impl ApiKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }
}

// Custom Debug impl that never logs the key
impl std::fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("ApiKey([REDACTED])")
    }
}

// Default trait implementations linking to custom logic

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            max_body_bytes: default_max_body_bytes(),
            max_concurrent_requests: default_max_concurrent_requests(),
        }
    }
}

impl Default for InferenceConfig {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            workspace: String::new(),
            workflow_id: String::new(),
            api_key: ApiKey::default(),
            timeout_seconds: default_timeout(),
            connect_timeout_seconds: default_connect_timeout(),
        }
    }
}

impl Default for StagingConfig {
    fn default() -> Self {
        Self {
            directory: default_staging_directory(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            sanitize_tokens: true,
        }
    }
}

impl Default for PerformanceConfig {
    fn default() -> Self {
        Self {
            connection_pool_size: default_pool_size(),
            enable_compression: true,
        }
    }
}

// Helper functions for serde defaults and shared constants
fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_max_body_bytes() -> usize {
    20 * 1024 * 1024
}

fn default_max_concurrent_requests() -> usize {
    10
}

fn default_api_base_url() -> String {
    "https://serverless.roboflow.com".to_string()
}

fn default_timeout() -> u64 {
    120
}

fn default_connect_timeout() -> u64 {
    10
}

fn default_staging_directory() -> String {
    std::env::temp_dir().to_string_lossy().to_string()
}

fn default_true() -> bool {
    true
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

fn default_pool_size() -> usize {
    32
}
