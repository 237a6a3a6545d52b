//! Structured logging and secret-scrubbing utilities.
//!
//! This module configures the `tracing` ecosystem for the application,
//! supporting multiple output formats and providing a helper that keeps the
//! inference API key out of anything echoed back from upstream.
//!
//! Author: kelexine (<https://github.com/kelexine>)

use crate::config::LoggingConfig;
use crate::error::{RelayError, Result};
use regex::Regex;
use std::sync::OnceLock;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Lazily initialized pattern for `Authorization` header values
static AUTH_HEADER: OnceLock<Regex> = OnceLock::new();

fn auth_header_regex() -> &'static Regex {
    AUTH_HEADER.get_or_init(|| {
        Regex::new(r#"(?i)(authorization["']?\s*[:=]\s*["']?)[^"',\s}]+"#)
            .expect("Invalid regex pattern")
    })
}

/// Initializes the global tracing subscriber for the application.
///
/// Supports three output formats:
/// - `json`: Structured JSON logs for production ingestion.
/// - `compact`: Single-line human-readable output.
/// - `pretty` (default): Multi-line, colorized output for development.
///
/// Log levels are controlled via the `RUST_LOG` environment variable or
/// the provided `LoggingConfig`.
pub fn init(config: &LoggingConfig) -> Result<()> {
    // Configure filter from environment or config file
    let env_filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(&config.level).map_err(|e| {
            RelayError::Config(format!("Invalid log level '{}': {}", config.level, e))
        })?,
    };

    let registry = tracing_subscriber::registry().with(env_filter);
    let installed = match config.format.as_str() {
        "json" => registry.with(tracing_subscriber::fmt::layer().json()).try_init(),
        "compact" => registry.with(tracing_subscriber::fmt::layer().compact()).try_init(),
        _ => registry.with(tracing_subscriber::fmt::layer().pretty()).try_init(),
    };

    installed.map_err(|e| RelayError::Internal(format!("Failed to install logger: {}", e)))
}

/// Removes credentials from text that is about to be logged.
///
/// Every occurrence of each entry in `secrets` is replaced with
/// `[REDACTED]`, and the value part of anything that looks like an
/// `Authorization` header or JSON field is masked as well. Empty secrets
/// are ignored.
pub fn sanitize(input: &str, secrets: &[String]) -> String {
    let mut result = input.to_string();

    for secret in secrets.iter().filter(|s| !s.is_empty()) {
        result = result.replace(secret.as_str(), "[REDACTED]");
    }

    auth_header_regex()
        .replace_all(&result, "${1}[REDACTED]")
        .into_owned()
}
