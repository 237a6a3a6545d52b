// HTTP routes configuration
// Author: kelexine (https://github.com/kelexine)

use super::handlers::{analyze_handler, health_handler, metrics_handler};
use super::middleware::request_id_layers;
use crate::config::AppConfig;
use crate::error::Result;
use crate::inference::InferenceClient;
use crate::staging::Stager;
use axum::extract::DefaultBodyLimit;
use axum::{routing::{get, post}, Router};
use std::sync::Arc;
use tower::limit::ConcurrencyLimitLayer;
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;
use tracing::debug;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub inference_client: Arc<InferenceClient>,
    pub stager: Stager,
}

/// Build the whole application once at startup. Nothing here changes at runtime.
pub fn create_router(config: AppConfig) -> Result<Router> {
    let inference_client = InferenceClient::new(&config)?;
    let stager = Stager::new(&config.staging);

    let max_body_bytes = config.server.max_body_bytes;
    let max_concurrent = config.server.max_concurrent_requests;
    let enable_compression = config.performance.enable_compression;

    let state = AppState {
        config: Arc::new(config),
        inference_client: Arc::new(inference_client),
        stager,
    };

    let (set_request_id, propagate_request_id) = request_id_layers();

    let mut app = Router::new()
        .route("/analyze", post(analyze_handler))
        .route("/health", get(health_handler))
        .route("/metrics", get(metrics_handler));

    if max_concurrent > 0 {
        debug!("Limiting to {} concurrent requests per route", max_concurrent);
        app = app.layer(ConcurrencyLimitLayer::new(max_concurrent));
    }

    if enable_compression {
        app = app.layer(CompressionLayer::new());
    }

    let app = app
        // Uploads are capped by RequestBodyLimitLayer instead of axum's 2MB default
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(max_body_bytes))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .layer(propagate_request_id)
        .layer(set_request_id)
        .with_state(state);

    Ok(app)
}
