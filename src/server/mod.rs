//! Axum-based HTTP server for the croply-relay service.
//!
//! This module sets up the HTTP server, wires the routes and the tower
//! middleware stack, and hosts the `/analyze` relay handler that stages an
//! uploaded image and forwards it to the inference workflow.
//!
//! # Components
//!
//! - `handlers`: `/analyze`, `/health` and `/metrics`.
//! - `middleware`: request ID tracking.
//! - `routes`: router construction, shared state and layer configuration.
//!
//! Author: kelexine (<https://github.com/kelexine>)

mod handlers;
mod middleware;
mod routes;

pub use handlers::{HealthResponse, HealthStatus, IMAGE_FIELD};
pub use routes::{create_router, AppState};
