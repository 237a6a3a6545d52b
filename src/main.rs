// croply-relay - image analysis relay for a hosted vision inference workflow
// Author: kelexine (https://github.com/kelexine)

use anyhow::Result;
use clap::Parser;
use croply_relay::cli::Args;
use croply_relay::config::AppConfig;
use croply_relay::server::create_router;
use croply_relay::utils::logging;
use std::net::SocketAddr;
use tokio::signal;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments
    let args = Args::parse();

    // Phase 1: Load configuration
    let config = AppConfig::load(&args.overrides())?;

    // Phase 2: Initialize logging
    logging::init(&config.logging)?;
    info!("Starting croply-relay v{}", env!("CARGO_PKG_VERSION"));
    info!(
        "Forwarding to workspace '{}', workflow '{}'",
        config.inference.workspace, config.inference.workflow_id
    );

    // Phase 3: Build and start HTTP server
    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;
    let app = create_router(config)?;

    info!("Starting server on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;

    // Phase 4: Run server with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shut down gracefully");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C signal");
        },
        _ = terminate => {
            info!("Received SIGTERM signal");
        },
    }
}
