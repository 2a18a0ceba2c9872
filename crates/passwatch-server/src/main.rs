//! Passwatch server - route and mountain pass conditions aggregation

use anyhow::Result;
use axum::routing::get;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use passwatch_server::config::Config;
use passwatch_server::loops;
use passwatch_server::{api, state::AppState};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("passwatch_server=debug".parse()?),
        )
        .init();

    tracing::info!("Starting passwatch server...");

    let config = Config::from_env();
    let port = config.server_port;
    let state = Arc::new(AppState::from_config(config));

    // Background eviction of expired summaries
    tokio::spawn(loops::summary_prune_loop::run_summary_prune_loop(
        state.clone(),
    ));

    // Build the app
    let app = api::routes()
        .route("/health", get(|| async { "OK" }))
        .with_state(state)
        .layer(CorsLayer::permissive());

    // Run server
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
