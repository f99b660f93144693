use axum::{Json, Router, routing::get};
use serde_json::json;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::sync::mpsc;
use tower_http::cors::{Any, CorsLayer};
use tracing::info;
use tracing_subscriber::EnvFilter;

use relaycast_server::{Coordinator, ServerConfig, SignalingService, ws_handler};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = ServerConfig::from_env();
    info!(
        "Starting signaling server (max {} viewers per room)",
        config.max_viewers
    );

    let (events_tx, events_rx) = mpsc::channel(256);
    let service = SignalingService::new(events_tx);
    let coordinator = Coordinator::new(config.max_viewers, Arc::new(service.clone()));
    tokio::spawn(coordinator.run(events_rx));

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = Router::new()
        .route("/", get(|| async { "relaycast signaling ok" }))
        .route("/health", get(|| async { Json(json!({ "ok": true })) }))
        .route("/ws", get(ws_handler))
        .layer(cors)
        .with_state(service);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    info!("Signaling server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
