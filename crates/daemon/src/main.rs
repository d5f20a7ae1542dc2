use axum::{response::Json, routing::get, Router};
use serde::Serialize;
use std::{net::SocketAddr, path::PathBuf, sync::Arc};
use tower_http::cors::{Any, CorsLayer};
use tracing::{info, level_filters::LevelFilter};
use tracing_subscriber;

mod api;
mod media;
mod session;
mod ttsfx;
mod vision;

#[derive(Serialize)]
struct HealthResponse {
    ok: bool,
    version: &'static str,
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        ok: true,
        version: "0.1.0",
    })
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(LevelFilter::INFO)
        .init();

    // Session working directories (copied videos, generated clips, renders)
    // live under one root; everything in it is process-lifetime scratch.
    let workdir = PathBuf::from(".cache/autofoley");
    std::fs::create_dir_all(&workdir)?;
    let store = Arc::new(session::SessionStore::new(workdir));
    info!("Session store initialized");

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = Router::new()
        .route("/health", get(health))
        .nest("/api", api::router(store))
        .layer(cors);

    let addr = SocketAddr::from(([127, 0, 0, 1], 7878));
    info!("Starting auto-foley daemon on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
