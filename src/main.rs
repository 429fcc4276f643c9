use std::sync::Arc;

use anyhow::Context;
use dotenvy::dotenv;
use tracing::info;

use crate::config::settings::AppConfig;
use crate::infrastructure::storage::s3::StorageService;
use crate::state::AppState;

mod app;
mod common;
mod config;
mod docs;
mod infrastructure;
mod modules;
mod routes;
mod state;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt::init();

    info!("Starting timelapse export service...");

    let config = AppConfig::new();
    let storage = StorageService::new(
        &config.minio_endpoint,
        &config.minio_access_key,
        &config.minio_secret_key,
    )
    .await;

    let state = AppState::new(config.clone(), Arc::new(storage));
    let app = app::create_app(state).await;

    let addr = format!("0.0.0.0:{}", config.server_port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("Server running on http://{}", addr);

    axum::serve(listener, app).await?;
    Ok(())
}
