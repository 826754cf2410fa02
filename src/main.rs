use std::sync::Arc;

use tracing_subscriber::EnvFilter;

mod config;
mod domain;
mod engine;
mod server;

use crate::config::Settings;
use crate::server::AppState;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let settings = Settings::from_env()?;
    let client = engine::http::build_client(settings.request_timeout)?;

    let state = Arc::new(AppState::new(client));
    let app = server::router(state);

    let listener = tokio::net::TcpListener::bind(settings.bind_addr).await?;
    tracing::info!(
        addr = %settings.bind_addr,
        timeout = ?settings.request_timeout,
        "loadfire listening"
    );

    axum::serve(listener, app).await?;

    Ok(())
}
