use anyhow::Result;
use clap::Parser;
use std::sync::Arc;
use tandem_server::config::ServerConfig;
use tandem_server::{AppState, Relay, RoomRegistry, SignalingService, router};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = ServerConfig::parse();

    let registry = Arc::new(RoomRegistry::new());
    let service = SignalingService::new();
    let relay = Arc::new(Relay::new(registry, Arc::new(service.clone())));

    let app = router(AppState { service, relay }, &config.public_dir);

    let addr = config.listen_addr();
    info!("signaling server listening on http://{}", addr);
    info!("serving client bundle from {}", config.public_dir.display());

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
