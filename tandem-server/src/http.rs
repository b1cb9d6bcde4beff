use crate::signaling::{Relay, SignalingService, ws_handler};
use axum::routing::get;
use axum::{Json, Router};
use serde_json::json;
use std::path::Path;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;

/// Shared state for the axum handlers: the per-connection sender map and the
/// relay that owns the room registry.
#[derive(Clone)]
pub struct AppState {
    pub service: SignalingService,
    pub relay: Arc<Relay>,
}

/// Builds the full HTTP surface: the signaling WebSocket, a health probe, and
/// the static client bundle on every other path.
pub fn router(state: AppState, public_dir: &Path) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let bundle = ServeDir::new(public_dir).append_index_html_on_directories(true);

    Router::new()
        .route("/health", get(health))
        .route("/ws", get(ws_handler))
        .fallback_service(bundle)
        .layer(cors)
        .with_state(state)
}

async fn health() -> Json<serde_json::Value> {
    Json(health_payload())
}

/// Process-liveness report: status, wall-clock timestamp, and the host name
/// when the environment provides one.
pub fn health_payload() -> serde_json::Value {
    let timestamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or(0);

    json!({
        "status": "ok",
        "timestamp": timestamp,
        "instance": std::env::var("HOSTNAME").ok(),
    })
}
