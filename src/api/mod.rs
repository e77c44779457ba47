//! HTTP/WebSocket surface for the height measurement service.
//!
//! ## Endpoints
//!
//! - `GET /` - service banner
//! - `GET /health` - liveness and service counters
//! - `WS /ws` - real-time measurement stream

pub mod dto;
pub mod state;
pub mod websocket;

use axum::{extract::State, routing::get, Json, Router};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

pub use dto::{ClientMessage, ServerMessage};
pub use state::AppState;

/// Create the service router with all endpoints.
///
/// CORS is wide open: browser clients stream webcam frames from arbitrary
/// origins during development.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(banner))
        .route("/health", get(health))
        .route("/ws", get(websocket::ws_handler))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn banner() -> Json<dto::BannerResponse> {
    Json(dto::BannerResponse {
        service: "heightsense",
        version: crate::VERSION,
        websocket: "/ws",
    })
}

async fn health(State(state): State<AppState>) -> Json<dto::HealthResponse> {
    Json(dto::HealthResponse {
        status: "ok",
        version: crate::VERSION,
        uptime_secs: state.uptime_secs(),
        active_sessions: state.active_sessions(),
        total_sessions: state.total_sessions(),
        frames_processed: state.frames_processed(),
    })
}
