use axum::extract::State;
use axum::{routing::get, Json, Router};
use serde::Serialize;

use crate::state::AppState;

/// Root liveness payload.
#[derive(Serialize)]
pub struct RootResponse {
    pub message: &'static str,
}

/// Health check response payload.
#[derive(Serialize)]
pub struct HealthResponse {
    /// Overall service status.
    pub status: &'static str,
    /// Crate version from Cargo.toml.
    pub version: &'static str,
    /// Seconds since the server started.
    pub uptime_seconds: u64,
    /// Identifier of the loaded leaf model.
    pub classifier: String,
    /// Number of advisory entries loaded.
    pub advisory_entries: usize,
}

/// GET / -- plain liveness message.
async fn root() -> Json<RootResponse> {
    Json(RootResponse {
        message: "SuperMango API is running.",
    })
}

/// GET /health -- returns service health and what was loaded at startup.
async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        uptime_seconds: state.uptime_seconds(),
        classifier: state.classifier.name().to_string(),
        advisory_entries: state.advisories.len(),
    })
}

/// Mount liveness and health routes (root level, NOT under `/api/v1`).
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health_check))
}
