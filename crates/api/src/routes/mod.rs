pub mod health;

use axum::routing::post;
use axum::Router;

use crate::handlers;
use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// ```text
/// /prescriptions        POST multipart leaf batch + weather
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new().route("/prescriptions", post(handlers::prescription::create))
}

/// Root-level paths kept for the existing mobile client.
pub fn legacy_routes() -> Router<AppState> {
    Router::new().route("/getPrescription", post(handlers::prescription::create))
}
