//! Route table and middleware stack.

use crate::handlers::{self, AppState};
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Build the collector router.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/api/register", post(handlers::register))
        .route("/api/submit", post(handlers::submit))
        .route("/api/data", get(handlers::data))
        .route("/api/data/latest", get(handlers::latest))
        .route("/api/devices", get(handlers::devices))
        .route("/api/health", get(handlers::health))
        .route("/metrics", get(handlers::metrics))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
