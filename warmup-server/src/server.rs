use crate::handlers;
use crate::state::AppState;
use axum::{routing::get, Router};
use tower_http::trace::TraceLayer;

/// Build the HTTP server with all routes and middleware
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::warmup_handler))
        .route("/health", get(handlers::health_handler))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}
