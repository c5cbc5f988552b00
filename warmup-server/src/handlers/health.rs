use axum::Json;
use serde_json::{json, Value};

/// Health check endpoint
///
/// Reports liveness of this server only; warmed services are not probed
pub async fn health_handler() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "service": "warmup-server"
    }))
}
