//! Health check endpoint.

use axum::{Extension, Json};
use serde_json::{json, Value};

use crate::app::AppState;

/// Liveness plus a database ping. Always 200; a broken database shows
/// up in the body so probes can stay simple.
pub async fn health_handler(Extension(state): Extension<AppState>) -> Json<Value> {
    let database = match sqlx::query("SELECT 1").execute(state.store.pool()).await {
        Ok(_) => "connected",
        Err(e) => {
            tracing::error!(error = %e, "health check database ping failed");
            "disconnected"
        }
    };

    Json(json!({
        "status": "ok",
        "database": database,
    }))
}
