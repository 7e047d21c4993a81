use axum::{extract::State, http::StatusCode, Json};
use serde_json::{json, Value};
use tracing::warn;

use super::state::AppState;
use crate::errors::ReportError;

/// Liveness check, never touches the database
pub async fn liveness() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

pub async fn home() -> Json<Value> {
    Json(json!({
        "success": true,
        "message": "Welcome to the ReportHaus API",
    }))
}

/// Uptime plus a database round trip
pub async fn status(State(state): State<AppState>) -> (StatusCode, Json<Value>) {
    let uptime = state.started_at.elapsed().as_secs_f64();

    match state.store.ping().await {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({
                "success": true,
                "status": "OK",
                "uptime": uptime,
                "database": "up",
            })),
        ),
        Err(e) => {
            warn!(error = %e, "Database ping failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "success": false,
                    "status": "DEGRADED",
                    "uptime": uptime,
                    "database": "down",
                })),
            )
        }
    }
}

pub async fn not_found() -> ReportError {
    ReportError::NotFound
}
