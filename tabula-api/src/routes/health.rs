//! Health check endpoint

use axum::{extract::State, Json};

use crate::dto::HealthResponse;
use crate::state::AppState;

/// Health check endpoint (verifies database connectivity)
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let database_ok = match state.database.ping().await {
        Ok(ok) => ok,
        Err(e) => {
            tracing::warn!(error = %e, "Database health check failed");
            false
        }
    };

    let (status, database) = if database_ok {
        ("healthy", "ok")
    } else {
        ("degraded", "unavailable")
    };

    Json(HealthResponse {
        status: status.to_string(),
        version: state.version.clone(),
        database: database.to_string(),
    })
}
