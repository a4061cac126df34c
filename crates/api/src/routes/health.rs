//! Health check endpoint.

use axum::extract::State;
use axum::Json;
use chrono::Utc;
use serde::Serialize;

use crate::state::AppState;

#[derive(Serialize)]
pub struct Health {
    pub status: String,
    pub database: String,
    pub timestamp: String,
}

/// Liveness check; reports a degraded state instead of failing when the
/// database is unreachable.
pub async fn health(State(state): State<AppState>) -> Json<Health> {
    let database_ok = state.db.ping().await.is_ok();
    let (status, database) = if database_ok {
        ("healthy", "connected")
    } else {
        ("unhealthy", "disconnected")
    };

    Json(Health {
        status: status.to_string(),
        database: database.to_string(),
        timestamp: Utc::now().to_rfc3339(),
    })
}
