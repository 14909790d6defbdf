//! # Health Handler

use axum::Json;
use sea_orm::ConnectionTrait;

use crate::{AppState, dto::HealthResponse};

/// Liveness plus a storage ping. Never fails; a broken store is reported in
/// the body.
pub async fn health_handler(state: &AppState) -> Json<HealthResponse> {
    let database = match state.db.execute_unprepared("SELECT 1").await {
        Ok(_) => "ok",
        Err(err) => {
            tracing::warn!(error = %err, "Health check could not reach the database");
            "unavailable"
        },
    };

    Json(HealthResponse {
        status:         "ok".to_string(),
        database:       database.to_string(),
        uptime_seconds: state.start_time.elapsed().as_secs(),
    })
}
