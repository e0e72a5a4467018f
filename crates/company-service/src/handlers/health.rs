//! Health check handler.

use crate::models::HealthResponse;
use crate::routes::AppState;
use axum::extract::State;
use axum::Json;
use std::sync::Arc;
use tracing::instrument;

/// Health check handler.
///
/// Pings the database and reports the result. Always answers 200 so the
/// caller can read the body.
///
/// ```json
/// {
///   "status": "healthy",
///   "database": "healthy"
/// }
/// ```
#[instrument(skip_all, name = "company.health.check")]
pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let db_healthy = match sqlx::query("SELECT 1").fetch_one(&state.pool).await {
        Ok(_) => true,
        Err(e) => {
            tracing::warn!(target: "company.health", error = %e, "Database ping failed");
            false
        }
    };

    let status = if db_healthy { "healthy" } else { "unhealthy" };

    Json(HealthResponse {
        status: status.to_string(),
        database: status.to_string(),
    })
}
