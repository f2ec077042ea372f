use axum::extract::State;
use axum::Json;
use tracing::{debug, instrument, trace, warn};

use crate::schemas::{AppState, HealthResponse};

/// Health check endpoint.
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse)
    ),
    tag = "health"
)]
#[instrument(skip(state))]
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    trace!("Health check requested");

    let database_status = match state.db.ping().await {
        Ok(_) => {
            debug!("Database ping successful");
            "connected".to_string()
        }
        Err(e) => {
            warn!("Database ping failed: {}", e);
            "disconnected".to_string()
        }
    };

    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        database: database_status,
    })
}
