use axum::{Json, extract::State};
use sitework_api::HealthResponse;
use sitework_store::Store;

/// GET /api/health: server liveness check, including the database.
pub async fn health(State(store): State<Store>) -> Json<HealthResponse> {
    let status = match store.ping() {
        Ok(()) => "ok",
        Err(e) => {
            tracing::error!("health check: {e}");
            "degraded"
        }
    };
    Json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}
