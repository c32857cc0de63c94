use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use std::sync::Arc;

use hopeleaks_shared::types::api::{HealthCheck, HealthResponse, HealthStatus};

use crate::store::Gateway;
use crate::AppState;

pub async fn health_check<G: Gateway>(State(state): State<Arc<AppState<G>>>) -> (StatusCode, Json<HealthResponse>) {
    let database = match state.db.ping().await {
        Ok(()) => HealthCheck::passing("database"),
        Err(e) => {
            tracing::warn!(error = %e, "health check: database unreachable");
            HealthCheck::failing("database", e.to_string())
        }
    };

    let health = HealthResponse::healthy("hopeleaks-moderation", env!("CARGO_PKG_VERSION")).with_checks(vec![database]);
    let status = match health.status {
        HealthStatus::Unhealthy => StatusCode::SERVICE_UNAVAILABLE,
        HealthStatus::Healthy | HealthStatus::Degraded => StatusCode::OK,
    };

    (status, Json(health))
}

pub async fn metrics<G: Gateway>(State(state): State<Arc<AppState<G>>>) -> String {
    state.metrics.render()
}
