//! Liveness endpoint for the project gateway.
//!
//! Mounted at the root so load balancers can poll it without an
//! `X-User-Id` header. Only the project store is checked here; segment
//! outages surface per request as degraded stats instead.

use axum::extract::State;
use axum::{routing::get, Json, Router};
use serde::Serialize;

use crate::state::AppState;

const SERVICE_NAME: &str = "linguist-api";

#[derive(Serialize)]
pub struct HealthResponse {
    /// `ok`, or `degraded` when the project store cannot be reached.
    pub status: &'static str,
    pub service: &'static str,
    pub version: &'static str,
    pub store_healthy: bool,
}

/// GET /health
async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let store_healthy = match state.projects.health_check().await {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!(error = %e, "Project store health check failed");
            false
        }
    };

    Json(HealthResponse {
        status: if store_healthy { "ok" } else { "degraded" },
        service: SERVICE_NAME,
        version: env!("CARGO_PKG_VERSION"),
        store_healthy,
    })
}

pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
