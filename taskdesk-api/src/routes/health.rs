/// Health check and root endpoints
///
/// Both sit outside the auth gate so load balancers and uptime probes can
/// reach them without a credential.

use crate::app::AppState;
use axum::{extract::State, http::StatusCode, Json};
use serde_json::{json, Value};
use taskdesk_shared::db::pool::health_check as db_health_check;

/// Root endpoint: a plain service banner
pub async fn root() -> Json<Value> {
    Json(json!({
        "service": "taskdesk-api",
        "version": taskdesk_shared::VERSION,
    }))
}

/// Health check endpoint
///
/// Reports overall status plus database connectivity. Returns 503 when the
/// database is unreachable so orchestrators stop routing traffic here.
pub async fn health_check(State(state): State<AppState>) -> (StatusCode, Json<Value>) {
    let database = match db_health_check(&state.db).await {
        Ok(()) => "connected",
        Err(e) => {
            tracing::warn!("Health check database probe failed: {}", e);
            "disconnected"
        }
    };

    let healthy = database == "connected";
    let status = if healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (
        status,
        Json(json!({
            "status": if healthy { "healthy" } else { "unhealthy" },
            "version": taskdesk_shared::VERSION,
            "database": database,
        })),
    )
}
