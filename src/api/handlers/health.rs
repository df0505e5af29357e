//! Handler for health check endpoint.

use axum::{Json, extract::State, http::StatusCode};

use crate::api::dto::health::{CheckStatus, HealthChecks, HealthResponse};
use crate::state::AppState;

/// Returns service health status with component checks.
///
/// # Endpoint
///
/// `GET /health`
///
/// # Response Codes
///
/// - **200 OK**: All components healthy
/// - **503 Service Unavailable**: One or more components degraded
///
/// # Components Checked
///
/// 1. **Placement store**: PostgreSQL `SELECT 1` (always ok in memory)
/// 2. **Click registry**: Redis PING (always ok in memory)
///
/// # Response
///
/// ```json
/// {
///   "status": "healthy",
///   "version": "0.1.0",
///   "checks": {
///     "placement_store": { "status": "ok", "message": "Connected" },
///     "click_registry": { "status": "ok", "message": "Connected (redis)" }
///   }
/// }
/// ```
pub async fn health_handler(
    State(state): State<AppState>,
) -> Result<Json<HealthResponse>, (StatusCode, Json<HealthResponse>)> {
    let (store_check, registry_check) =
        tokio::join!(check_placement_store(&state), check_click_registry(&state));

    let all_healthy = store_check.is_ok() && registry_check.is_ok();

    let response = HealthResponse {
        status: if all_healthy { "healthy" } else { "degraded" }.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        checks: HealthChecks {
            placement_store: store_check,
            click_registry: registry_check,
        },
    };

    if all_healthy {
        Ok(Json(response))
    } else {
        Err((StatusCode::SERVICE_UNAVAILABLE, Json(response)))
    }
}

async fn check_placement_store(state: &AppState) -> CheckStatus {
    if state.placement_service.health_check().await {
        CheckStatus::ok("Connected")
    } else {
        CheckStatus::error("Placement store unreachable")
    }
}

async fn check_click_registry(state: &AppState) -> CheckStatus {
    let registry = state.click_service.registry();

    if registry.health_check().await {
        CheckStatus::ok(format!("Connected ({})", registry.backend()))
    } else {
        CheckStatus::error(format!("Click registry unreachable ({})", registry.backend()))
    }
}
