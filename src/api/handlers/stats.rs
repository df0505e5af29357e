//! Handler for click counters.

use axum::{Json, extract::State};

use crate::api::dto::stats::StatsResponse;
use crate::state::AppState;

/// Returns the click counters accumulated since process start.
///
/// # Endpoint
///
/// `GET /api/stats`
///
/// # Response
///
/// ```json
/// {
///   "total_clicks": 120,
///   "unique_clicks": 97,
///   "failed_clicks": 23
/// }
/// ```
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    Json(state.click_service.counters().snapshot().into())
}
