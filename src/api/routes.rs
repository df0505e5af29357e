//! API route configuration.
//!
//! All API endpoints require Bearer token authentication via
//! [`crate::api::middleware::auth`].

use crate::api::handlers::{
    create_placement_handler, delete_placement_handler, get_placement_handler,
    list_placements_handler, stats_handler, update_placement_handler,
};
use crate::state::AppState;
use axum::{Router, routing::get};

/// All API routes, protected by Bearer token authentication.
///
/// # Endpoints
///
/// - `GET    /placements`        - List live placements (filtered, paginated)
/// - `POST   /placements`        - Create a placement
/// - `GET    /placements/{id}`   - Placement with tracking link and freshness
/// - `PATCH  /placements/{id}`   - Change price and/or send
/// - `DELETE /placements/{id}`   - Soft-delete a placement
/// - `GET    /stats`             - Click counters
pub fn protected_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/placements",
            get(list_placements_handler).post(create_placement_handler),
        )
        .route(
            "/placements/{id}",
            get(get_placement_handler)
                .patch(update_placement_handler)
                .delete(delete_placement_handler),
        )
        .route("/stats", get(stats_handler))
}
