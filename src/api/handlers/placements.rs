//! Handlers for placement management endpoints.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde_json::json;
use validator::Validate;

use crate::api::dto::pagination::PaginationMeta;
use crate::api::dto::placement::{
    CreatePlacementRequest, ListPlacementsQuery, PlacementListResponse, PlacementResponse,
    UpdatePlacementRequest,
};
use crate::error::AppError;
use crate::state::AppState;

/// Creates a placement and returns its signed tracking link.
///
/// # Endpoint
///
/// `POST /api/placements`
///
/// # Request Body
///
/// ```json
/// {
///   "advertiser_id": "adv-42",
///   "publisher_id": "pub-7",
///   "send_id": "2025-06-02-weekly",
///   "price_cpc_cents": 150,
///   "landing_url": "https://shop.example.com/spring"
/// }
/// ```
///
/// # Errors
///
/// - 400 Bad Request if validation fails
/// - 409 Conflict if a live placement exists for the same advertiser, publisher and send
pub async fn create_placement_handler(
    State(state): State<AppState>,
    Json(payload): Json<CreatePlacementRequest>,
) -> Result<(StatusCode, Json<PlacementResponse>), AppError> {
    payload.validate()?;

    let placement = state
        .placement_service
        .create(
            payload.advertiser_id,
            payload.publisher_id,
            payload.send_id,
            payload.price_cpc_cents,
            payload.landing_url,
        )
        .await?;

    let tracking_link = state.placement_service.tracking_link(&placement.id);

    Ok((
        StatusCode::CREATED,
        Json(PlacementResponse::new(placement, tracking_link)),
    ))
}

/// Lists live placements, newest first.
///
/// # Endpoint
///
/// `GET /api/placements`
///
/// # Query Parameters
///
/// - `advertiser_id`, `publisher_id`, `send_id` (optional): exact-match filters
/// - `page` (optional): Page number (default: 1)
/// - `page_size` (optional): Items per page (default: 25, range: 10-1000)
///
/// # Errors
///
/// Returns 400 Bad Request if pagination parameters are invalid.
pub async fn list_placements_handler(
    State(state): State<AppState>,
    Query(query): Query<ListPlacementsQuery>,
) -> Result<Json<PlacementListResponse>, AppError> {
    let window = query
        .pagination
        .resolve()
        .map_err(|e| AppError::bad_request(e, json!({})))?;

    let (placements, total) = state
        .placement_service
        .list(&query.filter(), window.offset(), window.limit())
        .await?;

    let items = placements
        .into_iter()
        .map(|p| {
            let link = state.placement_service.tracking_link(&p.id);
            PlacementResponse::new(p, link)
        })
        .collect();

    Ok(Json(PlacementListResponse {
        pagination: PaginationMeta::new(window, total),
        items,
    }))
}

/// Returns a single placement with its tracking link and freshness.
///
/// # Endpoint
///
/// `GET /api/placements/{id}`
///
/// # Errors
///
/// Returns 404 Not Found if the placement does not exist or was deleted.
pub async fn get_placement_handler(
    Path(id): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<PlacementResponse>, AppError> {
    let placement = state.placement_service.get(&id).await?;
    let tracking_link = state.placement_service.tracking_link(&placement.id);

    Ok(Json(PlacementResponse::new(placement, tracking_link)))
}

/// Partially updates a placement.
///
/// # Endpoint
///
/// `PATCH /api/placements/{id}`
///
/// # Request Body
///
/// At least one field is required. Omitted fields are unchanged.
///
/// ```json
/// {
///   "price_cpc_cents": 175,
///   "send_id": "2025-06-09-weekly"
/// }
/// ```
///
/// The tracking link stays the same; it only signs the placement id.
///
/// # Errors
///
/// - 400 Bad Request if no field is given or validation fails
/// - 404 Not Found if the placement does not exist or was deleted
/// - 409 Conflict if another live placement has the same advertiser, publisher and send
pub async fn update_placement_handler(
    Path(id): Path<String>,
    State(state): State<AppState>,
    Json(payload): Json<UpdatePlacementRequest>,
) -> Result<Json<PlacementResponse>, AppError> {
    payload.validate()?;

    let placement = state.placement_service.update(&id, payload.into()).await?;
    let tracking_link = state.placement_service.tracking_link(&placement.id);

    Ok(Json(PlacementResponse::new(placement, tracking_link)))
}

/// Soft-deletes a placement.
///
/// # Endpoint
///
/// `DELETE /api/placements/{id}`
///
/// Clicks on the placement's tracking links are no longer billable afterwards.
///
/// # Errors
///
/// Returns 404 Not Found if the placement does not exist or is already deleted.
pub async fn delete_placement_handler(
    Path(id): Path<String>,
    State(state): State<AppState>,
) -> Result<StatusCode, AppError> {
    state.placement_service.delete(&id).await?;

    Ok(StatusCode::NO_CONTENT)
}
