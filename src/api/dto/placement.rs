//! DTOs for placement management endpoints.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::api::dto::pagination::{PaginationMeta, PaginationParams};
use crate::domain::entities::{Placement, PlacementFilter, PlacementPatch};
use crate::utils::freshness::is_fresh;

/// Request to create a placement.
#[derive(Debug, Deserialize, Validate)]
pub struct CreatePlacementRequest {
    #[validate(length(min = 1, max = 255))]
    pub advertiser_id: String,

    #[validate(length(min = 1, max = 255))]
    pub publisher_id: String,

    #[validate(length(min = 1, max = 255))]
    pub send_id: String,

    /// Price per billable click, in cents.
    #[validate(range(min = 0, message = "price_cpc_cents must be a non-negative number"))]
    pub price_cpc_cents: i64,

    /// Advertiser landing page (must be valid HTTP/HTTPS).
    #[validate(url(message = "Invalid URL format"))]
    pub landing_url: String,
}

/// Request body for `PATCH /api/placements/{id}`.
///
/// Both fields are optional, but at least one must be present.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdatePlacementRequest {
    #[validate(range(min = 0, message = "price_cpc_cents must be a non-negative number"))]
    pub price_cpc_cents: Option<i64>,

    #[validate(length(min = 1, max = 255))]
    pub send_id: Option<String>,
}

impl From<UpdatePlacementRequest> for PlacementPatch {
    fn from(request: UpdatePlacementRequest) -> Self {
        Self {
            price_cpc_cents: request.price_cpc_cents,
            send_id: request.send_id,
        }
    }
}

/// Filters and pagination for listing placements.
#[derive(Debug, Deserialize)]
pub struct ListPlacementsQuery {
    #[serde(flatten)]
    pub pagination: PaginationParams,

    pub advertiser_id: Option<String>,
    pub publisher_id: Option<String>,
    pub send_id: Option<String>,
}

impl ListPlacementsQuery {
    pub fn filter(&self) -> PlacementFilter {
        PlacementFilter {
            advertiser_id: non_empty(&self.advertiser_id),
            publisher_id: non_empty(&self.publisher_id),
            send_id: non_empty(&self.send_id),
        }
    }
}

fn non_empty(value: &Option<String>) -> Option<String> {
    value.as_ref().filter(|v| !v.is_empty()).cloned()
}

/// JSON representation of a placement.
#[derive(Debug, Serialize)]
pub struct PlacementResponse {
    pub id: String,
    pub advertiser_id: String,
    pub publisher_id: String,
    pub send_id: String,
    pub price_cpc_cents: i64,
    pub landing_url: String,
    pub tracking_link: String,
    /// Whether clicks on the tracking link can still be billed.
    pub is_fresh: bool,
    pub created_at: DateTime<Utc>,
}

impl PlacementResponse {
    pub fn new(placement: Placement, tracking_link: String) -> Self {
        Self {
            is_fresh: is_fresh(placement.created_at),
            id: placement.id,
            advertiser_id: placement.advertiser_id,
            publisher_id: placement.publisher_id,
            send_id: placement.send_id,
            price_cpc_cents: placement.price_cpc_cents,
            landing_url: placement.landing_url,
            tracking_link,
            created_at: placement.created_at,
        }
    }
}

/// Paginated list of placements.
#[derive(Debug, Serialize)]
pub struct PlacementListResponse {
    pub pagination: PaginationMeta,
    pub items: Vec<PlacementResponse>,
}
