//! Placement creation, retrieval, update and removal.

use std::sync::Arc;

use crate::application::services::link_signer::LinkSigner;
use crate::domain::entities::{NewPlacement, Placement, PlacementFilter, PlacementPatch};
use crate::domain::repositories::PlacementRepository;
use crate::error::AppError;
use crate::utils::id_generator::generate_placement_id;
use crate::utils::landing_url::normalize_landing_url;
use serde_json::json;

/// Service backing the placement management API.
///
/// Assigns identifiers, validates landing pages and renders signed tracking
/// links for placements.
pub struct PlacementService {
    repository: Arc<dyn PlacementRepository>,
    signer: Arc<LinkSigner>,
}

impl PlacementService {
    pub fn new(repository: Arc<dyn PlacementRepository>, signer: Arc<LinkSigner>) -> Self {
        Self { repository, signer }
    }

    /// Creates a placement with a freshly generated id.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if:
    /// - an advertiser, publisher or send id is blank
    /// - the price is negative
    /// - the landing URL is not an absolute http(s) URL
    ///
    /// Returns [`AppError::Conflict`] if a live placement already exists for
    /// the same advertiser, publisher and send.
    pub async fn create(
        &self,
        advertiser_id: String,
        publisher_id: String,
        send_id: String,
        price_cpc_cents: i64,
        landing_url: String,
    ) -> Result<Placement, AppError> {
        for (field, value) in [
            ("advertiser_id", &advertiser_id),
            ("publisher_id", &publisher_id),
            ("send_id", &send_id),
        ] {
            if value.trim().is_empty() {
                return Err(AppError::bad_request(
                    "Missing required field",
                    json!({ "field": field }),
                ));
            }
        }

        if price_cpc_cents < 0 {
            return Err(AppError::bad_request(
                "price_cpc_cents must be a non-negative number",
                json!({ "price_cpc_cents": price_cpc_cents }),
            ));
        }

        let landing_url = normalize_landing_url(&landing_url).map_err(|e| {
            AppError::bad_request("Invalid landing URL", json!({ "reason": e.to_string() }))
        })?;

        let new_placement = NewPlacement {
            id: generate_placement_id(),
            advertiser_id: advertiser_id.trim().to_string(),
            publisher_id: publisher_id.trim().to_string(),
            send_id: send_id.trim().to_string(),
            price_cpc_cents,
            landing_url,
        };

        let placement = self.repository.create(new_placement).await?;
        tracing::info!(
            placement_id = %placement.id,
            advertiser_id = %placement.advertiser_id,
            publisher_id = %placement.publisher_id,
            "Placement created"
        );

        Ok(placement)
    }

    /// Retrieves a live placement.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the placement does not exist or was deleted.
    pub async fn get(&self, id: &str) -> Result<Placement, AppError> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("Placement not found", json!({ "id": id })))
    }

    /// Returns one page of live placements and the total number of matches.
    pub async fn list(
        &self,
        filter: &PlacementFilter,
        offset: i64,
        limit: i64,
    ) -> Result<(Vec<Placement>, i64), AppError> {
        tokio::try_join!(
            self.repository.list(filter, offset, limit),
            self.repository.count(filter)
        )
    }

    /// Changes the price and/or send of a live placement.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if the patch is empty, the price is
    /// negative or the send id is blank.
    /// Returns [`AppError::NotFound`] if there is no live placement with this id.
    /// Returns [`AppError::Conflict`] if the new send id collides with another
    /// live placement for the same advertiser and publisher.
    pub async fn update(
        &self,
        id: &str,
        mut patch: PlacementPatch,
    ) -> Result<Placement, AppError> {
        if patch.is_empty() {
            return Err(AppError::bad_request(
                "At least one field (price_cpc_cents, send_id) must be provided",
                json!({}),
            ));
        }

        if let Some(price) = patch.price_cpc_cents.filter(|p| *p < 0) {
            return Err(AppError::bad_request(
                "price_cpc_cents must be a non-negative number",
                json!({ "price_cpc_cents": price }),
            ));
        }

        if let Some(send_id) = patch.send_id.take() {
            let send_id = send_id.trim();
            if send_id.is_empty() {
                return Err(AppError::bad_request(
                    "Missing required field",
                    json!({ "field": "send_id" }),
                ));
            }
            patch.send_id = Some(send_id.to_string());
        }

        let placement = self
            .repository
            .update(id, patch)
            .await?
            .ok_or_else(|| AppError::not_found("Placement not found", json!({ "id": id })))?;

        tracing::info!(
            placement_id = %placement.id,
            send_id = %placement.send_id,
            price_cpc_cents = placement.price_cpc_cents,
            "Placement updated"
        );

        Ok(placement)
    }

    /// Soft-deletes a placement; its tracking links stop billing immediately.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if there is no live placement with this id.
    pub async fn delete(&self, id: &str) -> Result<(), AppError> {
        if !self.repository.soft_delete(id).await? {
            return Err(AppError::not_found(
                "Placement not found",
                json!({ "id": id }),
            ));
        }

        tracing::info!(placement_id = %id, "Placement deleted");
        Ok(())
    }

    /// Signed tracking link for a placement id.
    pub fn tracking_link(&self, placement_id: &str) -> String {
        self.signer.tracking_link(placement_id)
    }

    pub async fn health_check(&self) -> bool {
        self.repository.health_check().await
    }
}
