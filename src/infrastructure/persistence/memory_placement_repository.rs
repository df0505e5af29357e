//! In-process placement store.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::json;
use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};
use tracing::debug;

use crate::domain::entities::{NewPlacement, Placement, PlacementFilter, PlacementPatch};
use crate::domain::repositories::PlacementRepository;
use crate::error::AppError;

/// Placement store kept in process memory.
///
/// Used when no database is configured and as the backing store for
/// integration tests. Enforces the same constraints as the PostgreSQL schema:
/// unique ids, and at most one live placement per (advertiser, publisher, send).
#[derive(Debug, Default)]
pub struct InMemoryPlacementRepository {
    placements: RwLock<HashMap<String, Placement>>,
}

impl InMemoryPlacementRepository {
    pub fn new() -> Self {
        debug!("Using in-memory placement store");
        Self::default()
    }

    /// Inserts a placement with an explicit creation time.
    ///
    /// Bypasses the uniqueness checks; intended for seeding fixtures.
    pub fn insert(&self, new_placement: NewPlacement, created_at: DateTime<Utc>) -> Placement {
        let placement = Placement {
            id: new_placement.id,
            advertiser_id: new_placement.advertiser_id,
            publisher_id: new_placement.publisher_id,
            send_id: new_placement.send_id,
            price_cpc_cents: new_placement.price_cpc_cents,
            landing_url: new_placement.landing_url,
            created_at,
            deleted_at: None,
        };

        self.placements
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(placement.id.clone(), placement.clone());

        placement
    }
}

#[async_trait]
impl PlacementRepository for InMemoryPlacementRepository {
    async fn create(&self, new_placement: NewPlacement) -> Result<Placement, AppError> {
        let mut placements = self
            .placements
            .write()
            .unwrap_or_else(PoisonError::into_inner);

        if placements.contains_key(&new_placement.id) {
            return Err(AppError::conflict(
                "Unique constraint violation",
                json!({ "constraint": "placements_pkey" }),
            ));
        }

        let duplicate = placements.values().any(|p| {
            !p.is_deleted()
                && p.advertiser_id == new_placement.advertiser_id
                && p.publisher_id == new_placement.publisher_id
                && p.send_id == new_placement.send_id
        });
        if duplicate {
            return Err(AppError::conflict(
                "Unique constraint violation",
                json!({ "constraint": "placements_live_combo_key" }),
            ));
        }

        let placement = Placement {
            id: new_placement.id,
            advertiser_id: new_placement.advertiser_id,
            publisher_id: new_placement.publisher_id,
            send_id: new_placement.send_id,
            price_cpc_cents: new_placement.price_cpc_cents,
            landing_url: new_placement.landing_url,
            created_at: Utc::now(),
            deleted_at: None,
        };
        placements.insert(placement.id.clone(), placement.clone());

        Ok(placement)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Placement>, AppError> {
        let placements = self
            .placements
            .read()
            .unwrap_or_else(PoisonError::into_inner);

        Ok(placements.get(id).filter(|p| !p.is_deleted()).cloned())
    }

    async fn list(
        &self,
        filter: &PlacementFilter,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<Placement>, AppError> {
        let placements = self
            .placements
            .read()
            .unwrap_or_else(PoisonError::into_inner);

        let mut live: Vec<Placement> = placements
            .values()
            .filter(|p| !p.is_deleted() && filter.matches(p))
            .cloned()
            .collect();
        live.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        Ok(live
            .into_iter()
            .skip(offset.max(0) as usize)
            .take(limit.max(0) as usize)
            .collect())
    }

    async fn count(&self, filter: &PlacementFilter) -> Result<i64, AppError> {
        let placements = self
            .placements
            .read()
            .unwrap_or_else(PoisonError::into_inner);

        Ok(placements
            .values()
            .filter(|p| !p.is_deleted() && filter.matches(p))
            .count() as i64)
    }

    async fn update(
        &self,
        id: &str,
        patch: PlacementPatch,
    ) -> Result<Option<Placement>, AppError> {
        let mut placements = self
            .placements
            .write()
            .unwrap_or_else(PoisonError::into_inner);

        let Some(current) = placements.get(id).filter(|p| !p.is_deleted()) else {
            return Ok(None);
        };

        let mut updated = current.clone();
        patch.apply_to(&mut updated);

        let collides = placements.values().any(|p| {
            p.id != updated.id
                && !p.is_deleted()
                && p.advertiser_id == updated.advertiser_id
                && p.publisher_id == updated.publisher_id
                && p.send_id == updated.send_id
        });
        if collides {
            return Err(AppError::conflict(
                "Unique constraint violation",
                json!({ "constraint": "placements_live_combo_key" }),
            ));
        }

        placements.insert(updated.id.clone(), updated.clone());
        Ok(Some(updated))
    }

    async fn soft_delete(&self, id: &str) -> Result<bool, AppError> {
        let mut placements = self
            .placements
            .write()
            .unwrap_or_else(PoisonError::into_inner);

        match placements.get_mut(id) {
            Some(p) if !p.is_deleted() => {
                p.deleted_at = Some(Utc::now());
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn health_check(&self) -> bool {
        true
    }
}
