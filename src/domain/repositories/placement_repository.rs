//! Repository trait for placement data access.

use crate::domain::entities::{NewPlacement, Placement, PlacementFilter, PlacementPatch};
use crate::error::AppError;
use async_trait::async_trait;

/// Repository interface for ad placements.
///
/// The click pipeline only calls [`PlacementRepository::find_by_id`]; the
/// remaining operations back the management API.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgPlacementRepository`] - PostgreSQL implementation
/// - [`crate::infrastructure::persistence::InMemoryPlacementRepository`] - Process-local store
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PlacementRepository: Send + Sync {
    /// Inserts a new placement.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] if the id is taken or a live placement
    /// already exists for the same advertiser, publisher and send.
    /// Returns [`AppError::Internal`] on storage errors.
    async fn create(&self, new_placement: NewPlacement) -> Result<Placement, AppError>;

    /// Finds a live (not soft-deleted) placement by id.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on storage errors.
    async fn find_by_id(&self, id: &str) -> Result<Option<Placement>, AppError>;

    /// Lists live placements matching `filter`, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on storage errors.
    async fn list(
        &self,
        filter: &PlacementFilter,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<Placement>, AppError>;

    /// Counts live placements matching `filter`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on storage errors.
    async fn count(&self, filter: &PlacementFilter) -> Result<i64, AppError>;

    /// Applies `patch` to a live placement.
    ///
    /// Only fields present in [`PlacementPatch`] are modified. Returns
    /// `Ok(None)` if the placement does not exist or is soft-deleted.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] if the new send id collides with another
    /// live placement for the same advertiser and publisher.
    /// Returns [`AppError::Internal`] on storage errors.
    async fn update(
        &self,
        id: &str,
        patch: PlacementPatch,
    ) -> Result<Option<Placement>, AppError>;

    /// Soft-deletes a placement by setting `deleted_at = now()`.
    ///
    /// Returns `Ok(false)` if the placement does not exist or is already deleted.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on storage errors.
    async fn soft_delete(&self, id: &str) -> Result<bool, AppError>;

    /// Checks if the backing store is reachable.
    async fn health_check(&self) -> bool;
}
