//! PostgreSQL implementation of placement repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use std::sync::Arc;

use crate::domain::entities::{NewPlacement, Placement, PlacementFilter, PlacementPatch};
use crate::domain::repositories::PlacementRepository;
use crate::error::AppError;

const PLACEMENT_COLUMNS: &str = "id, advertiser_id, publisher_id, send_id, price_cpc_cents, \
                                 landing_url, created_at, deleted_at";

/// Row shape of the `placements` table.
#[derive(Debug, FromRow)]
struct PlacementRow {
    id: String,
    advertiser_id: String,
    publisher_id: String,
    send_id: String,
    price_cpc_cents: i64,
    landing_url: String,
    created_at: DateTime<Utc>,
    deleted_at: Option<DateTime<Utc>>,
}

impl From<PlacementRow> for Placement {
    fn from(r: PlacementRow) -> Self {
        Placement {
            id: r.id,
            advertiser_id: r.advertiser_id,
            publisher_id: r.publisher_id,
            send_id: r.send_id,
            price_cpc_cents: r.price_cpc_cents,
            landing_url: r.landing_url,
            created_at: r.created_at,
            deleted_at: r.deleted_at,
        }
    }
}

/// PostgreSQL repository for placements.
///
/// Uses soft delete: `deleted_at IS NOT NULL` means deleted. Uniqueness of
/// live (advertiser, publisher, send) combinations is enforced by a partial
/// unique index, so a concurrent duplicate insert surfaces as
/// [`AppError::Conflict`].
pub struct PgPlacementRepository {
    pool: Arc<PgPool>,
}

impl PgPlacementRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PlacementRepository for PgPlacementRepository {
    async fn create(&self, new_placement: NewPlacement) -> Result<Placement, AppError> {
        let sql = format!(
            "INSERT INTO placements (id, advertiser_id, publisher_id, send_id, price_cpc_cents, landing_url) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             RETURNING {PLACEMENT_COLUMNS}"
        );

        let row = sqlx::query_as::<_, PlacementRow>(&sql)
            .bind(&new_placement.id)
            .bind(&new_placement.advertiser_id)
            .bind(&new_placement.publisher_id)
            .bind(&new_placement.send_id)
            .bind(new_placement.price_cpc_cents)
            .bind(&new_placement.landing_url)
            .fetch_one(self.pool.as_ref())
            .await?;

        Ok(row.into())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Placement>, AppError> {
        let sql =
            format!("SELECT {PLACEMENT_COLUMNS} FROM placements WHERE id = $1 AND deleted_at IS NULL");

        let row = sqlx::query_as::<_, PlacementRow>(&sql)
            .bind(id)
            .fetch_optional(self.pool.as_ref())
            .await?;

        Ok(row.map(Placement::from))
    }

    async fn list(
        &self,
        filter: &PlacementFilter,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<Placement>, AppError> {
        let sql = format!(
            "SELECT {PLACEMENT_COLUMNS} FROM placements \
             WHERE deleted_at IS NULL \
               AND ($1::text IS NULL OR advertiser_id = $1) \
               AND ($2::text IS NULL OR publisher_id = $2) \
               AND ($3::text IS NULL OR send_id = $3) \
             ORDER BY created_at DESC \
             LIMIT $4 OFFSET $5"
        );

        let rows = sqlx::query_as::<_, PlacementRow>(&sql)
            .bind(filter.advertiser_id.as_deref())
            .bind(filter.publisher_id.as_deref())
            .bind(filter.send_id.as_deref())
            .bind(limit)
            .bind(offset)
            .fetch_all(self.pool.as_ref())
            .await?;

        Ok(rows.into_iter().map(Placement::from).collect())
    }

    async fn count(&self, filter: &PlacementFilter) -> Result<i64, AppError> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM placements \
             WHERE deleted_at IS NULL \
               AND ($1::text IS NULL OR advertiser_id = $1) \
               AND ($2::text IS NULL OR publisher_id = $2) \
               AND ($3::text IS NULL OR send_id = $3)",
        )
        .bind(filter.advertiser_id.as_deref())
        .bind(filter.publisher_id.as_deref())
        .bind(filter.send_id.as_deref())
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(count)
    }

    async fn update(
        &self,
        id: &str,
        patch: PlacementPatch,
    ) -> Result<Option<Placement>, AppError> {
        let sql = format!(
            "UPDATE placements SET \
                 price_cpc_cents = COALESCE($2::BIGINT, price_cpc_cents), \
                 send_id         = COALESCE($3::TEXT, send_id) \
             WHERE id = $1 AND deleted_at IS NULL \
             RETURNING {PLACEMENT_COLUMNS}"
        );

        let row = sqlx::query_as::<_, PlacementRow>(&sql)
            .bind(id)
            .bind(patch.price_cpc_cents)
            .bind(patch.send_id)
            .fetch_optional(self.pool.as_ref())
            .await?;

        Ok(row.map(Placement::from))
    }

    async fn soft_delete(&self, id: &str) -> Result<bool, AppError> {
        let result = sqlx::query(
            "UPDATE placements SET deleted_at = NOW() WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .execute(self.pool.as_ref())
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn health_check(&self) -> bool {
        sqlx::query("SELECT 1")
            .execute(self.pool.as_ref())
            .await
            .is_ok()
    }
}
