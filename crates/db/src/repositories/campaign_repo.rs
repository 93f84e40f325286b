//! Repository for the `campaigns` table.

use loreforge_core::roles::ROLE_GM;
use loreforge_core::types::DbId;
use sqlx::PgPool;

use crate::models::campaign::{Campaign, CreateCampaign, UpdateCampaign};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str =
    "id, name, description, created_by_user_id, is_deleted, created_at, updated_at";

/// Provides CRUD operations for campaigns.
pub struct CampaignRepo;

impl CampaignRepo {
    /// Insert a new campaign and its creator's GM membership row in one
    /// transaction, returning the created campaign.
    pub async fn create(
        pool: &PgPool,
        input: &CreateCampaign,
        created_by_user_id: DbId,
    ) -> Result<Campaign, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "INSERT INTO campaigns (name, description, created_by_user_id)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        let campaign = sqlx::query_as::<_, Campaign>(&query)
            .bind(&input.name)
            .bind(&input.description)
            .bind(created_by_user_id)
            .fetch_one(&mut *tx)
            .await?;

        sqlx::query("INSERT INTO campaign_members (campaign_id, user_id, role) VALUES ($1, $2, $3)")
            .bind(campaign.id)
            .bind(created_by_user_id)
            .bind(ROLE_GM)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(campaign)
    }

    /// Find a campaign by ID. Excludes soft-deleted rows.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Campaign>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM campaigns WHERE id = $1 AND is_deleted = FALSE");
        sqlx::query_as::<_, Campaign>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List the campaigns a user belongs to, most recently created first.
    pub async fn list_for_user(pool: &PgPool, user_id: DbId) -> Result<Vec<Campaign>, sqlx::Error> {
        let query = format!(
            "SELECT c.id, c.name, c.description, c.created_by_user_id, c.is_deleted,
                    c.created_at, c.updated_at
             FROM campaigns c
             JOIN campaign_members m ON m.campaign_id = c.id
             WHERE m.user_id = $1 AND c.is_deleted = FALSE
             ORDER BY c.created_at DESC"
        );
        sqlx::query_as::<_, Campaign>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }

    /// Update a campaign. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no live row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateCampaign,
    ) -> Result<Option<Campaign>, sqlx::Error> {
        let query = format!(
            "UPDATE campaigns SET
                name = COALESCE($2, name),
                description = COALESCE($3, description),
                updated_at = NOW()
             WHERE id = $1 AND is_deleted = FALSE
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Campaign>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.description)
            .fetch_optional(pool)
            .await
    }

    /// Soft-delete a campaign. Returns `true` if a row was marked deleted.
    pub async fn soft_delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE campaigns SET is_deleted = TRUE, updated_at = NOW()
             WHERE id = $1 AND is_deleted = FALSE",
        )
        .bind(id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
