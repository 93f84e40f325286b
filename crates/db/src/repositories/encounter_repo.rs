//! Repository for the `encounters` table.

use loreforge_core::types::DbId;
use sqlx::PgPool;

use crate::models::encounter::{CreateEncounter, Encounter, UpdateEncounter};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, campaign_id, name, description, is_deleted, created_at, updated_at";

/// Provides CRUD operations for encounters.
pub struct EncounterRepo;

impl EncounterRepo {
    /// Insert a new encounter under a campaign, returning the created row.
    pub async fn create(
        pool: &PgPool,
        campaign_id: DbId,
        input: &CreateEncounter,
    ) -> Result<Encounter, sqlx::Error> {
        let query = format!(
            "INSERT INTO encounters (campaign_id, name, description)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Encounter>(&query)
            .bind(campaign_id)
            .bind(&input.name)
            .bind(&input.description)
            .fetch_one(pool)
            .await
    }

    /// Find an encounter by ID. Excludes soft-deleted rows.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Encounter>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM encounters WHERE id = $1 AND is_deleted = FALSE");
        sqlx::query_as::<_, Encounter>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List a campaign's encounters, most recently created first.
    pub async fn list_by_campaign(
        pool: &PgPool,
        campaign_id: DbId,
    ) -> Result<Vec<Encounter>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM encounters
             WHERE campaign_id = $1 AND is_deleted = FALSE
             ORDER BY created_at DESC"
        );
        sqlx::query_as::<_, Encounter>(&query)
            .bind(campaign_id)
            .fetch_all(pool)
            .await
    }

    /// Update an encounter. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no live row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateEncounter,
    ) -> Result<Option<Encounter>, sqlx::Error> {
        let query = format!(
            "UPDATE encounters SET
                name = COALESCE($2, name),
                description = COALESCE($3, description),
                updated_at = NOW()
             WHERE id = $1 AND is_deleted = FALSE
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Encounter>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.description)
            .fetch_optional(pool)
            .await
    }

    /// Soft-delete an encounter. Returns `true` if a row was marked deleted.
    pub async fn soft_delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE encounters SET is_deleted = TRUE, updated_at = NOW()
             WHERE id = $1 AND is_deleted = FALSE",
        )
        .bind(id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
