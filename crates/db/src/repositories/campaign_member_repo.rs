//! Repository for the `campaign_members` table.
//!
//! Campaign role facts consumed by the permission gate: `get_user_role`
//! returns the member's role string, with `is_member` / `is_gm` as boolean
//! derivations.

use loreforge_core::roles::ROLE_GM;
use loreforge_core::types::DbId;
use sqlx::PgPool;

use crate::models::campaign::CampaignMember;

/// Provides membership and role lookups for campaigns.
pub struct CampaignMemberRepo;

impl CampaignMemberRepo {
    /// Add a member with the given role. Fails on duplicate membership
    /// (primary key violation) or unknown role (check constraint).
    pub async fn add(
        pool: &PgPool,
        campaign_id: DbId,
        user_id: DbId,
        role: &str,
    ) -> Result<CampaignMember, sqlx::Error> {
        sqlx::query_as::<_, CampaignMember>(
            "WITH inserted AS (
                INSERT INTO campaign_members (campaign_id, user_id, role)
                VALUES ($1, $2, $3)
                RETURNING campaign_id, user_id, role, joined_at
             )
             SELECT i.campaign_id, i.user_id, u.username, i.role, i.joined_at
             FROM inserted i
             JOIN users u ON u.id = i.user_id",
        )
        .bind(campaign_id)
        .bind(user_id)
        .bind(role)
        .fetch_one(pool)
        .await
    }

    /// Remove a member. Returns `true` if a row was removed.
    pub async fn remove(
        pool: &PgPool,
        campaign_id: DbId,
        user_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let result =
            sqlx::query("DELETE FROM campaign_members WHERE campaign_id = $1 AND user_id = $2")
                .bind(campaign_id)
                .bind(user_id)
                .execute(pool)
                .await?;
        Ok(result.rows_affected() > 0)
    }

    /// List a campaign's members with usernames, earliest joiner first.
    pub async fn list(pool: &PgPool, campaign_id: DbId) -> Result<Vec<CampaignMember>, sqlx::Error> {
        sqlx::query_as::<_, CampaignMember>(
            "SELECT m.campaign_id, m.user_id, u.username, m.role, m.joined_at
             FROM campaign_members m
             JOIN users u ON u.id = m.user_id
             WHERE m.campaign_id = $1
             ORDER BY m.joined_at ASC",
        )
        .bind(campaign_id)
        .fetch_all(pool)
        .await
    }

    /// The user's role in a campaign, or `None` if they are not a member.
    pub async fn get_user_role(
        pool: &PgPool,
        campaign_id: DbId,
        user_id: DbId,
    ) -> Result<Option<String>, sqlx::Error> {
        sqlx::query_scalar::<_, String>(
            "SELECT role FROM campaign_members WHERE campaign_id = $1 AND user_id = $2",
        )
        .bind(campaign_id)
        .bind(user_id)
        .fetch_optional(pool)
        .await
    }

    /// Whether the user is a member (any role) of the campaign.
    pub async fn is_member(
        pool: &PgPool,
        campaign_id: DbId,
        user_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        Ok(Self::get_user_role(pool, campaign_id, user_id)
            .await?
            .is_some())
    }

    /// Whether the user holds the GM role in the campaign.
    pub async fn is_gm(pool: &PgPool, campaign_id: DbId, user_id: DbId) -> Result<bool, sqlx::Error> {
        Ok(Self::get_user_role(pool, campaign_id, user_id)
            .await?
            .as_deref()
            == Some(ROLE_GM))
    }
}
