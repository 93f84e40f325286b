//! Campaign and campaign-membership models and DTOs.

use loreforge_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A campaign row from the `campaigns` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Campaign {
    pub id: DbId,
    pub name: String,
    pub description: Option<String>,
    pub created_by_user_id: DbId,
    pub is_deleted: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new campaign.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateCampaign {
    pub name: String,
    pub description: Option<String>,
}

/// DTO for updating an existing campaign. All fields are optional.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateCampaign {
    pub name: Option<String>,
    pub description: Option<String>,
}

/// A membership row joined with the member's username for listings.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct CampaignMember {
    pub campaign_id: DbId,
    pub user_id: DbId,
    pub username: String,
    pub role: String,
    pub joined_at: Timestamp,
}
