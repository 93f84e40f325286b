//! Encounter entity model and DTOs.

use loreforge_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// An encounter row from the `encounters` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Encounter {
    pub id: DbId,
    pub campaign_id: DbId,
    pub name: String,
    pub description: Option<String>,
    pub is_deleted: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new encounter.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateEncounter {
    pub name: String,
    pub description: Option<String>,
}

/// DTO for updating an existing encounter. All fields are optional.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateEncounter {
    pub name: Option<String>,
    pub description: Option<String>,
}
