//! Handlers for the `/campaigns` resource, including membership management.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use loreforge_core::error::CoreError;
use loreforge_core::roles::is_valid_role;
use loreforge_core::types::DbId;
use serde::Deserialize;

use loreforge_db::models::campaign::{Campaign, CampaignMember, CreateCampaign, UpdateCampaign};
use loreforge_db::repositories::{CampaignMemberRepo, CampaignRepo};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

fn campaign_not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "Campaign",
        id,
    })
}

/// Require campaign membership, or 404 so non-members cannot probe for
/// existence.
async fn require_member(state: &AppState, campaign_id: DbId, user: &AuthUser) -> AppResult<()> {
    if user.is_admin || CampaignMemberRepo::is_member(&state.pool, campaign_id, user.user_id).await?
    {
        Ok(())
    } else {
        Err(campaign_not_found(campaign_id))
    }
}

/// Require the GM role (or admin), or 403.
async fn require_gm(state: &AppState, campaign_id: DbId, user: &AuthUser) -> AppResult<()> {
    if user.is_admin || CampaignMemberRepo::is_gm(&state.pool, campaign_id, user.user_id).await? {
        Ok(())
    } else {
        Err(AppError::Core(CoreError::Forbidden(
            "GM role required".into(),
        )))
    }
}

/// POST /api/v1/campaigns
///
/// Create a campaign; the creator becomes its GM.
pub async fn create(
    State(state): State<AppState>,
    user: AuthUser,
    Json(input): Json<CreateCampaign>,
) -> AppResult<(StatusCode, Json<Campaign>)> {
    if input.name.trim().is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "Campaign name must not be empty".into(),
        )));
    }
    let campaign = CampaignRepo::create(&state.pool, &input, user.user_id).await?;
    tracing::info!(campaign_id = campaign.id, "Campaign created");
    Ok((StatusCode::CREATED, Json(campaign)))
}

/// GET /api/v1/campaigns
///
/// List the campaigns the caller belongs to.
pub async fn list(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<Vec<Campaign>>> {
    let campaigns = CampaignRepo::list_for_user(&state.pool, user.user_id).await?;
    Ok(Json(campaigns))
}

/// GET /api/v1/campaigns/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<Campaign>> {
    require_member(&state, id, &user).await?;
    let campaign = CampaignRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| campaign_not_found(id))?;
    Ok(Json(campaign))
}

/// PUT /api/v1/campaigns/{id}
pub async fn update(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateCampaign>,
) -> AppResult<Json<Campaign>> {
    require_gm(&state, id, &user).await?;
    let campaign = CampaignRepo::update(&state.pool, id, &input)
        .await?
        .ok_or_else(|| campaign_not_found(id))?;
    Ok(Json(campaign))
}

/// DELETE /api/v1/campaigns/{id}
pub async fn delete(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    require_gm(&state, id, &user).await?;
    let deleted = CampaignRepo::soft_delete(&state.pool, id).await?;
    if !deleted {
        return Err(campaign_not_found(id));
    }
    tracing::info!(campaign_id = id, "Campaign deleted");
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Membership
// ---------------------------------------------------------------------------

/// Request body for `POST /campaigns/{id}/members`.
#[derive(Debug, Deserialize)]
pub struct AddMemberRequest {
    pub user_id: DbId,
    pub role: String,
}

/// GET /api/v1/campaigns/{id}/members
pub async fn list_members(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<Vec<CampaignMember>>> {
    require_member(&state, id, &user).await?;
    let members = CampaignMemberRepo::list(&state.pool, id).await?;
    Ok(Json(members))
}

/// POST /api/v1/campaigns/{id}/members
///
/// Add a member with a role (`gm` or `player`). GM only. Duplicate
/// membership surfaces as 409.
pub async fn add_member(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<AddMemberRequest>,
) -> AppResult<(StatusCode, Json<CampaignMember>)> {
    require_gm(&state, id, &user).await?;
    if !is_valid_role(&input.role) {
        return Err(AppError::Core(CoreError::Validation(format!(
            "Invalid role: {}",
            input.role
        ))));
    }
    if CampaignRepo::find_by_id(&state.pool, id).await?.is_none() {
        return Err(campaign_not_found(id));
    }
    let member = CampaignMemberRepo::add(&state.pool, id, input.user_id, &input.role).await?;
    tracing::info!(
        campaign_id = id,
        member_id = input.user_id,
        role = %input.role,
        "Campaign member added"
    );
    Ok((StatusCode::CREATED, Json(member)))
}

/// DELETE /api/v1/campaigns/{id}/members/{user_id}
pub async fn remove_member(
    State(state): State<AppState>,
    user: AuthUser,
    Path((id, member_id)): Path<(DbId, DbId)>,
) -> AppResult<StatusCode> {
    require_gm(&state, id, &user).await?;
    let removed = CampaignMemberRepo::remove(&state.pool, id, member_id).await?;
    if !removed {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Campaign member",
            id: member_id,
        }));
    }
    Ok(StatusCode::NO_CONTENT)
}
