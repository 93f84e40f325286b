//! Handlers for campaign encounters.
//!
//! Encounters are nested under campaigns for create/list and addressed
//! directly for get/update/delete.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use loreforge_core::error::CoreError;
use loreforge_core::types::DbId;

use loreforge_db::models::encounter::{CreateEncounter, Encounter, UpdateEncounter};
use loreforge_db::repositories::{CampaignMemberRepo, CampaignRepo, EncounterRepo};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

fn encounter_not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "Encounter",
        id,
    })
}

async fn require_member(state: &AppState, campaign_id: DbId, user: &AuthUser) -> AppResult<()> {
    if user.is_admin || CampaignMemberRepo::is_member(&state.pool, campaign_id, user.user_id).await?
    {
        Ok(())
    } else {
        Err(AppError::Core(CoreError::NotFound {
            entity: "Campaign",
            id: campaign_id,
        }))
    }
}

async fn require_gm(state: &AppState, campaign_id: DbId, user: &AuthUser) -> AppResult<()> {
    if user.is_admin || CampaignMemberRepo::is_gm(&state.pool, campaign_id, user.user_id).await? {
        Ok(())
    } else {
        Err(AppError::Core(CoreError::Forbidden(
            "GM role required".into(),
        )))
    }
}

/// POST /api/v1/campaigns/{campaign_id}/encounters
pub async fn create(
    State(state): State<AppState>,
    user: AuthUser,
    Path(campaign_id): Path<DbId>,
    Json(input): Json<CreateEncounter>,
) -> AppResult<(StatusCode, Json<Encounter>)> {
    require_gm(&state, campaign_id, &user).await?;
    if input.name.trim().is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "Encounter name must not be empty".into(),
        )));
    }
    if CampaignRepo::find_by_id(&state.pool, campaign_id)
        .await?
        .is_none()
    {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Campaign",
            id: campaign_id,
        }));
    }
    let encounter = EncounterRepo::create(&state.pool, campaign_id, &input).await?;
    tracing::info!(encounter_id = encounter.id, campaign_id, "Encounter created");
    Ok((StatusCode::CREATED, Json(encounter)))
}

/// GET /api/v1/campaigns/{campaign_id}/encounters
pub async fn list(
    State(state): State<AppState>,
    user: AuthUser,
    Path(campaign_id): Path<DbId>,
) -> AppResult<Json<Vec<Encounter>>> {
    require_member(&state, campaign_id, &user).await?;
    let encounters = EncounterRepo::list_by_campaign(&state.pool, campaign_id).await?;
    Ok(Json(encounters))
}

/// GET /api/v1/encounters/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<Encounter>> {
    let encounter = EncounterRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| encounter_not_found(id))?;
    require_member(&state, encounter.campaign_id, &user)
        .await
        .map_err(|_| encounter_not_found(id))?;
    Ok(Json(encounter))
}

/// PUT /api/v1/encounters/{id}
pub async fn update(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateEncounter>,
) -> AppResult<Json<Encounter>> {
    let encounter = EncounterRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| encounter_not_found(id))?;
    require_gm(&state, encounter.campaign_id, &user).await?;
    let updated = EncounterRepo::update(&state.pool, id, &input)
        .await?
        .ok_or_else(|| encounter_not_found(id))?;
    Ok(Json(updated))
}

/// DELETE /api/v1/encounters/{id}
pub async fn delete(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let encounter = EncounterRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| encounter_not_found(id))?;
    require_gm(&state, encounter.campaign_id, &user).await?;
    let deleted = EncounterRepo::soft_delete(&state.pool, id).await?;
    if !deleted {
        return Err(encounter_not_found(id));
    }
    tracing::info!(encounter_id = id, "Encounter deleted");
    Ok(StatusCode::NO_CONTENT)
}
