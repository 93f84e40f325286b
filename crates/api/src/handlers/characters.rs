//! Handlers for the `/characters` resource.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use loreforge_core::error::CoreError;
use loreforge_core::types::DbId;

use loreforge_db::models::character::{Character, CreateCharacter, UpdateCharacter};
use loreforge_db::models::project::Project;
use loreforge_db::repositories::{CampaignMemberRepo, CharacterRepo, ProjectRepo};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

fn character_not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "Character",
        id,
    })
}

/// Fetch the character if the caller may view it: the owner, an admin, or
/// any member of the character's campaign. Denial is a 404.
async fn fetch_viewable(
    state: &AppState,
    id: DbId,
    user: &AuthUser,
) -> AppResult<Character> {
    let character = CharacterRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| character_not_found(id))?;
    if user.is_admin || character.owner_user_id == user.user_id {
        return Ok(character);
    }
    if let Some(campaign_id) = character.campaign_id {
        if CampaignMemberRepo::is_member(&state.pool, campaign_id, user.user_id).await? {
            return Ok(character);
        }
    }
    Err(character_not_found(id))
}

/// Fetch the character if the caller may edit it: the owner, an admin, or
/// the GM of the character's campaign.
async fn fetch_editable(state: &AppState, id: DbId, user: &AuthUser) -> AppResult<Character> {
    let character = fetch_viewable(state, id, user).await?;
    if user.is_admin || character.owner_user_id == user.user_id {
        return Ok(character);
    }
    if let Some(campaign_id) = character.campaign_id {
        if CampaignMemberRepo::is_gm(&state.pool, campaign_id, user.user_id).await? {
            return Ok(character);
        }
    }
    Err(AppError::Core(CoreError::Forbidden(
        "Not allowed to modify this character".into(),
    )))
}

/// POST /api/v1/characters
///
/// Create a character owned by the caller. If a campaign is given the
/// caller must belong to it.
pub async fn create(
    State(state): State<AppState>,
    user: AuthUser,
    Json(input): Json<CreateCharacter>,
) -> AppResult<(StatusCode, Json<Character>)> {
    if input.name.trim().is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "Character name must not be empty".into(),
        )));
    }
    if let Some(campaign_id) = input.campaign_id {
        if !user.is_admin
            && !CampaignMemberRepo::is_member(&state.pool, campaign_id, user.user_id).await?
        {
            return Err(AppError::Core(CoreError::Validation(
                "Cannot assign a character to a campaign you do not belong to".into(),
            )));
        }
    }
    let character = CharacterRepo::create(&state.pool, &input, user.user_id).await?;
    tracing::info!(character_id = character.id, "Character created");
    Ok((StatusCode::CREATED, Json(character)))
}

/// GET /api/v1/characters
///
/// List the caller's own characters.
pub async fn list(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<Vec<Character>>> {
    let characters = CharacterRepo::list_by_owner(&state.pool, user.user_id).await?;
    Ok(Json(characters))
}

/// GET /api/v1/characters/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<Character>> {
    let character = fetch_viewable(&state, id, &user).await?;
    Ok(Json(character))
}

/// GET /api/v1/characters/{id}/projects
///
/// The character's live projects, most recently updated first.
pub async fn list_projects(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<Vec<Project>>> {
    fetch_viewable(&state, id, &user).await?;
    let projects = ProjectRepo::find_by_character(&state.pool, id).await?;
    Ok(Json(projects))
}

/// PUT /api/v1/characters/{id}
pub async fn update(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateCharacter>,
) -> AppResult<Json<Character>> {
    fetch_editable(&state, id, &user).await?;
    if let Some(campaign_id) = input.campaign_id {
        if !user.is_admin
            && !CampaignMemberRepo::is_member(&state.pool, campaign_id, user.user_id).await?
        {
            return Err(AppError::Core(CoreError::Validation(
                "Cannot assign a character to a campaign you do not belong to".into(),
            )));
        }
    }
    let character = CharacterRepo::update(&state.pool, id, &input)
        .await?
        .ok_or_else(|| character_not_found(id))?;
    Ok(Json(character))
}

/// DELETE /api/v1/characters/{id}
pub async fn delete(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    fetch_editable(&state, id, &user).await?;
    let deleted = CharacterRepo::soft_delete(&state.pool, id).await?;
    if !deleted {
        return Err(character_not_found(id));
    }
    tracing::info!(character_id = id, "Character deleted");
    Ok(StatusCode::NO_CONTENT)
}
