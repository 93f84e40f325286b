//! Permission gate: role/ownership decisions for project actions.
//!
//! Pure authorization predicates over externally-supplied facts (character
//! ownership, campaign membership roles). Never mutates state; a denial is a
//! plain `false`, and the route layer decides whether that becomes a 403 or
//! an information-hiding 404.

use loreforge_core::types::DbId;
use loreforge_db::repositories::{CampaignMemberRepo, CharacterRepo, ProjectRepo};
use sqlx::PgPool;

/// May the user create a project attributed to `character_id`?
///
/// Admins always may; otherwise the user must own the character, or hold the
/// GM role in the character's campaign (when it belongs to one). A missing
/// character denies.
pub async fn can_create(
    pool: &PgPool,
    user_id: DbId,
    character_id: DbId,
    is_admin: bool,
) -> Result<bool, sqlx::Error> {
    if is_admin {
        return Ok(true);
    }

    let Some(character) = CharacterRepo::find_by_id(pool, character_id).await? else {
        return Ok(false);
    };
    if character.owner_user_id == user_id {
        return Ok(true);
    }
    match character.campaign_id {
        Some(campaign_id) => CampaignMemberRepo::is_gm(pool, campaign_id, user_id).await,
        None => Ok(false),
    }
}

/// May the user edit the project (progress, goal, parent, deletion)?
///
/// Admins always may; otherwise the user must own the project's character or
/// be GM of the project's campaign. A missing project or character denies.
pub async fn can_edit(
    pool: &PgPool,
    user_id: DbId,
    project_id: DbId,
    is_admin: bool,
) -> Result<bool, sqlx::Error> {
    if is_admin {
        return Ok(true);
    }

    let Some(project) = ProjectRepo::find_by_id(pool, project_id).await? else {
        return Ok(false);
    };
    if let Some(character) = CharacterRepo::find_by_id(pool, project.character_id).await? {
        if character.owner_user_id == user_id {
            return Ok(true);
        }
    }
    CampaignMemberRepo::is_gm(pool, project.campaign_id, user_id).await
}

/// May the user view the project?
///
/// Admins always may; otherwise any member (GM or player) of the project's
/// campaign may. A missing project denies.
pub async fn can_view(
    pool: &PgPool,
    user_id: DbId,
    project_id: DbId,
    is_admin: bool,
) -> Result<bool, sqlx::Error> {
    if is_admin {
        return Ok(true);
    }

    let Some(project) = ProjectRepo::find_by_id(pool, project_id).await? else {
        return Ok(false);
    };
    CampaignMemberRepo::is_member(pool, project.campaign_id, user_id).await
}
