//! Handlers for the `/projects` resource: CRUD, hierarchy, progress and
//! history.
//!
//! Authorization is asymmetric on purpose: a caller who may not VIEW a
//! project gets a 404 (existence is not leaked), while a caller who may view
//! but not EDIT gets a 403.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use loreforge_core::error::CoreError;
use loreforge_core::history::actions;
use loreforge_core::progress::{check_bounds, validate_goal_points, ProgressTotals};
use loreforge_core::tree::{build_forest, TreeNode};
use loreforge_core::types::DbId;
use serde::{Deserialize, Deserializer, Serialize};

use loreforge_db::models::project::{
    CreateHistoryEntry, CreateProject, Project, ProjectHistoryEntry, ProjectWithCharacter,
};
use loreforge_db::repositories::{
    CampaignMemberRepo, CharacterRepo, ProjectHistoryRepo, ProjectRepo,
};

use crate::engine::{hierarchy, permissions, progress};
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

fn project_not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "Project",
        id,
    })
}

fn edit_forbidden() -> AppError {
    AppError::Core(CoreError::Forbidden(
        "Not allowed to modify this project".into(),
    ))
}

/// Fetch the project if the caller may view it; a denial is a 404.
async fn fetch_viewable(state: &AppState, id: DbId, user: &AuthUser) -> AppResult<Project> {
    let project = ProjectRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| project_not_found(id))?;
    if permissions::can_view(&state.pool, user.user_id, id, user.is_admin).await? {
        Ok(project)
    } else {
        Err(project_not_found(id))
    }
}

/// Fetch the project if the caller may edit it. Viewers who cannot edit get
/// a 403; non-viewers still get the 404 from [`fetch_viewable`].
async fn fetch_editable(state: &AppState, id: DbId, user: &AuthUser) -> AppResult<Project> {
    let project = fetch_viewable(state, id, user).await?;
    if permissions::can_edit(&state.pool, user.user_id, id, user.is_admin).await? {
        Ok(project)
    } else {
        Err(edit_forbidden())
    }
}

// ---------------------------------------------------------------------------
// Create
// ---------------------------------------------------------------------------

/// Request body for `POST /campaigns/{id}/projects`.
#[derive(Debug, Deserialize)]
pub struct CreateProjectRequest {
    pub parent_project_id: Option<DbId>,
    pub character_id: DbId,
    pub name: String,
    pub description: Option<String>,
    pub goal_points: i32,
    pub current_points: Option<i32>,
}

/// POST /api/v1/campaigns/{campaign_id}/projects
///
/// Create a project, validating its placement in the campaign's hierarchy
/// before anything is written. The initial `current_points` (default 0) must
/// already satisfy `0 <= current <= goal`.
pub async fn create(
    State(state): State<AppState>,
    user: AuthUser,
    Path(campaign_id): Path<DbId>,
    Json(input): Json<CreateProjectRequest>,
) -> AppResult<(StatusCode, Json<Project>)> {
    if input.name.trim().is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "Project name must not be empty".into(),
        )));
    }
    validate_goal_points(input.goal_points)
        .map_err(|v| AppError::Core(CoreError::Validation(v.to_string())))?;
    let initial_points = i64::from(input.current_points.unwrap_or(0));
    check_bounds(initial_points, input.goal_points)
        .map_err(|v| AppError::Core(CoreError::Validation(v.to_string())))?;

    if !permissions::can_create(&state.pool, user.user_id, input.character_id, user.is_admin)
        .await?
    {
        return Err(AppError::Core(CoreError::Forbidden(
            "Not allowed to create projects for this character".into(),
        )));
    }

    // The character must actually sit in the target campaign.
    let character = CharacterRepo::find_by_id(&state.pool, input.character_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Character",
            id: input.character_id,
        }))?;
    if character.campaign_id != Some(campaign_id) {
        return Err(AppError::Core(CoreError::Validation(
            "Character does not belong to the target campaign".into(),
        )));
    }

    hierarchy::validate_hierarchy(&state.pool, None, input.parent_project_id, campaign_id)
        .await?
        .map_err(|v| AppError::Core(CoreError::Validation(v.to_string())))?;

    let project = ProjectRepo::create(
        &state.pool,
        &CreateProject {
            campaign_id,
            parent_project_id: input.parent_project_id,
            character_id: input.character_id,
            name: input.name,
            description: input.description,
            goal_points: input.goal_points,
            current_points: input.current_points,
            created_by_user_id: user.user_id,
        },
    )
    .await?;

    ProjectHistoryRepo::create(
        &state.pool,
        &CreateHistoryEntry {
            project_id: project.id,
            user_id: user.user_id,
            action: actions::CREATED,
            previous_points: None,
            new_points: Some(project.current_points),
            notes: None,
        },
    )
    .await?;

    tracing::info!(project_id = project.id, "Project created");
    Ok((StatusCode::CREATED, Json(project)))
}

// ---------------------------------------------------------------------------
// Read
// ---------------------------------------------------------------------------

/// Query parameters for the campaign project listing.
#[derive(Debug, Deserialize)]
pub struct ListProjectsParams {
    /// `flat` (default) or `tree`.
    pub view: Option<String>,
    #[serde(default)]
    pub include_deleted: bool,
    /// Defaults to true.
    pub include_completed: Option<bool>,
}

/// GET /api/v1/campaigns/{campaign_id}/projects
///
/// Flat listing by default; `?view=tree` assembles the rows into the
/// campaign's project forest.
pub async fn list_by_campaign(
    State(state): State<AppState>,
    user: AuthUser,
    Path(campaign_id): Path<DbId>,
    Query(params): Query<ListProjectsParams>,
) -> AppResult<Response> {
    if !user.is_admin
        && !CampaignMemberRepo::is_member(&state.pool, campaign_id, user.user_id).await?
    {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Campaign",
            id: campaign_id,
        }));
    }

    let mut projects =
        ProjectRepo::find_by_campaign(&state.pool, campaign_id, params.include_deleted).await?;
    if !params.include_completed.unwrap_or(true) {
        projects.retain(|p| !p.is_completed);
    }

    match params.view.as_deref() {
        Some("tree") => {
            let forest: Vec<TreeNode<Project>> = build_forest(projects);
            Ok(Json(forest).into_response())
        }
        None | Some("flat") => Ok(Json(projects).into_response()),
        Some(other) => Err(AppError::BadRequest(format!("Unknown view: {other}"))),
    }
}

/// Query parameters for the project detail view.
#[derive(Debug, Deserialize)]
pub struct GetProjectParams {
    #[serde(default)]
    pub include_history: bool,
    #[serde(default)]
    pub include_children: bool,
}

/// Project detail: the row itself, its rolled-up subtree totals, its
/// ancestor chain (nearest first), and optionally its history and child
/// subtree.
#[derive(Debug, Serialize)]
pub struct ProjectDetail {
    #[serde(flatten)]
    pub project: Project,
    pub aggregate: ProgressTotals,
    pub ancestors: Vec<Project>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub history: Option<Vec<ProjectHistoryEntry>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<TreeNode<ProjectWithCharacter>>>,
}

/// GET /api/v1/projects/{id}?include_history=&include_children=
pub async fn get_by_id(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
    Query(params): Query<GetProjectParams>,
) -> AppResult<Json<ProjectDetail>> {
    let project = fetch_viewable(&state, id, &user).await?;
    let aggregate = progress::calculate_aggregate_progress(&state.pool, &project).await?;
    let ancestors = ProjectRepo::get_ancestors(&state.pool, id).await?;

    let history = if params.include_history {
        Some(ProjectHistoryRepo::list_by_project(&state.pool, id).await?)
    } else {
        None
    };
    let children = if params.include_children {
        // The subtree root itself is not in the descendant rows, so its
        // direct children surface as forest roots.
        let descendants = ProjectRepo::get_descendants(&state.pool, id).await?;
        Some(build_forest(descendants))
    } else {
        None
    };

    Ok(Json(ProjectDetail {
        project,
        aggregate,
        ancestors,
        history,
        children,
    }))
}

// ---------------------------------------------------------------------------
// Update
// ---------------------------------------------------------------------------

/// Distinguishes an absent `parent_project_id` key (leave the parent alone)
/// from an explicit `null` (detach to root).
fn double_option<'de, D>(deserializer: D) -> Result<Option<Option<DbId>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<DbId>::deserialize(deserializer).map(Some)
}

/// Request body for `PUT /projects/{id}`. Absent fields are untouched.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateProjectRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub goal_points: Option<i32>,
    #[serde(default, deserialize_with = "double_option")]
    pub parent_project_id: Option<Option<DbId>>,
}

/// PUT /api/v1/projects/{id}
///
/// Field and parent updates. A goal change may not drop the goal below the
/// points already earned. Each accepted update appends one history entry;
/// its point columns are filled only when the goal actually changed.
pub async fn update(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateProjectRequest>,
) -> AppResult<Json<Project>> {
    let project = fetch_editable(&state, id, &user).await?;

    if let Some(goal) = input.goal_points {
        validate_goal_points(goal)
            .map_err(|v| AppError::Core(CoreError::Validation(v.to_string())))?;
        if goal < project.current_points {
            return Err(AppError::Core(CoreError::Validation(format!(
                "Goal points ({goal}) cannot be lower than current points ({})",
                project.current_points
            ))));
        }
    }
    if let Some(name) = &input.name {
        if name.trim().is_empty() {
            return Err(AppError::Core(CoreError::Validation(
                "Project name must not be empty".into(),
            )));
        }
    }

    if let Some(new_parent) = input.parent_project_id {
        hierarchy::validate_hierarchy(&state.pool, Some(id), new_parent, project.campaign_id)
            .await?
            .map_err(|v| AppError::Core(CoreError::Validation(v.to_string())))?;
        ProjectRepo::set_parent(&state.pool, id, new_parent)
            .await?
            .ok_or_else(|| project_not_found(id))?;
    }

    let updated = ProjectRepo::update(
        &state.pool,
        id,
        &loreforge_db::models::project::UpdateProject {
            name: input.name,
            description: input.description,
            goal_points: input.goal_points,
        },
    )
    .await?
    .ok_or_else(|| project_not_found(id))?;

    let goal_changed = updated.goal_points != project.goal_points;
    ProjectHistoryRepo::create(
        &state.pool,
        &CreateHistoryEntry {
            project_id: id,
            user_id: user.user_id,
            action: actions::UPDATED_GOAL,
            previous_points: goal_changed.then_some(project.goal_points),
            new_points: goal_changed.then_some(updated.goal_points),
            notes: None,
        },
    )
    .await?;

    Ok(Json(updated))
}

// ---------------------------------------------------------------------------
// Progress and completion
// ---------------------------------------------------------------------------

/// Request body for `POST /projects/{id}/progress`.
#[derive(Debug, Deserialize)]
pub struct ProgressRequest {
    pub points: i32,
    /// `false` (default) treats `points` as an absolute value, `true` as a
    /// delta added to the current points.
    #[serde(default)]
    pub is_increment: bool,
    pub notes: Option<String>,
}

/// Progress update response: the refreshed project plus whether this update
/// pushed it over its goal.
#[derive(Debug, Serialize)]
pub struct ProgressResponse {
    #[serde(flatten)]
    pub project: Project,
    pub auto_completed: bool,
}

/// POST /api/v1/projects/{id}/progress
///
/// Record progress and auto-complete the project when the goal is reached.
pub async fn update_progress(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<ProgressRequest>,
) -> AppResult<Json<ProgressResponse>> {
    fetch_editable(&state, id, &user).await?;

    let updated = progress::update_progress(
        &state.pool,
        id,
        user.user_id,
        input.points,
        input.is_increment,
        input.notes,
    )
    .await?
    .ok_or_else(|| project_not_found(id))?;

    let auto_completed = progress::check_auto_complete(&state.pool, id, user.user_id).await?;
    let project = if auto_completed {
        ProjectRepo::find_by_id(&state.pool, id)
            .await?
            .unwrap_or(updated)
    } else {
        updated
    };

    Ok(Json(ProgressResponse {
        project,
        auto_completed,
    }))
}

/// POST /api/v1/projects/{id}/complete
///
/// Mark a project completed manually, goal reached or not. Completing twice
/// is a conflict.
pub async fn complete(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<Project>> {
    let project = fetch_editable(&state, id, &user).await?;
    if project.is_completed {
        return Err(AppError::Core(CoreError::Conflict(
            "Project is already completed".into(),
        )));
    }

    let completed = ProjectRepo::complete(&state.pool, id)
        .await?
        .ok_or_else(|| project_not_found(id))?;

    ProjectHistoryRepo::create(
        &state.pool,
        &CreateHistoryEntry {
            project_id: id,
            user_id: user.user_id,
            action: actions::COMPLETED,
            previous_points: None,
            new_points: Some(completed.current_points),
            notes: None,
        },
    )
    .await?;

    tracing::info!(project_id = id, "Project completed");
    Ok(Json(completed))
}

// ---------------------------------------------------------------------------
// Delete and history
// ---------------------------------------------------------------------------

/// DELETE /api/v1/projects/{id}
///
/// Soft delete. Descendants are left in place; traversals stop at the
/// deleted node.
pub async fn delete(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    fetch_editable(&state, id, &user).await?;
    let deleted = ProjectRepo::soft_delete(&state.pool, id).await?;
    if !deleted {
        return Err(project_not_found(id));
    }

    ProjectHistoryRepo::create(
        &state.pool,
        &CreateHistoryEntry {
            project_id: id,
            user_id: user.user_id,
            action: actions::DELETED,
            previous_points: None,
            new_points: None,
            notes: None,
        },
    )
    .await?;

    tracing::info!(project_id = id, "Project deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/projects/{id}/history
///
/// Audit trail, newest first. Stays addressable after the project is soft
/// deleted, so the visibility check runs against the row including deleted
/// state rather than through the live-only lookup.
pub async fn list_history(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<Vec<ProjectHistoryEntry>>> {
    let project = ProjectRepo::find_by_id_include_deleted(&state.pool, id)
        .await?
        .ok_or_else(|| project_not_found(id))?;
    if !user.is_admin
        && !CampaignMemberRepo::is_member(&state.pool, project.campaign_id, user.user_id).await?
    {
        return Err(project_not_found(id));
    }

    let history = ProjectHistoryRepo::list_by_project(&state.pool, id).await?;
    Ok(Json(history))
}
