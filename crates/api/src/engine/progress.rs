//! Progress engine: aggregate rollups, point updates, auto-completion.
//!
//! Every accepted mutation appends exactly one history entry. Out-of-bounds
//! updates are rejected before anything is written, so stored state never
//! moves on a failed update.

use loreforge_core::error::CoreError;
use loreforge_core::history::actions;
use loreforge_core::progress::{aggregate_totals, check_bounds, effective_points, ProgressTotals};
use loreforge_core::types::DbId;
use loreforge_db::models::project::{CreateHistoryEntry, Project};
use loreforge_db::repositories::{ProjectHistoryRepo, ProjectRepo};
use sqlx::PgPool;

use crate::error::{AppError, AppResult};

/// Sum goal/current points over a project and all its live descendants.
pub async fn calculate_aggregate_progress(
    pool: &PgPool,
    project: &Project,
) -> Result<ProgressTotals, sqlx::Error> {
    let descendants = ProjectRepo::get_descendants(pool, project.id).await?;
    let points = std::iter::once((project.goal_points, project.current_points)).chain(
        descendants
            .iter()
            .map(|p| (p.goal_points, p.current_points)),
    );
    Ok(aggregate_totals(points))
}

/// Apply a progress update (absolute value or increment) and append an
/// `updated_progress` history entry.
///
/// Returns `None` if the project does not exist; the existence check runs
/// before the bounds validation. A value that would leave the project
/// outside `0..=goal_points` is rejected as a validation error, never
/// clamped. Completion is NOT decided here; callers invoke
/// [`check_auto_complete`] as an explicit follow-up step.
pub async fn update_progress(
    pool: &PgPool,
    project_id: DbId,
    acting_user_id: DbId,
    new_points: i32,
    is_increment: bool,
    notes: Option<String>,
) -> AppResult<Option<Project>> {
    let Some(project) = ProjectRepo::find_by_id(pool, project_id).await? else {
        return Ok(None);
    };

    let effective = effective_points(project.current_points, new_points, is_increment);
    check_bounds(effective, project.goal_points)
        .map_err(|v| AppError::Core(CoreError::Validation(v.to_string())))?;
    // In bounds, so the value fits the stored column again.
    let effective = effective as i32;

    let Some(updated) = ProjectRepo::update_progress(pool, project_id, effective).await? else {
        // Deleted between the read and the write; treat as missing.
        return Ok(None);
    };

    ProjectHistoryRepo::create(
        pool,
        &CreateHistoryEntry {
            project_id,
            user_id: acting_user_id,
            action: actions::UPDATED_PROGRESS,
            previous_points: Some(project.current_points),
            new_points: Some(effective),
            notes,
        },
    )
    .await?;

    tracing::debug!(
        project_id,
        previous = project.current_points,
        new = effective,
        "Project progress updated"
    );
    Ok(Some(updated))
}

/// Complete the project if its goal has been reached.
///
/// Returns `false` if the project is missing or already completed; otherwise
/// completes it (setting `completed_at`), appends a `completed` history
/// entry, and returns `true`. Idempotent across repeated calls: the second
/// call sees `is_completed` and does nothing.
pub async fn check_auto_complete(
    pool: &PgPool,
    project_id: DbId,
    acting_user_id: DbId,
) -> Result<bool, sqlx::Error> {
    let Some(project) = ProjectRepo::find_by_id(pool, project_id).await? else {
        return Ok(false);
    };
    if project.is_completed || project.current_points < project.goal_points {
        return Ok(false);
    }

    if ProjectRepo::complete(pool, project_id).await?.is_none() {
        return Ok(false);
    }

    ProjectHistoryRepo::create(
        pool,
        &CreateHistoryEntry {
            project_id,
            user_id: acting_user_id,
            action: actions::COMPLETED,
            previous_points: None,
            new_points: Some(project.current_points),
            notes: None,
        },
    )
    .await?;

    tracing::info!(project_id, "Project auto-completed");
    Ok(true)
}
