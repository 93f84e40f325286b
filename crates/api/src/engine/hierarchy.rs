//! Hierarchy validation orchestration.
//!
//! Fetches the facts (parent row, its ancestor chain, its depth) and applies
//! the pure rules from `loreforge_core::hierarchy`. The lookups run
//! sequentially, so validation latency is additive across steps; correctness
//! of the fetched facts takes priority over fan-out here.

use loreforge_core::hierarchy::{validate_parent, HierarchyViolation};
use loreforge_core::types::DbId;
use loreforge_db::repositories::ProjectRepo;
use sqlx::PgPool;

/// Decide whether `proposed_parent_id` is a legal parent for a project in
/// `campaign_id`.
///
/// `project_id` is `None` when validating placement for a not-yet-created
/// project. A `None` proposed parent (detaching to root) is always valid.
///
/// Read-only: safe to call speculatively (e.g. for a UI preview) without
/// mutating anything.
pub async fn validate_hierarchy(
    pool: &PgPool,
    project_id: Option<DbId>,
    proposed_parent_id: Option<DbId>,
    campaign_id: DbId,
) -> Result<Result<(), HierarchyViolation>, sqlx::Error> {
    let Some(parent_id) = proposed_parent_id else {
        return Ok(Ok(()));
    };

    let Some(parent) = ProjectRepo::find_by_id(pool, parent_id).await? else {
        return Ok(Err(HierarchyViolation::ParentNotFound));
    };

    let ancestors = ProjectRepo::get_ancestors(pool, parent_id).await?;
    let ancestor_ids: Vec<DbId> = ancestors.iter().map(|p| p.id).collect();
    let parent_depth = ProjectRepo::get_project_depth(pool, parent_id).await?;

    Ok(validate_parent(
        project_id,
        parent_id,
        parent.campaign_id,
        parent_depth,
        &ancestor_ids,
        campaign_id,
    ))
}
