//! Parent-assignment rules for the campaign project hierarchy.
//!
//! Projects inside a campaign form a forest: `parent_project_id` links must
//! never cross campaigns, never cycle, and never nest deeper than
//! [`MAX_PROJECT_DEPTH`]. The checks here are pure decision functions over
//! facts fetched by the caller (parent row, ancestor chain, depth), so they
//! can be evaluated speculatively without touching storage.

use crate::types::DbId;

/// Maximum 0-indexed depth a project may sit at.
///
/// Depth is the number of parent hops from a project to its root (a root is
/// depth 0). A prospective parent already at this depth cannot receive
/// children, so chains of `MAX_PROJECT_DEPTH + 1` nodes (depths 0..=5) are
/// the deepest the tree can grow.
pub const MAX_PROJECT_DEPTH: i32 = 5;

/// A rejected parent assignment, with the specific rule that failed.
///
/// The display strings are surfaced verbatim to API clients; these are
/// expected, user-correctable conditions and must name the violated rule.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HierarchyViolation {
    #[error("Parent project not found")]
    ParentNotFound,

    #[error("Parent project must belong to the same campaign")]
    CrossCampaignParent,

    #[error("A project cannot be its own parent")]
    SelfParent,

    #[error("Circular reference: the project is an ancestor of the proposed parent")]
    CircularReference,

    #[error("Maximum project depth exceeded ({MAX_PROJECT_DEPTH} levels)")]
    MaxDepthExceeded,
}

/// Validate attaching a project under `parent_id`.
///
/// `project_id` is `None` when validating placement for a project that does
/// not exist yet (creation), in which case the self-parent and cycle rules
/// cannot apply. Rules are checked in a fixed order, short-circuiting on the
/// first failure:
///
/// 1. The parent must belong to `campaign_id` (cross-campaign nesting is
///    forbidden).
/// 2. The project must not be its own parent.
/// 3. The project must not appear in the parent's ancestor chain (attaching
///    would create a cycle).
/// 4. The parent's depth must be below [`MAX_PROJECT_DEPTH`].
///
/// The caller handles the missing-parent case ([`HierarchyViolation::ParentNotFound`])
/// before fetching the facts passed here, and a `None` proposed parent
/// (detaching to root) is always valid and never reaches this function.
pub fn validate_parent(
    project_id: Option<DbId>,
    parent_id: DbId,
    parent_campaign_id: DbId,
    parent_depth: i32,
    parent_ancestors: &[DbId],
    campaign_id: DbId,
) -> Result<(), HierarchyViolation> {
    if parent_campaign_id != campaign_id {
        return Err(HierarchyViolation::CrossCampaignParent);
    }

    if let Some(id) = project_id {
        if id == parent_id {
            return Err(HierarchyViolation::SelfParent);
        }
        if parent_ancestors.contains(&id) {
            return Err(HierarchyViolation::CircularReference);
        }
    }

    if parent_depth >= MAX_PROJECT_DEPTH {
        return Err(HierarchyViolation::MaxDepthExceeded);
    }

    Ok(())
}
