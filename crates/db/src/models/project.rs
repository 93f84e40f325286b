//! Project and project-history models and DTOs.

use loreforge_core::tree::TreeItem;
use loreforge_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A project row from the `projects` table.
///
/// Projects under a campaign form a forest via `parent_project_id`; the
/// invariant `0 <= current_points <= goal_points` holds after every accepted
/// mutation (also enforced by a table check constraint as a backstop).
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Project {
    pub id: DbId,
    pub campaign_id: DbId,
    /// `None` means the project is a root within its campaign.
    pub parent_project_id: Option<DbId>,
    pub character_id: DbId,
    pub name: String,
    pub description: Option<String>,
    pub goal_points: i32,
    pub current_points: i32,
    pub is_completed: bool,
    pub completed_at: Option<Timestamp>,
    pub is_deleted: bool,
    pub created_by_user_id: DbId,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl TreeItem for Project {
    fn id(&self) -> DbId {
        self.id
    }
    fn parent_id(&self) -> Option<DbId> {
        self.parent_project_id
    }
}

/// A project row annotated with its character's display name, as returned
/// by the descendant traversal.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ProjectWithCharacter {
    pub id: DbId,
    pub campaign_id: DbId,
    pub parent_project_id: Option<DbId>,
    pub character_id: DbId,
    pub character_name: String,
    pub name: String,
    pub description: Option<String>,
    pub goal_points: i32,
    pub current_points: i32,
    pub is_completed: bool,
    pub completed_at: Option<Timestamp>,
    pub is_deleted: bool,
    pub created_by_user_id: DbId,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl TreeItem for ProjectWithCharacter {
    fn id(&self) -> DbId {
        self.id
    }
    fn parent_id(&self) -> Option<DbId> {
        self.parent_project_id
    }
}

/// DTO for inserting a new project.
#[derive(Debug, Clone)]
pub struct CreateProject {
    pub campaign_id: DbId,
    pub parent_project_id: Option<DbId>,
    pub character_id: DbId,
    pub name: String,
    pub description: Option<String>,
    pub goal_points: i32,
    /// Defaults to 0 if omitted.
    pub current_points: Option<i32>,
    pub created_by_user_id: DbId,
}

/// Patch for the plain mutable columns. Absent fields are untouched.
///
/// Parent reassignment is deliberately not part of this patch: it goes
/// through `ProjectRepo::set_parent` after hierarchy validation, and
/// completion state only changes through `ProjectRepo::complete`.
#[derive(Debug, Clone, Default)]
pub struct UpdateProject {
    pub name: Option<String>,
    pub description: Option<String>,
    pub goal_points: Option<i32>,
}

/// An immutable audit row from the `project_history` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ProjectHistoryEntry {
    pub id: DbId,
    pub project_id: DbId,
    pub user_id: DbId,
    pub action: String,
    pub previous_points: Option<i32>,
    pub new_points: Option<i32>,
    pub notes: Option<String>,
    pub created_at: Timestamp,
}

/// DTO for appending a history entry.
#[derive(Debug, Clone)]
pub struct CreateHistoryEntry {
    pub project_id: DbId,
    pub user_id: DbId,
    pub action: &'static str,
    pub previous_points: Option<i32>,
    pub new_points: Option<i32>,
    pub notes: Option<String>,
}
