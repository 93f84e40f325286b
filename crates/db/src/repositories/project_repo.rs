//! Repository for the `projects` table, including the recursive tree
//! traversals (ancestors, descendants, depth).
//!
//! The traversals are recursive CTEs, each bounded by
//! `MAX_PROJECT_DEPTH + 1` hops so a corrupt parent chain (which application
//! invariants should make impossible) terminates instead of recursing
//! unboundedly. Soft-deleted rows are excluded at every traversal level.

use loreforge_core::hierarchy::MAX_PROJECT_DEPTH;
use loreforge_core::types::DbId;
use sqlx::PgPool;

use crate::models::project::{CreateProject, Project, ProjectWithCharacter, UpdateProject};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, campaign_id, parent_project_id, character_id, name, description, \
     goal_points, current_points, is_completed, completed_at, is_deleted, \
     created_by_user_id, created_at, updated_at";

/// Hop bound for the recursive traversals.
const WALK_LIMIT: i32 = MAX_PROJECT_DEPTH + 1;

/// Provides CRUD operations and tree traversals for projects.
pub struct ProjectRepo;

impl ProjectRepo {
    /// Insert a new project, returning the persisted row (server-assigned
    /// defaults and timestamps included).
    ///
    /// If `current_points` is `None` in the input, defaults to 0.
    pub async fn create(pool: &PgPool, input: &CreateProject) -> Result<Project, sqlx::Error> {
        let query = format!(
            "INSERT INTO projects
                (campaign_id, parent_project_id, character_id, name, description,
                 goal_points, current_points, created_by_user_id)
             VALUES ($1, $2, $3, $4, $5, $6, COALESCE($7, 0), $8)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(input.campaign_id)
            .bind(input.parent_project_id)
            .bind(input.character_id)
            .bind(&input.name)
            .bind(&input.description)
            .bind(input.goal_points)
            .bind(input.current_points)
            .bind(input.created_by_user_id)
            .fetch_one(pool)
            .await
    }

    /// Find a project by ID. Excludes soft-deleted rows.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Project>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM projects WHERE id = $1 AND is_deleted = FALSE");
        sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a project by ID, including soft-deleted rows. History remains
    /// addressable for deleted projects.
    pub async fn find_by_id_include_deleted(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<Project>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM projects WHERE id = $1");
        sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List a campaign's projects grouped by parent, creation-ascending
    /// within each group, so tree assembly sees siblings in creation order.
    pub async fn find_by_campaign(
        pool: &PgPool,
        campaign_id: DbId,
        include_deleted: bool,
    ) -> Result<Vec<Project>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM projects
             WHERE campaign_id = $1 AND (is_deleted = FALSE OR $2)
             ORDER BY parent_project_id ASC NULLS FIRST, created_at ASC"
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(campaign_id)
            .bind(include_deleted)
            .fetch_all(pool)
            .await
    }

    /// List a character's live projects, most recently updated first.
    pub async fn find_by_character(
        pool: &PgPool,
        character_id: DbId,
    ) -> Result<Vec<Project>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM projects
             WHERE character_id = $1 AND is_deleted = FALSE
             ORDER BY updated_at DESC"
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(character_id)
            .fetch_all(pool)
            .await
    }

    /// Update the plain mutable columns. Only non-`None` fields in `input`
    /// are applied; `updated_at` is always touched.
    ///
    /// Returns `None` if no live row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateProject,
    ) -> Result<Option<Project>, sqlx::Error> {
        let query = format!(
            "UPDATE projects SET
                name = COALESCE($2, name),
                description = COALESCE($3, description),
                goal_points = COALESCE($4, goal_points),
                updated_at = NOW()
             WHERE id = $1 AND is_deleted = FALSE
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.description)
            .bind(input.goal_points)
            .fetch_optional(pool)
            .await
    }

    /// Assign or clear the parent link. Hierarchy validation happens before
    /// this is called; `None` detaches the project to a root.
    pub async fn set_parent(
        pool: &PgPool,
        id: DbId,
        parent_project_id: Option<DbId>,
    ) -> Result<Option<Project>, sqlx::Error> {
        let query = format!(
            "UPDATE projects SET parent_project_id = $2, updated_at = NOW()
             WHERE id = $1 AND is_deleted = FALSE
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .bind(parent_project_id)
            .fetch_optional(pool)
            .await
    }

    /// Persist a new `current_points` value.
    ///
    /// Returns `None` if no live row with the given `id` exists.
    pub async fn update_progress(
        pool: &PgPool,
        id: DbId,
        current_points: i32,
    ) -> Result<Option<Project>, sqlx::Error> {
        let query = format!(
            "UPDATE projects SET current_points = $2, updated_at = NOW()
             WHERE id = $1 AND is_deleted = FALSE
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .bind(current_points)
            .fetch_optional(pool)
            .await
    }

    /// Mark a project completed. The single transition point for
    /// `is_completed` and `completed_at`; both are set together and never
    /// written independently elsewhere.
    pub async fn complete(pool: &PgPool, id: DbId) -> Result<Option<Project>, sqlx::Error> {
        let query = format!(
            "UPDATE projects SET is_completed = TRUE, completed_at = NOW(), updated_at = NOW()
             WHERE id = $1 AND is_deleted = FALSE
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Soft-delete a project. Returns `true` if a row was marked deleted.
    ///
    /// Descendants keep their `parent_project_id` link; traversals simply
    /// stop at the deleted node.
    pub async fn soft_delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE projects SET is_deleted = TRUE, updated_at = NOW()
             WHERE id = $1 AND is_deleted = FALSE",
        )
        .bind(id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Number of parent hops from a project to the furthest reachable root
    /// (0 if the project is itself a root).
    pub async fn get_project_depth(pool: &PgPool, id: DbId) -> Result<i32, sqlx::Error> {
        sqlx::query_scalar::<_, i32>(
            "WITH RECURSIVE chain AS (
                SELECT id, parent_project_id, 0 AS depth
                FROM projects WHERE id = $1
                UNION ALL
                SELECT p.id, p.parent_project_id, c.depth + 1
                FROM projects p
                JOIN chain c ON p.id = c.parent_project_id
                WHERE c.depth < $2
             )
             SELECT COALESCE(MAX(depth), 0) FROM chain",
        )
        .bind(id)
        .bind(WALK_LIMIT)
        .fetch_one(pool)
        .await
    }

    /// All live ancestors of a project, nearest first, excluding the project
    /// itself.
    pub async fn get_ancestors(pool: &PgPool, id: DbId) -> Result<Vec<Project>, sqlx::Error> {
        let query = format!(
            "WITH RECURSIVE chain AS (
                SELECT p.*, 0 AS hops
                FROM projects p WHERE p.id = $1
                UNION ALL
                SELECT p.*, c.hops + 1
                FROM projects p
                JOIN chain c ON p.id = c.parent_project_id
                WHERE c.hops < $2 AND p.is_deleted = FALSE
             )
             SELECT {COLUMNS} FROM chain WHERE id <> $1 ORDER BY hops ASC"
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .bind(WALK_LIMIT)
            .fetch_all(pool)
            .await
    }

    /// All live descendants of a project, excluding the project itself, each
    /// annotated with its character's display name. Ordered shallowest
    /// first, creation-ascending among siblings.
    pub async fn get_descendants(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Vec<ProjectWithCharacter>, sqlx::Error> {
        sqlx::query_as::<_, ProjectWithCharacter>(
            "WITH RECURSIVE subtree AS (
                SELECT p.*, 0 AS rel_depth
                FROM projects p WHERE p.id = $1
                UNION ALL
                SELECT p.*, s.rel_depth + 1
                FROM projects p
                JOIN subtree s ON p.parent_project_id = s.id
                WHERE s.rel_depth < $2 AND p.is_deleted = FALSE
             )
             SELECT s.id, s.campaign_id, s.parent_project_id, s.character_id,
                    c.name AS character_name, s.name, s.description,
                    s.goal_points, s.current_points, s.is_completed, s.completed_at,
                    s.is_deleted, s.created_by_user_id, s.created_at, s.updated_at
             FROM subtree s
             JOIN characters c ON c.id = s.character_id
             WHERE s.id <> $1
             ORDER BY s.rel_depth ASC, s.created_at ASC",
        )
        .bind(id)
        .bind(WALK_LIMIT)
        .fetch_all(pool)
        .await
    }
}
