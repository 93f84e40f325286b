//! Repository for the `project_history` table.
//!
//! Append-only: there is deliberately no update or delete method here, and
//! none may be added. Every mutating project operation appends exactly one
//! entry.

use loreforge_core::types::DbId;
use sqlx::PgPool;

use crate::models::project::{CreateHistoryEntry, ProjectHistoryEntry};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str =
    "id, project_id, user_id, action, previous_points, new_points, notes, created_at";

/// Provides append and read operations for project history.
pub struct ProjectHistoryRepo;

impl ProjectHistoryRepo {
    /// Append a history entry.
    pub async fn create(pool: &PgPool, input: &CreateHistoryEntry) -> Result<(), sqlx::Error> {
        sqlx::query(
            "INSERT INTO project_history
                (project_id, user_id, action, previous_points, new_points, notes)
             VALUES ($1, $2, $3, $4, $5, $6)",
        )
        .bind(input.project_id)
        .bind(input.user_id)
        .bind(input.action)
        .bind(input.previous_points)
        .bind(input.new_points)
        .bind(&input.notes)
        .execute(pool)
        .await?;
        Ok(())
    }

    /// A project's history, newest first. Retrievable even after the project
    /// is soft-deleted.
    pub async fn list_by_project(
        pool: &PgPool,
        project_id: DbId,
    ) -> Result<Vec<ProjectHistoryEntry>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM project_history
             WHERE project_id = $1
             ORDER BY created_at DESC, id DESC"
        );
        sqlx::query_as::<_, ProjectHistoryEntry>(&query)
            .bind(project_id)
            .fetch_all(pool)
            .await
    }
}
