//! Repository for the `projects` table.
//!
//! Lifecycle transitions are conditional `UPDATE ... WHERE status_id = ...
//! RETURNING` statements. A `None` result means the guard did not match:
//! the project is missing or another writer changed it first. Callers
//! re-read the row to tell the two apart.

use linguist_core::lifecycle::reopen_target;
use linguist_core::status::ProjectStatus;
use linguist_core::types::DbId;
use sqlx::{PgConnection, PgPool};

use crate::models::project::{CreateProject, Project};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "\
    id, name, source_language, target_language, status_id, \
    claimed_by, claimed_at, last_claimed_by, completed_at, deadline, \
    created_at, updated_at";

/// Provides CRUD and lifecycle operations for projects.
pub struct ProjectRepo;

impl ProjectRepo {
    /// Insert a new unclaimed project, returning the created row.
    pub async fn create(
        conn: &mut PgConnection,
        input: &CreateProject,
    ) -> Result<Project, sqlx::Error> {
        let query = format!(
            "INSERT INTO projects (name, source_language, target_language, status_id, deadline)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(input.name.trim())
            .bind(&input.source_language)
            .bind(&input.target_language)
            .bind(ProjectStatus::Unclaimed.id())
            .bind(input.deadline)
            .fetch_one(conn)
            .await
    }

    /// Find a project by its internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Project>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM projects WHERE id = $1");
        sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List all projects, earliest deadline first, then most recently created.
    pub async fn list(pool: &PgPool) -> Result<Vec<Project>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM projects \
             ORDER BY deadline ASC NULLS LAST, created_at DESC, id DESC"
        );
        sqlx::query_as::<_, Project>(&query).fetch_all(pool).await
    }

    /// Claim an unclaimed project for `actor_id`.
    ///
    /// The `status_id` guard makes this a check-and-set: of two concurrent
    /// claims exactly one matches the row.
    pub async fn claim(
        pool: &PgPool,
        id: DbId,
        actor_id: DbId,
    ) -> Result<Option<Project>, sqlx::Error> {
        let query = format!(
            "UPDATE projects SET
                status_id = $2,
                claimed_by = $3,
                claimed_at = NOW(),
                updated_at = NOW()
             WHERE id = $1 AND status_id = $4
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .bind(ProjectStatus::Claimed.id())
            .bind(actor_id)
            .bind(ProjectStatus::Unclaimed.id())
            .fetch_optional(pool)
            .await
    }

    /// Release a project still held by `owner`.
    pub async fn release(
        pool: &PgPool,
        id: DbId,
        owner: DbId,
    ) -> Result<Option<Project>, sqlx::Error> {
        let query = format!(
            "UPDATE projects SET
                status_id = $2,
                claimed_by = NULL,
                claimed_at = NULL,
                updated_at = NOW()
             WHERE id = $1 AND status_id = $3 AND claimed_by = $4
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .bind(ProjectStatus::Unclaimed.id())
            .bind(ProjectStatus::Claimed.id())
            .bind(owner)
            .fetch_optional(pool)
            .await
    }

    /// Complete a project still held by `owner`, retaining the owner as
    /// the historical claimant.
    pub async fn complete(
        pool: &PgPool,
        id: DbId,
        owner: DbId,
    ) -> Result<Option<Project>, sqlx::Error> {
        let query = format!(
            "UPDATE projects SET
                status_id = $2,
                last_claimed_by = claimed_by,
                claimed_by = NULL,
                claimed_at = NULL,
                completed_at = NOW(),
                updated_at = NOW()
             WHERE id = $1 AND status_id = $3 AND claimed_by = $4
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .bind(ProjectStatus::Completed.id())
            .bind(ProjectStatus::Claimed.id())
            .bind(owner)
            .fetch_optional(pool)
            .await
    }

    /// Reopen a completed project.
    ///
    /// Returns to Claimed by the historical claimant when one is recorded,
    /// otherwise to Unclaimed.
    pub async fn reopen(pool: &PgPool, id: DbId) -> Result<Option<Project>, sqlx::Error> {
        let query = format!(
            "UPDATE projects SET
                status_id = CASE WHEN last_claimed_by IS NULL THEN $2 ELSE $3 END,
                claimed_by = last_claimed_by,
                claimed_at = CASE WHEN last_claimed_by IS NULL THEN NULL ELSE NOW() END,
                last_claimed_by = NULL,
                completed_at = NULL,
                updated_at = NOW()
             WHERE id = $1 AND status_id = $4
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .bind(reopen_target(None).id())
            .bind(ProjectStatus::Claimed.id())
            .bind(ProjectStatus::Completed.id())
            .fetch_optional(pool)
            .await
    }

    /// Permanently delete a project and, by cascade, its files and segments.
    /// Returns `true` if a row was removed.
    pub async fn hard_delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM projects WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
