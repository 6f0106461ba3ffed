//! Repository for the `project_files` table.

use linguist_core::types::DbId;
use sqlx::{PgConnection, PgPool};

use crate::models::file::{CreateProjectFile, ProjectFile};

const COLUMNS: &str = "id, project_id, name, kind_id, position, created_at";

/// Provides insert and listing operations for project files.
pub struct FileRepo;

impl FileRepo {
    /// Insert `files` for a project, numbering positions from zero in the
    /// given order.
    pub async fn create_many(
        conn: &mut PgConnection,
        project_id: DbId,
        files: &[CreateProjectFile],
    ) -> Result<Vec<ProjectFile>, sqlx::Error> {
        let query = format!(
            "INSERT INTO project_files (project_id, name, kind_id, position)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );

        let mut created = Vec::with_capacity(files.len());
        for (position, file) in files.iter().enumerate() {
            let row = sqlx::query_as::<_, ProjectFile>(&query)
                .bind(project_id)
                .bind(file.name.trim())
                .bind(file.kind.id())
                .bind(position as i32)
                .fetch_one(&mut *conn)
                .await?;
            created.push(row);
        }
        Ok(created)
    }

    /// List a project's files in display order.
    pub async fn list_by_project(
        pool: &PgPool,
        project_id: DbId,
    ) -> Result<Vec<ProjectFile>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM project_files WHERE project_id = $1 ORDER BY position"
        );
        sqlx::query_as::<_, ProjectFile>(&query)
            .bind(project_id)
            .fetch_all(pool)
            .await
    }
}
