//! Read-only repository for the `segments` table.

use linguist_core::types::DbId;
use sqlx::PgPool;

use crate::models::segment::ProjectSegment;

/// Provides read access to segments for aggregation.
pub struct SegmentRepo;

impl SegmentRepo {
    /// All segments of a project, joined with their file's kind, in file
    /// then segment order. Reference-file segments are included; the
    /// aggregator decides what counts.
    pub async fn list_by_project(
        pool: &PgPool,
        project_id: DbId,
    ) -> Result<Vec<ProjectSegment>, sqlx::Error> {
        sqlx::query_as::<_, ProjectSegment>(
            "SELECT s.id, s.file_id, f.kind_id AS file_kind_id, s.position, \
                    s.source_text, s.target_text, s.status_id \
             FROM segments s \
             JOIN project_files f ON f.id = s.file_id \
             WHERE f.project_id = $1 \
             ORDER BY f.position, s.position",
        )
        .bind(project_id)
        .fetch_all(pool)
        .await
    }
}
