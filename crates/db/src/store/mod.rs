//! Store collaborator traits.
//!
//! The service layer never talks to Postgres directly. It goes through
//! [`ProjectStore`] (mutated only by lifecycle commands) and
//! [`SegmentSource`] (read-only), so the claim rules and the aggregation
//! pipeline can run against either [`PgStore`] or [`MemoryStore`].

mod memory;
mod postgres;

use async_trait::async_trait;
use linguist_core::error::CoreError;
use linguist_core::types::DbId;

use crate::models::file::ProjectFile;
use crate::models::project::{CreateProject, Project, ProjectWithFiles};
use crate::models::segment::ProjectSegment;

pub use memory::MemoryStore;
pub use postgres::PgStore;

// ---------------------------------------------------------------------------
// Error
// ---------------------------------------------------------------------------

/// Failure reaching or querying a store.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Transient: the store could not be reached. Safe to retry reads.
    #[error("Store unavailable: {0}")]
    Unavailable(String),

    /// Any other database failure.
    #[error("Database error: {0}")]
    Database(sqlx::Error),
}

impl From<sqlx::Error> for StoreError {
    /// Connection-class failures are transient; everything else is not.
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::PoolTimedOut
            | sqlx::Error::PoolClosed
            | sqlx::Error::Io(_)
            | sqlx::Error::WorkerCrashed => Self::Unavailable(err.to_string()),
            other => Self::Database(other),
        }
    }
}

impl From<StoreError> for CoreError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Unavailable(msg) => CoreError::Unavailable(msg),
            StoreError::Database(e) => {
                tracing::error!(error = %e, "Database error");
                CoreError::Internal("Database error".to_string())
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Traits
// ---------------------------------------------------------------------------

/// Project records and their lifecycle.
///
/// The `try_*` methods are compare-and-set writes: each applies only if the
/// project is still in the expected state and returns `None` otherwise.
/// Implementations must make the check and the write a single atomic step.
#[async_trait]
pub trait ProjectStore: Send + Sync {
    async fn list(&self) -> Result<Vec<Project>, StoreError>;

    async fn find_by_id(&self, id: DbId) -> Result<Option<Project>, StoreError>;

    /// Files of a project in display order.
    async fn files(&self, project_id: DbId) -> Result<Vec<ProjectFile>, StoreError>;

    /// Insert an unclaimed project and its files. Input is assumed valid.
    async fn create(&self, input: &CreateProject) -> Result<ProjectWithFiles, StoreError>;

    /// Unclaimed -> Claimed by `actor_id`.
    async fn try_claim(&self, id: DbId, actor_id: DbId) -> Result<Option<Project>, StoreError>;

    /// Claimed by `owner` -> Unclaimed.
    async fn try_release(&self, id: DbId, owner: DbId) -> Result<Option<Project>, StoreError>;

    /// Claimed by `owner` -> Completed, remembering `owner`.
    async fn try_complete(&self, id: DbId, owner: DbId) -> Result<Option<Project>, StoreError>;

    /// Completed -> Claimed by the remembered owner, or Unclaimed.
    async fn try_reopen(&self, id: DbId) -> Result<Option<Project>, StoreError>;

    /// Remove a project. Returns `false` if it did not exist.
    async fn delete(&self, id: DbId) -> Result<bool, StoreError>;

    async fn health_check(&self) -> Result<(), StoreError>;
}

/// Read-only access to segment data.
#[async_trait]
pub trait SegmentSource: Send + Sync {
    /// Every segment of a project across all of its files, in order.
    async fn project_segments(&self, project_id: DbId) -> Result<Vec<ProjectSegment>, StoreError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn pool_timeout_maps_to_unavailable() {
        let err = StoreError::from(sqlx::Error::PoolTimedOut);
        assert_matches!(err, StoreError::Unavailable(_));
        assert_matches!(CoreError::from(err), CoreError::Unavailable(_));
    }

    #[test]
    fn missing_row_maps_to_internal() {
        let err = StoreError::from(sqlx::Error::RowNotFound);
        assert_matches!(err, StoreError::Database(_));
        assert_matches!(CoreError::from(err), CoreError::Internal(_));
    }
}
