use async_trait::async_trait;
use linguist_core::types::DbId;
use sqlx::PgPool;

use super::{ProjectStore, SegmentSource, StoreError};
use crate::models::file::ProjectFile;
use crate::models::project::{CreateProject, Project, ProjectWithFiles};
use crate::models::segment::ProjectSegment;
use crate::repositories::{FileRepo, ProjectRepo, SegmentRepo};

/// Postgres-backed store delegating to the repositories.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProjectStore for PgStore {
    async fn list(&self) -> Result<Vec<Project>, StoreError> {
        Ok(ProjectRepo::list(&self.pool).await?)
    }

    async fn find_by_id(&self, id: DbId) -> Result<Option<Project>, StoreError> {
        Ok(ProjectRepo::find_by_id(&self.pool, id).await?)
    }

    async fn files(&self, project_id: DbId) -> Result<Vec<ProjectFile>, StoreError> {
        Ok(FileRepo::list_by_project(&self.pool, project_id).await?)
    }

    async fn create(&self, input: &CreateProject) -> Result<ProjectWithFiles, StoreError> {
        let mut tx = self.pool.begin().await?;
        let project = ProjectRepo::create(&mut tx, input).await?;
        let files = FileRepo::create_many(&mut tx, project.id, &input.files).await?;
        tx.commit().await?;
        Ok(ProjectWithFiles { project, files })
    }

    async fn try_claim(&self, id: DbId, actor_id: DbId) -> Result<Option<Project>, StoreError> {
        Ok(ProjectRepo::claim(&self.pool, id, actor_id).await?)
    }

    async fn try_release(&self, id: DbId, owner: DbId) -> Result<Option<Project>, StoreError> {
        Ok(ProjectRepo::release(&self.pool, id, owner).await?)
    }

    async fn try_complete(&self, id: DbId, owner: DbId) -> Result<Option<Project>, StoreError> {
        Ok(ProjectRepo::complete(&self.pool, id, owner).await?)
    }

    async fn try_reopen(&self, id: DbId) -> Result<Option<Project>, StoreError> {
        Ok(ProjectRepo::reopen(&self.pool, id).await?)
    }

    async fn delete(&self, id: DbId) -> Result<bool, StoreError> {
        Ok(ProjectRepo::hard_delete(&self.pool, id).await?)
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        Ok(crate::health_check(&self.pool).await?)
    }
}

#[async_trait]
impl SegmentSource for PgStore {
    async fn project_segments(&self, project_id: DbId) -> Result<Vec<ProjectSegment>, StoreError> {
        Ok(SegmentRepo::list_by_project(&self.pool, project_id).await?)
    }
}
