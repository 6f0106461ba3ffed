//! Project entity model and DTOs.

use linguist_core::error::CoreError;
use linguist_core::lifecycle::{LifecycleFields, Ownership};
use linguist_core::status::ProjectStatus;
use linguist_core::types::{DbId, StatusId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::file::{CreateProjectFile, ProjectFile};

/// A project row from the `projects` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Project {
    pub id: DbId,
    pub name: String,
    pub source_language: String,
    pub target_language: String,
    pub status_id: StatusId,
    /// Current owner. Set only while the project is claimed.
    pub claimed_by: Option<DbId>,
    pub claimed_at: Option<Timestamp>,
    /// Claimant at the time of completion, restored on reopen.
    pub last_claimed_by: Option<DbId>,
    pub completed_at: Option<Timestamp>,
    pub deadline: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Project {
    pub fn status(&self) -> Result<ProjectStatus, CoreError> {
        ProjectStatus::try_from(self.status_id)
    }

    /// Snapshot used by the lifecycle rules.
    pub fn ownership(&self) -> Result<Ownership, CoreError> {
        Ok(Ownership {
            status: self.status()?,
            claimed_by: self.claimed_by,
        })
    }

    pub fn lifecycle_fields(&self) -> Result<LifecycleFields, CoreError> {
        Ok(LifecycleFields {
            status: self.status()?,
            claimed_by: self.claimed_by,
            has_claimed_at: self.claimed_at.is_some(),
            has_completed_at: self.completed_at.is_some(),
            last_claimed_by: self.last_claimed_by,
        })
    }
}

/// A project together with its ordered files.
#[derive(Debug, Clone, Serialize)]
pub struct ProjectWithFiles {
    #[serde(flatten)]
    pub project: Project,
    pub files: Vec<ProjectFile>,
}

/// DTO for creating a new project. New projects always start unclaimed.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateProject {
    pub name: String,
    pub source_language: String,
    pub target_language: String,
    pub deadline: Option<Timestamp>,
    /// Files in display order.
    #[serde(default)]
    pub files: Vec<CreateProjectFile>,
}

impl CreateProject {
    pub fn validate(&self) -> Result<(), CoreError> {
        linguist_core::project::validate_new_project(
            &self.name,
            &self.source_language,
            &self.target_language,
            self.files.iter().map(|f| f.name.as_str()),
        )
    }
}
